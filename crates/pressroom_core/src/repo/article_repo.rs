//! Article list persistence.
//!
//! # Invariants
//! - The list is stored verbatim under one key; position is list order.
//! - A store with no readable backup gets a bootstrap snapshot on first load.

use crate::kv::{read_json, write_json, JsonRead, KeyValueStore, KvResult};
use crate::model::article::{articles_from_value, seed_articles, Article};
use crate::repo::backup_repo::BackupRepository;
use crate::repo::{LoadOrigin, Loaded};
use log::{info, warn};

pub struct ArticleRepository<'s, S: KeyValueStore + ?Sized> {
    store: &'s S,
    key: &'s str,
    backup: BackupRepository<'s, S>,
}

impl<'s, S: KeyValueStore + ?Sized> ArticleRepository<'s, S> {
    pub fn new(store: &'s S, key: &'s str, backup_key: &'s str) -> Self {
        Self {
            store,
            key,
            backup: BackupRepository::new(store, backup_key),
        }
    }

    /// Loads the article list: live key, then backup, then built-in seeds.
    ///
    /// # Side effects
    /// - Writes a bootstrap backup when none exists yet.
    pub fn load(&self) -> Loaded<Vec<Article>> {
        let loaded = self.read();

        if self.backup.needs_bootstrap() {
            match self.backup.persist_bootstrap(&loaded.value) {
                Ok(()) => info!(
                    "event=backup_bootstrap module=repo status=ok articles={}",
                    loaded.value.len()
                ),
                Err(err) => warn!("event=backup_bootstrap module=repo status=error error={err}"),
            }
        }

        loaded
    }

    fn read(&self) -> Loaded<Vec<Article>> {
        let primary = read_json(self.store, self.key);
        if let JsonRead::Parsed(value) = &primary {
            if let Some(articles) = articles_from_value(value) {
                return Loaded::new(articles, LoadOrigin::Primary);
            }
        }

        let from_backup = self
            .backup
            .read_sections()
            .and_then(|sections| sections.articles)
            .and_then(|value| articles_from_value(&value));
        if let Some(articles) = from_backup {
            if primary != JsonRead::Missing {
                warn!(
                    "event=articles_load module=repo status=recovered source=backup articles={}",
                    articles.len()
                );
            }
            return Loaded::new(articles, LoadOrigin::Backup);
        }

        Loaded::new(seed_articles(), LoadOrigin::Default)
    }

    /// Writes the list verbatim.
    pub fn save(&self, articles: &[Article]) -> KvResult<()> {
        write_json(self.store, self.key, articles)
    }
}
