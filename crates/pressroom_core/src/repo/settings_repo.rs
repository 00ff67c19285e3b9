//! Settings persistence. Every read is renormalized against the caller's
//! current article count; persisted settings are never trusted as-is.

use crate::kv::{read_json, write_json, JsonRead, KeyValueStore, KvResult};
use crate::model::settings::{normalize_settings, Settings};
use crate::repo::backup_repo::BackupRepository;
use crate::repo::{LoadOrigin, Loaded};
use log::warn;
use serde_json::json;

pub struct SettingsRepository<'s, S: KeyValueStore + ?Sized> {
    store: &'s S,
    key: &'s str,
    backup: BackupRepository<'s, S>,
}

impl<'s, S: KeyValueStore + ?Sized> SettingsRepository<'s, S> {
    pub fn new(store: &'s S, key: &'s str, backup_key: &'s str) -> Self {
        Self {
            store,
            key,
            backup: BackupRepository::new(store, backup_key),
        }
    }

    /// Loads settings normalized against `article_count`.
    pub fn load(&self, article_count: usize) -> Loaded<Settings> {
        let primary = read_json(self.store, self.key);
        if let JsonRead::Parsed(value) = &primary {
            if !value.is_null() {
                return Loaded::new(normalize_settings(value, article_count), LoadOrigin::Primary);
            }
        }
        if primary == JsonRead::Malformed {
            warn!("event=settings_load module=repo status=recovered reason=malformed");
        }

        self.fallback(article_count)
    }

    fn fallback(&self, article_count: usize) -> Loaded<Settings> {
        match self.backup.read_sections().and_then(|sections| sections.settings) {
            Some(value) => Loaded::new(
                normalize_settings(&value, article_count),
                LoadOrigin::Backup,
            ),
            None => Loaded::new(
                normalize_settings(&json!({}), article_count),
                LoadOrigin::Default,
            ),
        }
    }

    pub fn save(&self, settings: &Settings) -> KvResult<()> {
        write_json(self.store, self.key, settings)
    }
}
