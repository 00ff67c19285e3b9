//! Page-link registry persistence.

use crate::kv::{read_json, write_json, KeyValueStore, KvResult};
use crate::model::page_link::{default_page_links, normalize_page_links, PageLink};
use crate::repo::backup_repo::BackupRepository;
use crate::repo::{LoadOrigin, Loaded};

pub struct PageLinkRepository<'s, S: KeyValueStore + ?Sized> {
    store: &'s S,
    key: &'s str,
    backup: BackupRepository<'s, S>,
}

impl<'s, S: KeyValueStore + ?Sized> PageLinkRepository<'s, S> {
    pub fn new(store: &'s S, key: &'s str, backup_key: &'s str) -> Self {
        Self {
            store,
            key,
            backup: BackupRepository::new(store, backup_key),
        }
    }

    /// Any non-null live value wins, even a wrong-shaped one (which
    /// normalizes to the default registry).
    pub fn load(&self) -> Loaded<Vec<PageLink>> {
        if let Some(value) = read_json(self.store, self.key).into_value() {
            return Loaded::new(normalize_page_links(&value), LoadOrigin::Primary);
        }

        match self.backup.read_sections().and_then(|sections| sections.page_links) {
            Some(value) => Loaded::new(normalize_page_links(&value), LoadOrigin::Backup),
            None => Loaded::new(default_page_links(), LoadOrigin::Default),
        }
    }

    pub fn save(&self, links: &[PageLink]) -> KvResult<()> {
        write_json(self.store, self.key, links)
    }
}
