//! Copy document and copy-extras persistence.

use crate::kv::{read_json, write_json, JsonRead, KeyValueStore, KvResult};
use crate::model::copy::{copy_extras_from_value, CopyDocument, CopyExtra};
use crate::repo::backup_repo::BackupRepository;
use crate::repo::{LoadOrigin, Loaded};
use log::warn;

pub struct CopyRepository<'s, S: KeyValueStore + ?Sized> {
    store: &'s S,
    copy_key: &'s str,
    extras_key: &'s str,
    backup: BackupRepository<'s, S>,
}

impl<'s, S: KeyValueStore + ?Sized> CopyRepository<'s, S> {
    pub fn new(store: &'s S, copy_key: &'s str, extras_key: &'s str, backup_key: &'s str) -> Self {
        Self {
            store,
            copy_key,
            extras_key,
            backup: BackupRepository::new(store, backup_key),
        }
    }

    /// Loads the copy document merged over defaults. Never fails.
    pub fn load_copy(&self) -> Loaded<CopyDocument> {
        let primary = read_json(self.store, self.copy_key);
        if let JsonRead::Parsed(value) = &primary {
            if let Some(document) = CopyDocument::from_value(value) {
                return Loaded::new(document.merged_over_defaults(), LoadOrigin::Primary);
            }
            if !value.is_null() {
                warn!("event=copy_load module=repo status=recovered reason=wrong_shape");
            }
        }

        match self
            .backup
            .read_sections()
            .and_then(|sections| sections.copy)
            .and_then(|value| CopyDocument::from_value(&value))
        {
            Some(document) => Loaded::new(document.merged_over_defaults(), LoadOrigin::Backup),
            None => Loaded::new(CopyDocument::defaults(), LoadOrigin::Default),
        }
    }

    pub fn save_copy(&self, document: &CopyDocument) -> KvResult<()> {
        write_json(self.store, self.copy_key, document)
    }

    /// Loads extras with blank entries dropped. Ids may still be empty for
    /// legacy entries; the caller assigns and persists them.
    pub fn load_extras(&self) -> Loaded<Vec<CopyExtra>> {
        let non_blank = |extras: Vec<CopyExtra>| -> Vec<CopyExtra> {
            extras
                .into_iter()
                .filter(|extra| !extra.text.trim().is_empty())
                .collect()
        };

        if let Some(extras) = read_json(self.store, self.extras_key)
            .into_value()
            .and_then(|value| copy_extras_from_value(&value))
        {
            return Loaded::new(non_blank(extras), LoadOrigin::Primary);
        }

        match self
            .backup
            .read_sections()
            .and_then(|sections| sections.copy_extras)
            .and_then(|value| copy_extras_from_value(&value))
        {
            Some(extras) => Loaded::new(non_blank(extras), LoadOrigin::Backup),
            None => Loaded::new(Vec::new(), LoadOrigin::Default),
        }
    }

    pub fn save_extras(&self, extras: &[CopyExtra]) -> KvResult<()> {
        write_json(self.store, self.extras_key, extras)
    }
}
