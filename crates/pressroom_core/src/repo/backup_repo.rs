//! Backup snapshot key access.

use crate::kv::{read_json, write_json, KeyValueStore, KvResult};
use crate::model::article::Article;
use crate::model::now_epoch_ms;
use crate::model::snapshot::{BackupSections, Snapshot, SNAPSHOT_VERSION};
use log::warn;
use serde_json::{json, Value};

/// Reads and writes the consolidated snapshot key.
pub struct BackupRepository<'s, S: KeyValueStore + ?Sized> {
    store: &'s S,
    key: &'s str,
}

impl<'s, S: KeyValueStore + ?Sized> BackupRepository<'s, S> {
    pub fn new(store: &'s S, key: &'s str) -> Self {
        Self { store, key }
    }

    /// Whether a bootstrap snapshot should be written: the key is absent,
    /// null or unparseable. A failed substrate read never counts.
    pub fn needs_bootstrap(&self) -> bool {
        match self.store.get(self.key) {
            Ok(Some(raw)) => {
                serde_json::from_str::<Value>(&raw).map_or(true, |value| value.is_null())
            }
            Ok(None) => true,
            Err(err) => {
                warn!("event=backup_bootstrap module=repo status=skipped error={err}");
                false
            }
        }
    }

    /// The parsed backup document, if any.
    pub fn read_raw(&self) -> Option<Value> {
        read_json(self.store, self.key).into_value()
    }

    /// Splits the persisted backup into raw sections.
    pub fn read_sections(&self) -> Option<BackupSections> {
        self.read_raw().and_then(BackupSections::from_value)
    }

    /// Reads the full snapshot when it decodes strictly.
    pub fn read_snapshot(&self) -> Option<Snapshot> {
        serde_json::from_value(self.read_raw()?).ok()
    }

    pub fn persist(&self, snapshot: &Snapshot) -> KvResult<()> {
        write_json(self.store, self.key, snapshot)
    }

    /// Writes a minimal `{version, exportedAt, articles}` snapshot so a store
    /// that has never exported still has something to recover from.
    pub fn persist_bootstrap(&self, articles: &[Article]) -> KvResult<()> {
        write_json(
            self.store,
            self.key,
            &json!({
                "version": SNAPSHOT_VERSION,
                "exportedAt": now_epoch_ms(),
                "articles": articles,
            }),
        )
    }
}
