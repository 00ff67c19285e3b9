//! Backup/export coordination.
//!
//! # Responsibility
//! - Snapshot every sub-store into one versioned document.
//! - Restore every sub-store from such a document.
//!
//! # Invariants
//! - `export_state` is the single write path of the backup key, so the
//!   backup is at most one mutation stale.
//! - `import_state` rejects non-object payloads before touching storage.
//! - Import writes are strict: the first substrate failure aborts and is
//!   returned. Earlier writes are not rolled back; the next load
//!   renormalizes settings against whatever article list survived.

use crate::kv::{KeyValueStore, KvError};
use crate::model::article::{articles_from_value, ensure_article_ids};
use crate::model::comment::{comment_map_from_value, rekey_positional};
use crate::model::copy::{copy_extras_from_value, normalize_copy_extras, CopyDocument};
use crate::model::now_epoch_ms;
use crate::model::page_link::normalize_page_links;
use crate::model::settings::normalize_settings;
use crate::model::snapshot::{Snapshot, SnapshotOverrides, StateBundle, SNAPSHOT_VERSION};
use crate::service::content_service::ContentStore;
use crate::service::tolerate;
use log::{error, info};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Import failure. The only loud failure of the content store.
#[derive(Debug)]
pub enum ImportError {
    /// Payload is not a keyed document (or not JSON at all).
    InvalidPayload(String),
    /// A sub-store write failed mid-import.
    Storage(KvError),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPayload(details) => write!(f, "invalid import payload: {details}"),
            Self::Storage(err) => write!(f, "import aborted by storage failure: {err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidPayload(_) => None,
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<KvError> for ImportError {
    fn from(value: KvError) -> Self {
        Self::Storage(value)
    }
}

impl<S: KeyValueStore> ContentStore<S> {
    /// Builds a snapshot of the current state, substituting `overrides`
    /// verbatim, persists it as the backup and returns it.
    ///
    /// Settings that are not overridden are normalized against the
    /// snapshot's own article list. A failed backup write is logged only.
    pub fn export_state(&self, overrides: SnapshotOverrides) -> Snapshot {
        let articles = overrides.articles.unwrap_or_else(|| self.articles());
        let settings = overrides
            .settings
            .unwrap_or_else(|| self.settings_repo().load(articles.len()).into_value());
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            exported_at: now_epoch_ms(),
            imported_at: overrides.imported_at,
            copy: overrides.copy.unwrap_or_else(|| self.copy()),
            copy_extras: overrides.copy_extras.unwrap_or_else(|| self.copy_extras()),
            page_links: overrides.page_links.unwrap_or_else(|| self.page_links()),
            comments: overrides.comments.unwrap_or_else(|| self.comment_map()),
            articles,
            settings,
        };

        tolerate(self.backup_repo().persist(&snapshot), "backup_persist");
        snapshot
    }

    /// Exports the current state with no overrides.
    pub fn export(&self) -> Snapshot {
        self.export_state(SnapshotOverrides::default())
    }

    /// Restores every sub-store from an exported document.
    ///
    /// Sections are coerced independently: a wrong-shaped section falls back
    /// to its empty/default value rather than failing the import. Legacy
    /// positional comment keys are moved onto article ids.
    ///
    /// # Errors
    /// - `InvalidPayload` when `raw` is not a JSON object; storage untouched.
    /// - `Storage` when a sub-store write fails.
    pub fn import_state(&self, raw: &Value) -> Result<StateBundle, ImportError> {
        let Some(document) = raw.as_object() else {
            error!(
                "event=state_import module=service status=error error_code=invalid_payload kind={}",
                json_kind(raw)
            );
            return Err(ImportError::InvalidPayload(format!(
                "expected a keyed document, got {}",
                json_kind(raw)
            )));
        };

        let mut articles = document
            .get("articles")
            .and_then(articles_from_value)
            .unwrap_or_default();
        ensure_article_ids(&mut articles);
        let settings = normalize_settings(
            document.get("settings").unwrap_or(&Value::Null),
            articles.len(),
        );
        let copy = document
            .get("copy")
            .and_then(CopyDocument::from_value)
            .map(|copy| copy.merged_over_defaults())
            .unwrap_or_else(CopyDocument::defaults);
        let (copy_extras, _) = normalize_copy_extras(
            document
                .get("copyExtras")
                .and_then(copy_extras_from_value)
                .unwrap_or_default(),
        );
        let page_links = normalize_page_links(document.get("pageLinks").unwrap_or(&Value::Null));
        let mut comments = document
            .get("comments")
            .and_then(|value| comment_map_from_value(value, &self.config.anonymous_author))
            .unwrap_or_default();
        rekey_positional(&mut comments, &articles);

        let bundle = StateBundle {
            articles,
            settings,
            copy,
            copy_extras,
            page_links,
            comments,
        };

        if let Err(err) = self.write_bundle(&bundle) {
            error!(
                "event=state_import module=service status=error error_code=storage_failed error={err}"
            );
            return Err(err.into());
        }

        self.export_state(SnapshotOverrides {
            imported_at: Some(now_epoch_ms()),
            ..bundle.clone().into()
        });
        info!(
            "event=state_import module=service status=ok articles={} page_links={} comment_threads={}",
            bundle.articles.len(),
            bundle.page_links.len(),
            bundle.comments.len()
        );
        Ok(bundle)
    }

    /// Parses `text` as JSON and imports it.
    pub fn import_json(&self, text: &str) -> Result<StateBundle, ImportError> {
        let raw: Value = serde_json::from_str(text)
            .map_err(|err| ImportError::InvalidPayload(format!("not valid JSON: {err}")))?;
        self.import_state(&raw)
    }

    /// Reapplies the persisted backup to every sub-store.
    ///
    /// # Errors
    /// - `InvalidPayload` when no readable backup exists.
    pub fn restore_from_backup(&self) -> Result<StateBundle, ImportError> {
        let snapshot = self
            .backup_repo()
            .read_raw()
            .ok_or_else(|| ImportError::InvalidPayload("no readable backup snapshot".to_string()))?;
        self.import_state(&snapshot)
    }

    /// The persisted backup, when it decodes as a full snapshot.
    pub fn latest_backup(&self) -> Option<Snapshot> {
        self.backup_repo().read_snapshot()
    }

    fn write_bundle(&self, bundle: &StateBundle) -> Result<(), KvError> {
        self.article_repo().save(&bundle.articles)?;
        self.settings_repo().save(&bundle.settings)?;
        self.copy_repo().save_copy(&bundle.copy)?;
        self.copy_repo().save_extras(&bundle.copy_extras)?;
        self.page_link_repo().save(&bundle.page_links)?;
        self.comment_repo().save_map(&bundle.comments)?;
        Ok(())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
