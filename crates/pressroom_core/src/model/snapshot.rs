//! Versioned backup snapshot.
//!
//! # Invariants
//! - `version` is the only forward-compatibility signal; readers accept any
//!   version and coerce sections field by field.
//! - A legacy backup holding a bare article array is read as `{articles}`.

use crate::model::article::Article;
use crate::model::comment::CommentMap;
use crate::model::copy::{CopyDocument, CopyExtra};
use crate::model::page_link::PageLink;
use crate::model::settings::Settings;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SNAPSHOT_VERSION: u32 = 1;

/// Consolidated state of every sub-store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub version: u32,
    /// Unix epoch milliseconds.
    pub exported_at: i64,
    /// Set only on the snapshot written right after an import.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imported_at: Option<i64>,
    pub articles: Vec<Article>,
    pub settings: Settings,
    pub copy: CopyDocument,
    pub copy_extras: Vec<CopyExtra>,
    pub page_links: Vec<PageLink>,
    pub comments: CommentMap,
}

/// Values substituted verbatim into an export instead of re-reading them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotOverrides {
    pub articles: Option<Vec<Article>>,
    pub settings: Option<Settings>,
    pub copy: Option<CopyDocument>,
    pub copy_extras: Option<Vec<CopyExtra>>,
    pub page_links: Option<Vec<PageLink>>,
    pub comments: Option<CommentMap>,
    pub imported_at: Option<i64>,
}

/// Normalized state of every sub-store, as returned by an import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateBundle {
    pub articles: Vec<Article>,
    pub settings: Settings,
    pub copy: CopyDocument,
    pub copy_extras: Vec<CopyExtra>,
    pub page_links: Vec<PageLink>,
    pub comments: CommentMap,
}

impl From<StateBundle> for SnapshotOverrides {
    fn from(bundle: StateBundle) -> Self {
        Self {
            articles: Some(bundle.articles),
            settings: Some(bundle.settings),
            copy: Some(bundle.copy),
            copy_extras: Some(bundle.copy_extras),
            page_links: Some(bundle.page_links),
            comments: Some(bundle.comments),
            imported_at: None,
        }
    }
}

/// Raw sections of a persisted backup, each `None` when absent or wrong-shaped.
///
/// Sections stay untyped so every reader runs its own normalizer on them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackupSections {
    pub articles: Option<Value>,
    pub settings: Option<Value>,
    pub copy: Option<Value>,
    pub copy_extras: Option<Value>,
    pub page_links: Option<Value>,
    pub comments: Option<Value>,
}

impl BackupSections {
    /// Splits a parsed backup document. Returns `None` for scalars.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Array(_) => Some(Self {
                articles: Some(value),
                ..Self::default()
            }),
            Value::Object(mut object) => {
                let mut take = |key: &str, shape: fn(&Value) -> bool| {
                    object.remove(key).filter(|section| shape(section))
                };
                Some(Self {
                    articles: take("articles", Value::is_array),
                    settings: take("settings", Value::is_object),
                    copy: take("copy", Value::is_object),
                    copy_extras: take("copyExtras", Value::is_array),
                    page_links: take("pageLinks", Value::is_array),
                    comments: take("comments", Value::is_object),
                })
            }
            _ => None,
        }
    }
}
