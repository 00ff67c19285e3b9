//! Core content store for a small publishing site.
//!
//! Persists articles, presentation settings, editorial copy, navigation links
//! and comments through an injected key-value substrate, derives the views the
//! site renders, and exports/imports the whole state as one versioned snapshot.
//! This crate is the single source of truth for normalization invariants.

pub mod config;
pub mod db;
pub mod kv;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{StorageKeys, StoreConfig};
pub use kv::{KeyValueStore, KvError, KvResult, MemoryKvStore, SqliteKvStore};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::article::{seed_articles, Article, ArticleId};
pub use model::comment::{Comment, CommentMap, NewComment};
pub use model::copy::{CopyDocument, CopyExtra, CopyField};
pub use model::page_link::{default_page_links, normalize_page_links, PageLink};
pub use model::settings::{normalize_settings, Settings};
pub use model::snapshot::{Snapshot, SnapshotOverrides, StateBundle, SNAPSHOT_VERSION};
pub use repo::{LoadOrigin, Loaded};
pub use service::views::{ArticleLookup, PlacedArticle, TagCount};
pub use service::{ContentStore, ImportError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
