//! Persistent key-value substrate.
//!
//! # Responsibility
//! - Define the synchronous string-keyed store every sub-store writes through.
//! - Provide JSON read/write helpers with tolerant read semantics.
//!
//! # Invariants
//! - The substrate never interprets values; it stores opaque strings.
//! - `read_json` never fails: substrate errors and parse errors are logged and
//!   reported as `Missing` / `Malformed` so callers can walk their fallback chain.

use log::warn;
use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemoryKvStore;
pub use sqlite::SqliteKvStore;

pub type KvResult<T> = Result<T, KvError>;

/// Substrate failure (the store is unavailable for this operation).
#[derive(Debug)]
pub enum KvError {
    /// Writing would exceed the configured storage quota.
    QuotaExceeded { key: String, limit_bytes: usize },
    /// SQLite backend failure.
    Sqlite(rusqlite::Error),
    /// Value could not be encoded before writing.
    Encode(serde_json::Error),
}

impl Display for KvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QuotaExceeded { key, limit_bytes } => {
                write!(f, "storage quota of {limit_bytes} bytes exceeded writing `{key}`")
            }
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode value: {err}"),
        }
    }
}

impl Error for KvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::QuotaExceeded { .. } => None,
            Self::Sqlite(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for KvError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<serde_json::Error> for KvError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Synchronous string-keyed durable store.
///
/// Receivers are `&self`; implementations use interior mutability because the
/// substrate is shared by every sub-store of one content store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> KvResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> KvResult<()>;
    fn remove(&self, key: &str) -> KvResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> KvResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> KvResult<()> {
        (**self).remove(key)
    }
}

/// Outcome of reading one JSON-encoded key.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonRead {
    /// Key absent, empty, or the substrate could not be read.
    Missing,
    /// Key present but not valid JSON.
    Malformed,
    Parsed(Value),
}

impl JsonRead {
    /// Parsed value, treating a JSON `null` like a missing key.
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Parsed(Value::Null) | Self::Missing | Self::Malformed => None,
            Self::Parsed(value) => Some(value),
        }
    }
}

/// Reads and parses one key, logging every failure.
pub fn read_json<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> JsonRead {
    let raw = match store.get(key) {
        Ok(Some(raw)) if !raw.is_empty() => raw,
        Ok(_) => return JsonRead::Missing,
        Err(err) => {
            warn!("event=kv_read module=kv status=error key={key} error={err}");
            return JsonRead::Missing;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => JsonRead::Parsed(value),
        Err(err) => {
            warn!("event=kv_parse module=kv status=malformed key={key} error={err}");
            JsonRead::Malformed
        }
    }
}

/// Serializes `value` and writes it under `key`.
pub fn write_json<S: KeyValueStore + ?Sized, T: Serialize + ?Sized>(
    store: &S,
    key: &str,
    value: &T,
) -> KvResult<()> {
    let encoded = serde_json::to_string(value)?;
    store.set(key, &encoded)
}
