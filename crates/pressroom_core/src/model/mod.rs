//! Domain model for the publishing content store.
//!
//! # Responsibility
//! - Define the persisted shapes of every sub-store and the backup snapshot.
//! - Own the pure normalization rules that repair persisted values.
//!
//! # Invariants
//! - Decoding is lenient: foreign or legacy JSON is coerced field by field,
//!   never rejected wholesale.
//! - Normalizers are pure and idempotent.

pub mod article;
pub(crate) mod coerce;
pub mod comment;
pub mod copy;
pub mod page_link;
pub mod settings;
pub mod snapshot;

use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Generates a fresh stable identifier for articles, comments and extras.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current wall-clock time as Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
