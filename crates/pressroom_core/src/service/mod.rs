//! Content store use-case services.
//!
//! # Responsibility
//! - Orchestrate sub-store repositories into use-case level APIs.
//! - Own the failure policy: tolerant for everyday mutations, strict for import.
//!
//! # See also
//! - `repo` for per-key fallback reads.

mod backup_service;
mod content_service;
pub mod views;

pub use backup_service::ImportError;
pub use content_service::ContentStore;

use crate::kv::KvResult;
use log::warn;

/// Tolerant write policy: log and report failure instead of propagating it.
pub(crate) fn tolerate(result: KvResult<()>, event: &str) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            warn!("event={event} module=service status=error policy=tolerant error={err}");
            false
        }
    }
}
