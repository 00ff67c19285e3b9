//! Sub-store repositories over the key-value substrate.
//!
//! # Responsibility
//! - One repository per storage key: read with fallback, write verbatim.
//! - Keep JSON key layout details out of the service layer.
//!
//! # Invariants
//! - Reads never fail. They walk live key -> backup snapshot -> hardcoded
//!   default and report which one answered via `LoadOrigin`.
//! - Writes return the substrate error; the caller picks the failure policy.
//! - Every read returns an owned value; mutating it persists nothing.

pub mod article_repo;
pub mod backup_repo;
pub mod comment_repo;
pub mod copy_repo;
pub mod page_link_repo;
pub mod settings_repo;

/// Where a loaded value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    /// The sub-store's own key.
    Primary,
    /// The consolidated backup snapshot.
    Backup,
    /// Hardcoded defaults.
    Default,
}

/// A read result tagged with its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded<T> {
    pub value: T,
    pub origin: LoadOrigin,
}

impl<T> Loaded<T> {
    pub fn new(value: T, origin: LoadOrigin) -> Self {
        Self { value, origin }
    }

    /// True when the live key did not answer and a fallback was used.
    pub fn is_recovered(&self) -> bool {
        self.origin != LoadOrigin::Primary
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Loaded<U> {
        Loaded {
            value: f(self.value),
            origin: self.origin,
        }
    }

    pub fn into_value(self) -> T {
        self.value
    }
}
