//! Content store configuration.
//!
//! # Invariants
//! - Storage keys are versioned identifiers; changing them orphans persisted data.
//! - The snapshot `version` field is the only forward-compatibility signal.

/// Default namespace for all storage keys.
pub const DEFAULT_NAMESPACE: &str = "pressroom";
/// Default per-article comment cap.
pub const DEFAULT_COMMENT_LIMIT: usize = 100;
/// Author recorded when a comment is posted without one.
pub const DEFAULT_ANONYMOUS_AUTHOR: &str = "anonymous";
/// Official LINE account attached to share links.
pub const DEFAULT_LINE_ACCOUNT_ID: &str = "@pressroom_official";

/// One storage key per sub-store, plus the consolidated backup snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub articles: String,
    pub backup: String,
    pub settings: String,
    pub copy: String,
    pub copy_extras: String,
    pub page_links: String,
    pub comments: String,
}

impl StorageKeys {
    /// Derives the full key set for a namespace, e.g. `blog` -> `blog_articles`.
    pub fn with_namespace(namespace: &str) -> Self {
        let ns = namespace.trim();
        Self {
            articles: format!("{ns}_articles"),
            backup: format!("{ns}_articles_backup_v1"),
            settings: format!("{ns}_article_settings"),
            copy: format!("{ns}_article_copy"),
            copy_extras: format!("{ns}_article_copy_extras"),
            page_links: format!("{ns}_page_links"),
            comments: format!("{ns}_article_comments_v1"),
        }
    }

    /// All keys in a stable order, backup last.
    pub fn all(&self) -> [&str; 7] {
        [
            self.articles.as_str(),
            self.settings.as_str(),
            self.copy.as_str(),
            self.copy_extras.as_str(),
            self.page_links.as_str(),
            self.comments.as_str(),
            self.backup.as_str(),
        ]
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::with_namespace(DEFAULT_NAMESPACE)
    }
}

/// Runtime options for `ContentStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub keys: StorageKeys,
    /// Maximum comments kept per article, newest first.
    pub comment_limit: usize,
    pub anonymous_author: String,
    pub line_account_id: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            keys: StorageKeys::default(),
            comment_limit: DEFAULT_COMMENT_LIMIT,
            anonymous_author: DEFAULT_ANONYMOUS_AUTHOR.to_string(),
            line_account_id: DEFAULT_LINE_ACCOUNT_ID.to_string(),
        }
    }
}
