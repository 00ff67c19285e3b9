//! Per-article comments.
//!
//! # Invariants
//! - Each per-article list is ordered most-recent-first.
//! - Stored comment bodies are trimmed and non-empty.
//! - Map keys are stable article ids; legacy stores keyed comments by list
//!   position, which `rekey_positional` migrates.

use crate::model::article::Article;
use crate::model::coerce::{as_integer, present_text, text_field};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Comments keyed by article id.
pub type CommentMap = BTreeMap<String, Vec<Comment>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub author: String,
    pub body: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

/// Comment submission before defaults are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewComment {
    pub author: Option<String>,
    pub body: String,
}

impl NewComment {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            author: None,
            body: body.into(),
        }
    }

    pub fn by(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}

impl Comment {
    fn from_value(
        article_key: &str,
        position: usize,
        value: &Value,
        anonymous_author: &str,
    ) -> Option<Self> {
        let object = value.as_object()?;
        let created_at = object.get("createdAt").and_then(as_integer).unwrap_or(0);
        let id = text_field(object, "id");
        Some(Self {
            id: if id.is_empty() {
                format!("c-{article_key}-{created_at}-{position}")
            } else {
                id
            },
            author: present_text(object.get("author"))
                .map(|author| author.trim().to_string())
                .filter(|author| !author.is_empty())
                .unwrap_or_else(|| anonymous_author.to_string()),
            body: text_field(object, "body"),
            created_at,
        })
    }
}

/// Decodes a stored comment map. Returns `None` when `value` is not an object.
///
/// Non-array per-article values are skipped. Comments without an author are
/// attributed to `anonymous_author`.
pub fn comment_map_from_value(value: &Value, anonymous_author: &str) -> Option<CommentMap> {
    let object = value.as_object()?;
    Some(
        object
            .iter()
            .filter_map(|(key, entries)| {
                let entries = entries.as_array()?;
                let comments = entries
                    .iter()
                    .enumerate()
                    .filter_map(|(position, entry)| {
                        Comment::from_value(key, position, entry, anonymous_author)
                    })
                    .collect();
                Some((key.clone(), comments))
            })
            .collect(),
    )
}

/// Moves comments stored under positional keys (`"0"`, `"1"`, ...) onto the
/// id of the article at that position. Returns whether anything moved.
///
/// Keys that already name an article id, or that point past the end of the
/// list, are left alone. Lists merged onto an existing key are re-sorted
/// newest first.
pub fn rekey_positional(comments: &mut CommentMap, articles: &[Article]) -> bool {
    let positional: Vec<(String, usize)> = comments
        .keys()
        .filter(|key| !articles.iter().any(|article| &article.id == *key))
        .filter_map(|key| {
            let position = key.parse::<usize>().ok()?;
            (position < articles.len() && !articles[position].id.is_empty())
                .then(|| (key.clone(), position))
        })
        .collect();

    for (key, position) in &positional {
        if let Some(moved) = comments.remove(key) {
            let target = comments.entry(articles[*position].id.clone()).or_default();
            target.extend(moved);
            target.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }
    }

    !positional.is_empty()
}
