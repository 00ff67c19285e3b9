//! Article domain model.
//!
//! # Responsibility
//! - Define the persisted article record and its lenient decoder.
//! - Provide the built-in seed list shown before any article is saved.
//!
//! # Invariants
//! - `id` is stable once assigned and survives reordering and deletion of
//!   other articles. List position is a display concern only.
//! - An empty `id` means "not yet assigned" (legacy data); repositories fill it.
//! - Ids are unique within a list; a repeated id is replaced on its later
//!   occurrences so the first article keeps its comments.

use crate::model::coerce::{scalar_text, text_field};
use crate::model::generate_id;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Stable article identifier.
pub type ArticleId = String;

/// One published article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: ArticleId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    /// Display order is preserved as authored.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Cover image URL.
    #[serde(default)]
    pub image: String,
}

impl Article {
    /// Creates an article with a generated stable id.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            title: title.into(),
            body: body.into(),
            tags: Vec::new(),
            image: String::new(),
        }
    }

    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Decodes one stored entry. Non-object entries yield `None`.
    ///
    /// Scalars are stringified; `tags` may be an array or a comma-separated
    /// string.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let tags = match object.get("tags") {
            Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
            Some(Value::String(joined)) => joined
                .split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        };

        Some(Self {
            id: text_field(object, "id"),
            title: text_field(object, "title"),
            body: text_field(object, "body"),
            tags,
            image: text_field(object, "image"),
        })
    }

    /// Assigns a generated id when none is set. Returns whether one was assigned.
    pub fn ensure_id(&mut self) -> bool {
        if !self.id.trim().is_empty() {
            return false;
        }
        self.id = generate_id();
        true
    }
}

/// Decodes a stored article list. Returns `None` when `value` is not an array.
pub fn articles_from_value(value: &Value) -> Option<Vec<Article>> {
    let items = value.as_array()?;
    Some(items.iter().filter_map(Article::from_value).collect())
}

/// Assigns ids to every article missing one and re-ids later duplicates.
/// Returns whether any changed.
pub fn ensure_article_ids(articles: &mut [Article]) -> bool {
    let mut seen: HashSet<String> = HashSet::with_capacity(articles.len());
    let mut changed = false;
    for article in articles.iter_mut() {
        changed |= article.ensure_id();
        while !seen.insert(article.id.clone()) {
            article.id = generate_id();
            changed = true;
        }
    }
    changed
}

/// Built-in articles returned when nothing has ever been stored.
///
/// Seeds carry fixed ids so repeated reads of an empty store agree.
pub fn seed_articles() -> Vec<Article> {
    vec![
        Article {
            id: "seed-tablet-scroll".to_string(),
            title: "Tablet scroll feature, now on the official LINE".to_string(),
            body: "A card layout built around a dark background and overscroll, bundled with a delivery link to the official LINE account.".to_string(),
            tags: vec!["iPad".to_string(), "Scroll".to_string(), "LINE".to_string()],
            image: "https://images.unsplash.com/photo-1472289065668-ce650ac443d2?auto=format&fit=crop&w=1200&q=80".to_string(),
        },
        Article {
            id: "seed-publish-from-chat".to_string(),
            title: "Publish straight from a chat draft".to_string(),
            body: "Paste a draft written in a chat session as-is. Add tags and a cover to turn it into a reader-facing card.".to_string(),
            tags: vec!["ChatGPT".to_string(), "Workflow".to_string()],
            image: "https://images.unsplash.com/photo-1507138451611-3001135909a5?auto=format&fit=crop&w=1200&q=80".to_string(),
        },
        Article {
            id: "seed-one-click-share".to_string(),
            title: "One-click LINE share links".to_string(),
            body: "Share buttons tied to the official LINE account are generated automatically, with OGP tuned for external browsers.".to_string(),
            tags: vec!["LINE".to_string(), "Share".to_string(), "OGP".to_string()],
            image: "https://images.unsplash.com/photo-1508766206392-8bd5cf550d1b?auto=format&fit=crop&w=1200&q=80".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::{articles_from_value, ensure_article_ids, seed_articles, Article};
    use serde_json::json;

    #[test]
    fn lenient_decode_coerces_scalars_and_drops_non_objects() {
        let decoded = articles_from_value(&json!([
            {"title": 42, "body": "b", "tags": ["a", 1, null], "image": "x.png"},
            "not an article",
            {"title": "csv", "tags": "one, two,,three"}
        ]))
        .expect("array should decode");

        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].title, "42");
        assert_eq!(decoded[0].tags, vec!["a", "1"]);
        assert!(decoded[0].id.is_empty());
        assert_eq!(decoded[1].tags, vec!["one", "two", "three"]);
        assert_eq!(decoded[1].body, "");
    }

    #[test]
    fn non_array_is_not_an_article_list() {
        assert!(articles_from_value(&json!({"title": "x"})).is_none());
        assert!(articles_from_value(&json!("not-an-array")).is_none());
    }

    #[test]
    fn ensure_ids_only_fills_missing() {
        let mut list = vec![Article::default(), Article::new("kept", "")];
        let kept = list[1].id.clone();

        assert!(ensure_article_ids(&mut list));
        assert!(!list[0].id.is_empty());
        assert_eq!(list[1].id, kept);
        assert!(!ensure_article_ids(&mut list));
    }

    #[test]
    fn ensure_ids_replaces_later_duplicates_only() {
        let mut list = articles_from_value(&json!([
            {"id": "x", "title": "first"},
            {"id": "x", "title": "second"},
            {"id": "y", "title": "third"}
        ]))
        .unwrap();

        assert!(ensure_article_ids(&mut list));
        assert_eq!(list[0].id, "x");
        assert_ne!(list[1].id, "x");
        assert!(!list[1].id.is_empty());
        assert_eq!(list[2].id, "y");
        assert!(!ensure_article_ids(&mut list));
    }

    #[test]
    fn seeds_have_stable_unique_ids() {
        let seeds = seed_articles();
        assert_eq!(seeds, seed_articles());
        assert!(seeds.iter().all(|article| !article.id.is_empty()));
    }
}
