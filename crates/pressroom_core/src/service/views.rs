//! Read-optimized projections derived from articles and settings.
//!
//! # Invariants
//! - Views never mutate storage.
//! - Positional views skip indices that no longer resolve to an article.

use crate::model::article::Article;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use url::form_urlencoded;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// LINE share endpoint used by article share buttons.
pub const LINE_SHARE_ENDPOINT: &str = "https://social-plugins.line.me/lineit/share";

/// An article together with its current list position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedArticle {
    pub index: usize,
    pub article: Article,
}

/// Result of a positional lookup. `index` is the clamped position used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleLookup {
    pub article: Option<Article>,
    pub list: Vec<Article>,
    pub index: usize,
}

/// One tag-cloud entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCount {
    /// First-seen spelling of the tag.
    pub tag: String,
    /// Number of articles carrying the tag.
    pub count: usize,
}

/// Resolves `indices` against `articles`, keeping order and skipping misses.
pub fn place_articles(articles: &[Article], indices: &[usize]) -> Vec<PlacedArticle> {
    indices
        .iter()
        .filter_map(|index| {
            articles.get(*index).map(|article| PlacedArticle {
                index: *index,
                article: article.clone(),
            })
        })
        .collect()
}

/// Clamps a missing or out-of-range index to 0 and looks it up.
pub fn lookup(articles: Vec<Article>, index: Option<usize>) -> ArticleLookup {
    let index = index.filter(|index| *index < articles.len()).unwrap_or(0);
    ArticleLookup {
        article: articles.get(index).cloned(),
        list: articles,
        index,
    }
}

/// Trims and collapses inner whitespace. Blank tags yield `None`.
pub fn normalize_tag(raw: &str) -> Option<String> {
    let collapsed = WHITESPACE_RE.replace_all(raw.trim(), " ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed.into_owned())
    }
}

/// Counts tag usage across articles, grouping case-insensitively.
///
/// Sorted by count descending, then by lowercase tag name.
pub fn derive_tag_cloud(articles: &[Article]) -> Vec<TagCount> {
    let mut counts: HashMap<String, TagCount> = HashMap::new();
    for article in articles {
        let mut seen: Vec<String> = Vec::new();
        for tag in article.tags.iter().filter_map(|tag| normalize_tag(tag)) {
            let key = tag.to_lowercase();
            if seen.contains(&key) {
                continue;
            }
            counts
                .entry(key.clone())
                .or_insert_with(|| TagCount { tag, count: 0 })
                .count += 1;
            seen.push(key);
        }
    }

    let mut cloud: Vec<TagCount> = counts.into_values().collect();
    cloud.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.tag.to_lowercase().cmp(&b.tag.to_lowercase()))
    });
    cloud
}

/// Builds a LINE share link for `target_url` attributed to `account_id`.
///
/// Query values use URI-component encoding: spaces become `%20` and
/// `! ' ( ) ~` stay literal, so links match those produced by browsers.
pub fn build_line_share_url(target_url: &str, account_id: &str) -> String {
    format!(
        "{LINE_SHARE_ENDPOINT}?url={}&accountId={}",
        encode_component(target_url),
        encode_component(account_id)
    )
}

fn encode_component(raw: &str) -> String {
    // form encoding only emits a literal `+` for a space; `%2B` stays escaped
    form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
        .replace("%21", "!")
        .replace("%27", "'")
        .replace("%28", "(")
        .replace("%29", ")")
        .replace("%7E", "~")
}
