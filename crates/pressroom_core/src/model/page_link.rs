//! Navigation page-link registry entries.
//!
//! # Invariants
//! - Normalized links always have non-empty `id`, `title` and `url`.
//! - A non-array payload means "no data ever existed" and yields the default
//!   registry; an explicit empty array is honored as zero links.

use crate::model::coerce::present_text;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
}

impl PageLink {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            url: url.into(),
        }
    }

    fn from_entry(position: usize, entry: &Value) -> Option<Self> {
        let object = entry.as_object()?;
        let title = present_text(object.get("title"))?;
        let url = present_text(object.get("url"))?;
        Some(Self {
            id: present_text(object.get("id")).unwrap_or_else(|| positional_id(position)),
            title,
            description: present_text(object.get("description")).unwrap_or_default(),
            url,
        })
    }
}

fn positional_id(position: usize) -> String {
    format!("link-{position}")
}

/// Normalizes a stored or imported registry payload.
pub fn normalize_page_links(raw: &Value) -> Vec<PageLink> {
    match raw.as_array() {
        Some(entries) => entries
            .iter()
            .enumerate()
            .filter_map(|(position, entry)| PageLink::from_entry(position, entry))
            .collect(),
        None => default_page_links(),
    }
}

/// Applies the same rules to typed links: entries without title or url are
/// dropped and empty ids default to their original position.
pub fn normalize_page_link_list(links: &[PageLink]) -> Vec<PageLink> {
    links
        .iter()
        .enumerate()
        .filter(|(_, link)| !link.title.is_empty() && !link.url.is_empty())
        .map(|(position, link)| PageLink {
            id: if link.id.is_empty() {
                positional_id(position)
            } else {
                link.id.clone()
            },
            ..link.clone()
        })
        .collect()
}

/// Hardcoded registry used until links are saved.
pub fn default_page_links() -> Vec<PageLink> {
    vec![
        PageLink::new(
            "draw",
            "Draw Board",
            "The drawing tool with a dark theme and responsive buttons. Works with fingers or a mouse.",
            "/draw.html",
        ),
        PageLink::new(
            "admin",
            "Admin view",
            "Post-login navigation, authentication errors and redirects in one place.",
            "/admin.html",
        ),
        PageLink::new(
            "blog-list",
            "Blog (list)",
            "One column on phones, two on tablets, two plus a sidebar on desktop, with stats widgets.",
            "/blog-list.html",
        ),
        PageLink::new(
            "blog-edit",
            "Blog editor",
            "Form and list side by side, with edit state, tag display and save feedback.",
            "/blog-edit.html",
        ),
        PageLink::new(
            "chat-toc",
            "Chat TOC Maker",
            "Generates a table of contents for a chat transcript.",
            "/chat-toc.html",
        ),
        PageLink::new(
            "article",
            "Article view",
            "Single article page with body, tags and share buttons.",
            "/blog-article.html",
        ),
    ]
}
