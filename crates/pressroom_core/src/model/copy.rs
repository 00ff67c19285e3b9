//! Editorial copy: the keyed base document and ad-hoc text snippets.
//!
//! # Invariants
//! - A merged `CopyDocument` always carries every `CopyField`.
//! - Keys outside `CopyField` survive a merge untouched.
//! - Normalized `CopyExtra` lists hold no blank text and no empty ids.

use crate::model::coerce::{scalar_text, text_field};
use crate::model::generate_id;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Named text fields rendered by the site chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CopyField {
    HeroTitle,
    HeroBody,
    ListTitle,
    ListSubtitle,
    PinnedTitle,
    PinnedSubtitle,
    TagTitle,
    TagSubtitle,
}

impl CopyField {
    pub const ALL: [CopyField; 8] = [
        Self::HeroTitle,
        Self::HeroBody,
        Self::ListTitle,
        Self::ListSubtitle,
        Self::PinnedTitle,
        Self::PinnedSubtitle,
        Self::TagTitle,
        Self::TagSubtitle,
    ];

    /// Persisted key name.
    pub fn key(self) -> &'static str {
        match self {
            Self::HeroTitle => "heroTitle",
            Self::HeroBody => "heroBody",
            Self::ListTitle => "listTitle",
            Self::ListSubtitle => "listSubtitle",
            Self::PinnedTitle => "pinnedTitle",
            Self::PinnedSubtitle => "pinnedSubtitle",
            Self::TagTitle => "tagTitle",
            Self::TagSubtitle => "tagSubtitle",
        }
    }

    pub fn default_text(self) -> &'static str {
        match self {
            Self::HeroTitle => "A list view that adapts to the screen",
            Self::HeroBody => "Cards stack vertically on phones, sit beside thumbnails on tablets, and share a two-column layout with a pinned stats and tag sidebar on desktop.",
            Self::ListTitle => "Latest posts",
            Self::ListSubtitle => "Locally stored articles, newest first.",
            Self::PinnedTitle => "Pinned articles",
            Self::PinnedSubtitle => "Articles selected on the admin page",
            Self::TagTitle => "Tag cloud",
            Self::TagSubtitle => "Ordered by usage",
        }
    }
}

/// Keyed copy document. May be partial until merged over defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CopyDocument(BTreeMap<String, String>);

impl CopyDocument {
    /// The hardcoded default document.
    pub fn defaults() -> Self {
        Self(
            CopyField::ALL
                .iter()
                .map(|field| (field.key().to_string(), field.default_text().to_string()))
                .collect(),
        )
    }

    /// Decodes a stored object; scalar values are stringified, others dropped.
    /// Returns `None` when `value` is not an object.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        Some(Self(
            object
                .iter()
                .filter_map(|(key, value)| scalar_text(value).map(|text| (key.clone(), text)))
                .collect(),
        ))
    }

    /// Defaults overlaid with every entry of `self`.
    pub fn merged_over_defaults(&self) -> Self {
        self.merged_over(&Self::defaults())
    }

    /// `base` overlaid with every entry of `self`.
    pub fn merged_over(&self, base: &CopyDocument) -> Self {
        let mut merged = base.0.clone();
        merged.extend(self.0.iter().map(|(key, value)| (key.clone(), value.clone())));
        Self(merged)
    }

    /// Text for a known field, falling back to its default.
    pub fn get(&self, field: CopyField) -> &str {
        self.0
            .get(field.key())
            .map(String::as_str)
            .unwrap_or_else(|| field.default_text())
    }

    /// Text for any key, known or not.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn with(mut self, field: CopyField, value: impl Into<String>) -> Self {
        self.set(field.key(), value);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

/// Ad-hoc editorial snippet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyExtra {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub text: String,
}

impl CopyExtra {
    /// Snippet without an id; one is assigned on save.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            text: text.into(),
        }
    }
}

/// Decodes a stored extras list. Returns `None` when `value` is not an array.
pub fn copy_extras_from_value(value: &Value) -> Option<Vec<CopyExtra>> {
    let items = value.as_array()?;
    Some(
        items
            .iter()
            .filter_map(Value::as_object)
            .map(|object| CopyExtra {
                id: text_field(object, "id"),
                text: text_field(object, "text"),
            })
            .collect(),
    )
}

/// Drops blank snippets and assigns generated ids to the rest where missing.
///
/// Returns the normalized list and whether any id was generated.
pub fn normalize_copy_extras(extras: Vec<CopyExtra>) -> (Vec<CopyExtra>, bool) {
    let mut assigned = false;
    let normalized = extras
        .into_iter()
        .filter(|extra| !extra.text.trim().is_empty())
        .map(|mut extra| {
            if extra.id.trim().is_empty() {
                extra.id = generate_id();
                assigned = true;
            }
            extra
        })
        .collect();
    (normalized, assigned)
}

#[cfg(test)]
mod tests {
    use super::{
        copy_extras_from_value, normalize_copy_extras, CopyDocument, CopyExtra, CopyField,
    };
    use serde_json::json;

    #[test]
    fn merge_keeps_unknown_keys_and_fills_missing_fields() {
        let partial = CopyDocument::from_value(&json!({
            "heroTitle": "Custom",
            "footerNote": "kept",
            "nested": {"dropped": true},
            "count": 3
        }))
        .unwrap();

        let merged = partial.merged_over_defaults();
        assert_eq!(merged.get(CopyField::HeroTitle), "Custom");
        assert_eq!(merged.get(CopyField::TagTitle), CopyField::TagTitle.default_text());
        assert_eq!(merged.text("footerNote"), Some("kept"));
        assert_eq!(merged.text("count"), Some("3"));
        assert_eq!(merged.text("nested"), None);
        assert_eq!(merged.len(), CopyField::ALL.len() + 2);
    }

    #[test]
    fn non_object_is_not_a_copy_document() {
        assert!(CopyDocument::from_value(&json!(["heroTitle"])).is_none());
        assert!(CopyDocument::from_value(&json!("x")).is_none());
    }

    #[test]
    fn extras_drop_blank_text_and_get_ids() {
        let (normalized, assigned) = normalize_copy_extras(vec![
            CopyExtra::new("first"),
            CopyExtra::new("   "),
            CopyExtra {
                id: "fixed".to_string(),
                text: "second".to_string(),
            },
        ]);

        assert!(assigned);
        assert_eq!(normalized.len(), 2);
        assert!(!normalized[0].id.is_empty());
        assert_eq!(normalized[1].id, "fixed");
    }

    #[test]
    fn extras_decode_skips_non_objects() {
        let decoded =
            copy_extras_from_value(&json!([{"id": 1, "text": "a"}, 5, {"text": "b"}])).unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].id, "1");
        assert_eq!(decoded[1].id, "");
    }
}
