//! Presentation settings and their normalizer.
//!
//! # Responsibility
//! - Define hero/featured picks, footer pins, homepage carousels and card height.
//! - Repair any settings-like value against the current article count.
//!
//! # Invariants
//! - Every index in normalized settings is `< limit` (the article count).
//! - `home_latest_ids.len() <= 4`, `home_featured_ids.len() <= 6`.
//! - `card_height` is within `[240, 800]`.
//! - `normalize(normalize(s, n), n) == normalize(s, n)`.

use crate::model::coerce::as_integer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const HOME_LATEST_MAX: usize = 4;
pub const HOME_FEATURED_MAX: usize = 6;
pub const CARD_HEIGHT_MIN: u32 = 240;
pub const CARD_HEIGHT_MAX: u32 = 800;
pub const CARD_HEIGHT_DEFAULT: u32 = 380;

/// Persisted presentation settings. Indices are article positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub hero_id: Option<usize>,
    pub featured_id: Option<usize>,
    /// Set semantics, first-seen order retained for display.
    pub footer_ids: Vec<usize>,
    pub home_latest_ids: Vec<usize>,
    pub home_featured_ids: Vec<usize>,
    pub card_height: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            hero_id: None,
            featured_id: None,
            footer_ids: Vec::new(),
            home_latest_ids: Vec::new(),
            home_featured_ids: Vec::new(),
            card_height: CARD_HEIGHT_DEFAULT,
        }
    }
}

impl Settings {
    /// Re-validates typed settings against `limit` articles.
    pub fn normalized(&self, limit: usize) -> Settings {
        let to_i64 = |ids: &[usize]| -> Vec<i64> {
            ids.iter().filter_map(|id| i64::try_from(*id).ok()).collect()
        };
        RawSettings {
            hero_id: self.hero_id.and_then(|id| i64::try_from(id).ok()),
            featured_id: self.featured_id.and_then(|id| i64::try_from(id).ok()),
            footer_ids: to_i64(&self.footer_ids),
            home_latest_ids: to_i64(&self.home_latest_ids),
            home_featured_ids: to_i64(&self.home_featured_ids),
            card_height: Some(i64::from(self.card_height)),
        }
        .normalize(limit)
    }
}

/// Normalizes an arbitrary, possibly malformed settings value.
///
/// Non-object input is treated as an empty object. `featureSliderIds` is
/// read as a legacy alias when `homeFeaturedIds` is absent.
pub fn normalize_settings(raw: &Value, limit: usize) -> Settings {
    let empty = Map::new();
    let object = raw.as_object().unwrap_or(&empty);
    let integer = |key: &str| object.get(key).and_then(as_integer);
    let integers = |value: Option<&Value>| -> Vec<i64> {
        value
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(as_integer).collect())
            .unwrap_or_default()
    };
    let featured_list = object
        .get("homeFeaturedIds")
        .filter(|value| !value.is_null())
        .or_else(|| object.get("featureSliderIds"));

    RawSettings {
        hero_id: integer("heroId"),
        featured_id: integer("featuredId"),
        footer_ids: integers(object.get("footerIds")),
        home_latest_ids: integers(object.get("homeLatestIds")),
        home_featured_ids: integers(featured_list),
        card_height: integer("cardHeight"),
    }
    .normalize(limit)
}

/// Integer-only view of settings input, before range checks.
struct RawSettings {
    hero_id: Option<i64>,
    featured_id: Option<i64>,
    footer_ids: Vec<i64>,
    home_latest_ids: Vec<i64>,
    home_featured_ids: Vec<i64>,
    card_height: Option<i64>,
}

impl RawSettings {
    fn normalize(self, limit: usize) -> Settings {
        Settings {
            hero_id: single_pick(self.hero_id, limit),
            featured_id: single_pick(self.featured_id, limit),
            footer_ids: distinct_in_range(&self.footer_ids, limit, usize::MAX),
            home_latest_ids: bounded_selection(&self.home_latest_ids, limit, HOME_LATEST_MAX),
            home_featured_ids: bounded_selection(
                &self.home_featured_ids,
                limit,
                HOME_FEATURED_MAX,
            ),
            card_height: self
                .card_height
                .map(|height| {
                    height.clamp(i64::from(CARD_HEIGHT_MIN), i64::from(CARD_HEIGHT_MAX)) as u32
                })
                .unwrap_or(CARD_HEIGHT_DEFAULT),
        }
    }
}

fn in_range(value: i64, limit: usize) -> Option<usize> {
    usize::try_from(value).ok().filter(|index| *index < limit)
}

fn single_pick(candidate: Option<i64>, limit: usize) -> Option<usize> {
    candidate
        .and_then(|value| in_range(value, limit))
        .or(if limit > 0 { Some(0) } else { None })
}

fn distinct_in_range(values: &[i64], limit: usize, max: usize) -> Vec<usize> {
    let mut picked: Vec<usize> = Vec::new();
    for index in values.iter().filter_map(|value| in_range(*value, limit)) {
        if picked.len() >= max {
            break;
        }
        if !picked.contains(&index) {
            picked.push(index);
        }
    }
    picked
}

/// Carousel selection: falls back to the first `min(max, limit)` positions so
/// a freshly seeded site always shows something.
fn bounded_selection(values: &[i64], limit: usize, max: usize) -> Vec<usize> {
    if limit == 0 {
        return Vec::new();
    }
    let picked = distinct_in_range(values, limit, max);
    if picked.is_empty() {
        return (0..max.min(limit)).collect();
    }
    picked
}
