//! Fallback resolution policy
//!
//! Turns a settled [`FetchState`] plus a section's hardcoded fallback into
//! what the section displays. List sections treat an empty result like a
//! failure; single-record sections follow their [`SinglePolicy`].

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::warn;

use super::fetch::FetchState;
use super::record::ContentRecord;

/// Fields that order list items, in lookup priority.
const SORT_KEYS: [&str; 3] = ["display_order", "order", "menu_order"];

/// Fields that hide a record when explicitly false.
const VISIBILITY_KEYS: [&str; 2] = ["is_active", "is_published"];

pub const UNAVAILABLE_NOTICE: &str = "Unable to load content";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionOrigin {
    /// Backend data, merged over the fallback for single records.
    Live,
    /// The section's hardcoded fallback.
    Fallback,
    /// Nothing to show; the section renders its notice instead.
    Unavailable,
}

/// How a single-record section reacts to an empty or failed read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinglePolicy {
    /// Show an explicit "unable to load" notice.
    ExplicitError,
    /// Show the fallback record.
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListResolution {
    pub items: Vec<ContentRecord>,
    pub origin: ResolutionOrigin,
    pub notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SingleResolution {
    pub record: Option<ContentRecord>,
    pub origin: ResolutionOrigin,
    pub notice: Option<String>,
}

/// `live.field ?? fallback.field` for every field of either record.
pub fn merge_fields(live: &ContentRecord, fallback: &ContentRecord) -> ContentRecord {
    let mut merged = fallback.clone();
    for (key, value) in live.iter() {
        if !value.is_null() {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

pub fn sort_key(record: &ContentRecord) -> Option<f64> {
    SORT_KEYS.iter().find_map(|key| record.get_f64(key))
}

/// Ascending by sort key; stable, so ties keep source order. Records
/// without a key go last. Fractional keys such as `1.5` are honored.
pub fn sort_by_display_order(records: &mut [ContentRecord]) {
    records.sort_by(|a, b| match (sort_key(a), sort_key(b)) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

pub fn is_visible(record: &ContentRecord) -> bool {
    VISIBILITY_KEYS
        .iter()
        .all(|key| record.get_bool(key) != Some(false))
}

pub fn resolve_list(
    state: FetchState<Vec<ContentRecord>>,
    fallback: &[ContentRecord],
) -> ListResolution {
    match state {
        FetchState::Loaded(rows) => {
            let mut items: Vec<ContentRecord> = rows.into_iter().filter(is_visible).collect();
            if items.is_empty() {
                warn!("Backend returned no visible rows; using fallback list");
                return fallback_list(fallback, None);
            }
            sort_by_display_order(&mut items);
            ListResolution {
                items,
                origin: ResolutionOrigin::Live,
                notice: None,
            }
        }
        FetchState::Failed(message) => {
            fallback_list(fallback, Some(format!("Using fallback content: {}", message)))
        }
        FetchState::Loading => fallback_list(fallback, None),
    }
}

fn fallback_list(fallback: &[ContentRecord], notice: Option<String>) -> ListResolution {
    let mut items = fallback.to_vec();
    sort_by_display_order(&mut items);
    ListResolution {
        items,
        origin: ResolutionOrigin::Fallback,
        notice,
    }
}

pub fn resolve_single(
    state: FetchState<Vec<ContentRecord>>,
    fallback: &ContentRecord,
    policy: SinglePolicy,
) -> SingleResolution {
    let failure = match state {
        FetchState::Loaded(rows) => match rows.into_iter().find(is_visible) {
            Some(live) => {
                return SingleResolution {
                    record: Some(merge_fields(&live, fallback)),
                    origin: ResolutionOrigin::Live,
                    notice: None,
                }
            }
            None => None,
        },
        FetchState::Failed(message) => Some(message),
        FetchState::Loading => None,
    };

    match policy {
        SinglePolicy::ExplicitError => SingleResolution {
            record: None,
            origin: ResolutionOrigin::Unavailable,
            notice: Some(match failure {
                Some(message) => format!("{}: {}", UNAVAILABLE_NOTICE, message),
                None => UNAVAILABLE_NOTICE.to_string(),
            }),
        },
        SinglePolicy::Fallback => SingleResolution {
            record: Some(fallback.clone()),
            origin: ResolutionOrigin::Fallback,
            notice: failure.map(|message| format!("Using fallback content: {}", message)),
        },
    }
}
