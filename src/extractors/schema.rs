//! Candidate layouts for owner records across jEveAssets releases
//!
//! Table, column, tag and attribute names have drifted between upstream
//! versions. Each extractor walks these lists in order and uses the first
//! layout that matches. Name comparisons are ASCII case-insensitive.

use chrono::{DateTime, Utc};

use crate::models::Identity;

/// Owner tables, in precedence order
pub const RELATIONAL_TABLES: &[&str] = &["esiowners", "owners", "accounts", "esi_owners"];

/// Owner container/record element pairs, in precedence order
pub const HIERARCHICAL_ELEMENTS: &[ElementLayout] = &[
    ElementLayout { container: "esiowners", record: "esiowner" },
    ElementLayout { container: "owners", record: "owner" },
    ElementLayout { container: "accounts", record: "account" },
];

pub const ID_FIELDS: &[&str] =
    &["ownerid", "owner_id", "characterid", "character_id", "accountid", "id"];
pub const NAME_FIELDS: &[&str] =
    &["name", "ownername", "accountname", "character_name", "charactername"];
pub const INVALID_FIELDS: &[&str] = &["invalid", "is_invalid", "disabled"];

const TIMESTAMP_FALLBACK_HINTS: &[&str] = &["update", "timestamp", "last", "time"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementLayout {
    pub container: &'static str,
    pub record: &'static str,
}

/// First candidate present in `available`, returned with the casing found in the store
pub fn pick_field<'a>(available: &'a [String], candidates: &[&str]) -> Option<&'a str> {
    candidates.iter().find_map(|candidate| {
        available.iter().find(|name| name.eq_ignore_ascii_case(candidate)).map(String::as_str)
    })
}

/// Fields holding "last update" timestamps
///
/// Prefers names containing `lastupdate`; otherwise falls back to anything
/// that looks time-related. `*next*` fields are future schedules and never count.
pub fn timestamp_fields(available: &[String]) -> Vec<String> {
    let not_next = |name: &str| !name.contains("next");

    let primary: Vec<String> = available
        .iter()
        .filter(|name| {
            let lower = name.to_ascii_lowercase();
            lower.contains("lastupdate") && not_next(&lower)
        })
        .cloned()
        .collect();
    if !primary.is_empty() {
        return primary;
    }

    available
        .iter()
        .filter(|name| {
            let lower = name.to_ascii_lowercase();
            TIMESTAMP_FALLBACK_HINTS.iter().any(|hint| lower.contains(hint)) && not_next(&lower)
        })
        .cloned()
        .collect()
}

/// Parse a stored epoch-millisecond value; zero, negative and non-numeric values are absent
pub fn parse_millis(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|ms| *ms > 0)
}

/// Latest of several optional epoch-millisecond values
pub fn latest_update(values: impl IntoIterator<Item = Option<i64>>) -> Option<DateTime<Utc>> {
    values
        .into_iter()
        .flatten()
        .filter(|ms| *ms > 0)
        .max()
        .and_then(DateTime::from_timestamp_millis)
}

pub fn is_truthy(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "y")
}

/// Build an identity from raw field values
///
/// Both extractors funnel through here so records from either format are
/// indistinguishable. Returns `None` when neither an identifier nor a name is usable.
pub fn owner_identity(
    id: Option<String>,
    name: Option<String>,
    last_update: Option<DateTime<Utc>>,
) -> Option<Identity> {
    let id = id.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
    let name = name.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

    match (id, name) {
        (Some(id), Some(name)) => Some(Identity::new(id, name, last_update)),
        (Some(id), None) => Some(Identity::new(id.clone(), id, last_update)),
        (None, Some(name)) => Some(Identity::new(name.clone(), name, last_update)),
        (None, None) => None,
    }
}
