use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::identity::serialize_duration;
use super::{DataStore, EvaluatedIdentity};
use crate::error::FailureKind;

/// A store that was discovered but contributed no identities
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedStore {
    pub path: PathBuf,
    pub kind: FailureKind,
    pub reason: String,
}

/// Complete result of one scan
///
/// Identities are ordered by display name (case-insensitive), then identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub data_dir: PathBuf,
    pub scanned_at: DateTime<Utc>,
    #[serde(rename = "threshold_ms", serialize_with = "serialize_duration")]
    pub threshold: Duration,
    /// Every store examined, in discovery order (newest first)
    pub stores: Vec<DataStore>,
    pub skipped: Vec<SkippedStore>,
    pub identities: Vec<EvaluatedIdentity>,
}

impl ScanReport {
    pub fn stores_examined(&self) -> usize {
        self.stores.len()
    }

    pub fn stores_skipped(&self) -> usize {
        self.skipped.len()
    }

    pub fn no_stores_found(&self) -> bool {
        self.stores.is_empty()
    }

    /// Stores were found but none of them could be read
    pub fn all_stores_skipped(&self) -> bool {
        !self.stores.is_empty() && self.skipped.len() >= self.stores.len()
    }

    pub fn stale(&self) -> impl Iterator<Item = &EvaluatedIdentity> {
        self.identities.iter().filter(|i| i.is_stale())
    }

    pub fn unknown(&self) -> impl Iterator<Item = &EvaluatedIdentity> {
        self.identities.iter().filter(|i| i.is_unknown())
    }

    pub fn has_stale(&self) -> bool {
        self.stale().next().is_some()
    }

    pub fn has_unknown(&self) -> bool {
        self.unknown().next().is_some()
    }
}
