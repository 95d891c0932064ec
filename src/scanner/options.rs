use std::path::PathBuf;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};

use crate::evaluator::default_threshold;

/// Default bound on opening and reading a single store
pub const DEFAULT_STORE_TIMEOUT: StdDuration = StdDuration::from_secs(5);

/// Inputs to one scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Resolved jEveAssets data directory
    pub data_dir: PathBuf,
    /// Age at which an identity counts as stale
    pub threshold: Duration,
    /// Reference instant for every age in the report
    pub now: DateTime<Utc>,
    /// Stores whose open and read exceed this are skipped as timed out
    pub store_timeout: StdDuration,
}

impl ScanOptions {
    /// Options with the default 14-day threshold and `now` taken from the wall clock
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            threshold: default_threshold(),
            now: Utc::now(),
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    pub fn with_threshold(mut self, threshold: Duration) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn with_store_timeout(mut self, timeout: StdDuration) -> Self {
        self.store_timeout = timeout;
        self
    }
}
