//! One complete profile scan
//!
//! # Error Handling Strategy
//!
//! Scans degrade per store, never per scan:
//!
//! - **Store-level failures**: unreadable, locked, unrecognised or malformed
//!   files are recorded in [`ScanReport::skipped`] with their [`FailureKind`]
//!   and logged at `warn`/`debug`. The remaining stores are still reported.
//!
//! - **Missing data directory**: yields a report with no stores, which callers
//!   map to "no profile found".
//!
//! - **Scan-level failures**: only an unlistable data directory or a panicking
//!   extractor abort the scan, as a [`ScanError`].
//!
//! [`FailureKind`]: crate::error::FailureKind
//! [`ScanError`]: crate::error::ScanError
//! [`ScanReport::skipped`]: crate::models::ScanReport::skipped

pub mod builder;
pub mod options;

pub use builder::{build_report, merge_identities, run_scan};
pub use options::ScanOptions;
