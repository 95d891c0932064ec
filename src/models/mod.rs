//! Data models for jEveAssets profile scans.
//!
//! - [`DataStore`] - a discovered profile file and its detected [`StoreFormat`]
//! - [`Identity`] - an ESI owner with its last refresh time
//! - [`EvaluatedIdentity`] - an identity classified as fresh, stale or unknown
//! - [`ScanReport`] - the deterministic output of one scan

pub mod identity;
pub mod report;
pub mod store;

pub use identity::{EvaluatedIdentity, Freshness, Identity};
pub use report::{ScanReport, SkippedStore};
pub use store::{DataStore, StoreFormat};
