//! jEveAssets companion - warn when ESI owners have not been refreshed
//!
//! This library inspects the profile stores jEveAssets keeps under
//! `~/.jeveassets/profiles` and reports, per ESI owner, how long ago its data
//! was last refreshed. It supports:
//!
//! - Discovering candidate stores and sniffing their format from content
//! - Reading owners from SQLite databases and XML profiles, read-only
//! - Merging owners seen in several stores into one record each
//! - Classifying owners as fresh, stale or unknown against a threshold
//!
//! # Example
//!
//! ```no_run
//! use jeveassets_companion::{ScanOptions, run_scan};
//! use std::path::PathBuf;
//!
//! let options = ScanOptions::new(PathBuf::from("/home/alice/.jeveassets"));
//! let report = run_scan(&options)?;
//! for owner in report.stale() {
//!     println!("{} needs a refresh", owner.identity.name);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod alerts;
pub mod cli;
pub mod config;
pub mod detector;
pub mod error;
pub mod evaluator;
pub mod extractors;
pub mod locator;
pub mod models;
pub mod scanner;
pub mod utils;

// Re-export commonly used types
pub use error::{FailureKind, ScanError, StoreError};
pub use evaluator::evaluate;
pub use models::{EvaluatedIdentity, Freshness, Identity, ScanReport};
pub use scanner::{ScanOptions, run_scan};
pub use utils::environment::get_data_dir;
