use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// On-disk encoding of a profile store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreFormat {
    /// SQLite database (`*.db`)
    Relational,
    /// XML document (`*.xml`, `*.xmlbackup`)
    Hierarchical,
    Unknown,
}

impl StoreFormat {
    pub fn label(&self) -> &'static str {
        match self {
            StoreFormat::Relational => "database",
            StoreFormat::Hierarchical => "XML",
            StoreFormat::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataStore {
    pub path: PathBuf,
    pub format: StoreFormat,
    pub modified: DateTime<Utc>,
}
