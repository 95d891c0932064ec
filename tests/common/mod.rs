//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use rusqlite::{Connection, params};
use tempfile::TempDir;

/// Builder for creating test jEveAssets data directories
///
/// The builder root plays the role of `~/.jeveassets`; stores land in its
/// `profiles/` subdirectory.
pub struct ProfileDirBuilder {
    temp_dir: TempDir,
}

impl ProfileDirBuilder {
    /// Create a new builder with an empty `profiles/` directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir(temp_dir.path().join("profiles")).expect("Failed to create profiles dir");
        Self { temp_dir }
    }

    /// Create a builder whose data directory has no `profiles/` at all
    pub fn without_profiles() -> Self {
        Self { temp_dir: TempDir::new().expect("Failed to create temp dir") }
    }

    /// Get the path to the data directory
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn profiles(&self) -> PathBuf {
        self.temp_dir.path().join("profiles")
    }

    /// Add a SQLite profile with an `esiowners` table holding `owners`
    pub fn with_sqlite_store(self, file_name: &str, owners: &[OwnerSpec]) -> Self {
        let conn = Connection::open(self.profiles().join(file_name))
            .expect("Failed to create sqlite store");
        conn.execute_batch(
            "CREATE TABLE esiowners (
                ownerid INTEGER PRIMARY KEY,
                name TEXT,
                invalid INTEGER,
                assetslastupdate INTEGER,
                balancelastupdate INTEGER,
                assetsnextupdate INTEGER
            );",
        )
        .expect("Failed to create esiowners table");
        for owner in owners {
            conn.execute(
                "INSERT INTO esiowners VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    owner.id,
                    owner.name,
                    i64::from(owner.invalid),
                    owner.assets_ms,
                    owner.balance_ms,
                    owner.next_ms,
                ],
            )
            .expect("Failed to insert owner");
        }
        self
    }

    /// Add an XML profile with an `<esiowners>` block holding `owners`
    pub fn with_xml_store(self, file_name: &str, owners: &[OwnerSpec]) -> Self {
        let records: String = owners.iter().map(OwnerSpec::to_xml).collect();
        let body = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<settings>\n  <esiowners>\n{}  </esiowners>\n</settings>\n",
            records
        );
        self.with_raw_file(file_name, body.as_bytes())
    }

    /// Add a file with arbitrary content under `profiles/`
    pub fn with_raw_file(self, file_name: &str, content: &[u8]) -> Self {
        fs::write(self.profiles().join(file_name), content).expect("Failed to write file");
        self
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for ProfileDirBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for one owner record
#[derive(Debug, Clone)]
pub struct OwnerSpec {
    id: i64,
    name: String,
    invalid: bool,
    assets_ms: Option<i64>,
    balance_ms: Option<i64>,
    next_ms: Option<i64>,
}

impl OwnerSpec {
    pub fn new(id: i64, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            invalid: false,
            assets_ms: None,
            balance_ms: None,
            next_ms: None,
        }
    }

    /// Set the assets refresh time
    pub fn updated_at(mut self, at: DateTime<Utc>) -> Self {
        self.assets_ms = Some(at.timestamp_millis());
        self
    }

    /// Set the balance refresh time
    pub fn balance_at(mut self, at: DateTime<Utc>) -> Self {
        self.balance_ms = Some(at.timestamp_millis());
        self
    }

    /// Set a scheduled next refresh, which must never count as an update
    pub fn next_update_at(mut self, at: DateTime<Utc>) -> Self {
        self.next_ms = Some(at.timestamp_millis());
        self
    }

    pub fn invalid(mut self) -> Self {
        self.invalid = true;
        self
    }

    fn to_xml(&self) -> String {
        let mut attrs = format!(
            "ownerid=\"{}\" name=\"{}\" invalid=\"{}\"",
            self.id,
            escape_attr(&self.name),
            self.invalid
        );
        for (key, value) in [
            ("assetslastupdate", self.assets_ms),
            ("balancelastupdate", self.balance_ms),
            ("assetsnextupdate", self.next_ms),
        ] {
            if let Some(ms) = value {
                attrs.push_str(&format!(" {}=\"{}\"", key, ms));
            }
        }
        format!("    <esiowner {}/>\n", attrs)
    }
}

fn escape_attr(raw: &str) -> String {
    raw.replace('&', "&amp;").replace('<', "&lt;").replace('"', "&quot;")
}

/// A fixed reference instant shared by tests
pub fn reference_now() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(1_760_000_000_000).expect("valid reference instant")
}

pub fn days_before(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now - Duration::days(days)
}
