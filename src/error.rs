//! Failure taxonomy for profile scans.
//!
//! Per-store failures ([`StoreError`]) never abort a scan; the scanner folds them
//! into the report as skipped stores. [`ScanError`] is reserved for conditions
//! that make the whole scan meaningless.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// Why a discovered store was left out of the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    UnreadableFile,
    UnknownFormat,
    SchemaMismatch,
    ParseError,
    TimedOut,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureKind::UnreadableFile => "unreadable file",
            FailureKind::UnknownFormat => "unknown format",
            FailureKind::SchemaMismatch => "schema mismatch",
            FailureKind::ParseError => "parse error",
            FailureKind::TimedOut => "timed out",
        };
        f.write_str(label)
    }
}

/// A failure local to one store file
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot read {}: {reason}", path.display())]
    Unreadable { path: PathBuf, reason: String },

    #[error("no known owner layout in {} (tried {tried})", path.display())]
    SchemaMismatch { path: PathBuf, tried: String },

    #[error("malformed profile {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("reading {} took {}ms, limit exceeded", path.display(), elapsed.as_millis())]
    TimedOut { path: PathBuf, elapsed: Duration },
}

impl StoreError {
    pub fn unreadable(path: &Path, reason: impl fmt::Display) -> Self {
        StoreError::Unreadable { path: path.to_path_buf(), reason: reason.to_string() }
    }

    pub fn parse(path: &Path, message: impl fmt::Display) -> Self {
        StoreError::Parse { path: path.to_path_buf(), message: message.to_string() }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            StoreError::Unreadable { .. } => FailureKind::UnreadableFile,
            StoreError::SchemaMismatch { .. } => FailureKind::SchemaMismatch,
            StoreError::Parse { .. } => FailureKind::ParseError,
            StoreError::TimedOut { .. } => FailureKind::TimedOut,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            StoreError::Unreadable { path, .. }
            | StoreError::SchemaMismatch { path, .. }
            | StoreError::Parse { path, .. }
            | StoreError::TimedOut { path, .. } => path,
        }
    }
}

/// A failure that aborts the current scan
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("cannot list data directory {}: {source}", path.display())]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("scan aborted: {reason}")]
    Fatal { reason: String },
}
