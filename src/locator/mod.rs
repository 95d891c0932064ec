//! Profile discovery inside a jEveAssets data directory
//!
//! jEveAssets keeps its profiles under `<data dir>/profiles/`, typically as
//! `#Default.db` (newer releases), `#Default.xml` and `#Default.xmlbackup`.
//! The locator lists plausible files without opening any of them.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::ScanError;

/// Subdirectory of the data directory that holds profile files
pub const PROFILES_DIR: &str = "profiles";

/// File extensions that may hold profile data (compared case-insensitively)
const CANDIDATE_EXTENSIONS: &[&str] = &["db", "xml", "xmlbackup"];

/// Maximum number of candidate files considered per scan
const MAX_CANDIDATES: usize = 256;

/// A file that plausibly contains profile data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreCandidate {
    pub path: PathBuf,
    pub modified: DateTime<Utc>,
}

/// Directory actually listed for a data directory: `profiles/` if present,
/// otherwise the data directory itself
pub fn profiles_dir(data_dir: &Path) -> PathBuf {
    let profiles = data_dir.join(PROFILES_DIR);
    if profiles.is_dir() { profiles } else { data_dir.to_path_buf() }
}

/// Find candidate profile files, newest first
///
/// Returns an empty Vec when the directory does not exist, so callers can tell
/// "no profile found" apart from a failed scan.
///
/// # Errors
///
/// Returns [`ScanError::DirectoryUnreadable`] when the directory exists but
/// cannot be listed.
pub fn locate_stores(data_dir: &Path) -> Result<Vec<StoreCandidate>, ScanError> {
    let dir = profiles_dir(data_dir);
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "profile directory not found");
        return Ok(Vec::new());
    }

    let mut candidates = Vec::new();
    let walker = WalkDir::new(&dir).min_depth(1).max_depth(1).follow_links(false);

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            // depth 0 is the directory itself
            Err(err) if err.depth() == 0 => {
                let source = err
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
                return Err(ScanError::DirectoryUnreadable { path: dir, source });
            }
            Err(err) => {
                warn!("Skipping unlistable entry in {}: {}", dir.display(), err);
                continue;
            }
        };

        if !entry.file_type().is_file() || !has_candidate_extension(entry.path()) {
            continue;
        }

        let modified = entry
            .metadata()
            .ok()
            .and_then(|m| m.modified().ok())
            .unwrap_or(SystemTime::UNIX_EPOCH);

        candidates.push(StoreCandidate {
            path: entry.into_path(),
            modified: DateTime::<Utc>::from(modified),
        });
    }

    // Newest first; path order keeps equal mtimes deterministic
    candidates.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.path.cmp(&b.path)));

    if candidates.len() > MAX_CANDIDATES {
        warn!(
            "{} profile candidates in {}, keeping the newest {}",
            candidates.len(),
            dir.display(),
            MAX_CANDIDATES
        );
        candidates.truncate(MAX_CANDIDATES);
    }

    debug!(dir = %dir.display(), count = candidates.len(), "located profile candidates");
    Ok(candidates)
}

fn has_candidate_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| CANDIDATE_EXTENSIONS.iter().any(|c| ext.eq_ignore_ascii_case(c)))
}
