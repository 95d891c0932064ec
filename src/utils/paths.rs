use std::env;
use std::fs::File;
use std::path::Path;

use crate::error::StoreError;

/// Upper bound for profile files read in full (64MB)
pub const MAX_PROFILE_BYTES: u64 = 64 * 1024 * 1024;

/// Open a profile file read-only and check its size on the open handle
///
/// The standard library opens files with shared read/write/delete access on
/// Windows, so a running jEveAssets holding the file never blocks this call.
/// The size is checked on the handle rather than the path to avoid a
/// check-then-open race with the writer.
pub fn open_bounded(path: &Path, max_bytes: u64) -> Result<File, StoreError> {
    let file = File::open(path).map_err(|e| StoreError::unreadable(path, e))?;
    let size = file.metadata().map_err(|e| StoreError::unreadable(path, e))?.len();
    if size > max_bytes {
        return Err(StoreError::unreadable(
            path,
            format!("file too large ({} bytes, max {} bytes)", size, max_bytes),
        ));
    }
    Ok(file)
}

/// Formats a path with ~ substitution for the home directory
pub fn format_path_with_tilde(path: &Path) -> String {
    format_path_with_tilde_internal(path, None)
}

pub(crate) fn format_path_with_tilde_internal(path: &Path, home_override: Option<&str>) -> String {
    let home_from_env = env::var("HOME").ok();
    let home = home_override.or(home_from_env.as_deref()).filter(|h| !h.is_empty());

    if let Some(home) = home
        && let Ok(rest) = path.strip_prefix(home)
    {
        return if rest.as_os_str().is_empty() {
            "~".to_string()
        } else {
            Path::new("~").join(rest).to_string_lossy().into_owned()
        };
    }

    path.to_string_lossy().into_owned()
}
