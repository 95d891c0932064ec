use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Environment variable naming the base directory that holds `.jeveassets`
pub const DATA_DIR_ENV: &str = "JEVEASSETS_DATA";

/// Directory name jEveAssets uses for its data under the base directory
pub const DATA_DIR_NAME: &str = ".jeveassets";

/// Get the jEveAssets data directory
///
/// Precedence: `explicit` override, then `$JEVEASSETS_DATA/.jeveassets`, then
/// `~/.jeveassets`.
pub fn get_data_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    let env_value = env::var(DATA_DIR_ENV).ok();
    resolve_data_dir(explicit, env_value.as_deref(), dirs::home_dir())
}

pub(crate) fn resolve_data_dir(
    explicit: Option<&Path>,
    env_value: Option<&str>,
    home: Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }

    if let Some(base) = env_value.map(str::trim).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(base).join(DATA_DIR_NAME));
    }

    let home = home.context("Could not determine home directory")?;
    Ok(home.join(DATA_DIR_NAME))
}
