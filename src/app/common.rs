use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::Level;

use crate::utils::{CinerateResult, Error};

pub fn init_logging(config: &crate::config::Config) {
    tracing_subscriber::fmt()
        .with_max_level(Level::from_str(&config.logs.level).unwrap_or(Level::INFO))
        .init();
}

/// Make every folder given on the command line absolute and check that it
/// is a directory.
pub fn resolve_roots(paths: &[PathBuf]) -> CinerateResult<Vec<PathBuf>> {
    paths.iter().map(|p| resolve_root(p)).collect()
}

fn resolve_root(path: &Path) -> CinerateResult<PathBuf> {
    let root = std::path::absolute(path)
        .map_err(|e| Error::Other(format!("Could not expand path '{}': {e}", path.display())))?;

    if !root.exists() {
        return Err(Error::Other(format!(
            "Folder '{}' does not exist",
            root.display()
        )));
    }
    if !root.is_dir() {
        return Err(Error::Other(format!(
            "'{}' exists but is not a directory",
            root.display()
        )));
    }
    tracing::info!("Given path is '{}'", root.display());
    Ok(root)
}
