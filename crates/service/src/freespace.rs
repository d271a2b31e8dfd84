use std::path::{Path, PathBuf};

use configs::PathsConfig;
use tracing::warn;

use crate::errors::ServiceError;

/// Alias clients use for the configured content directory.
pub const CONTENT_ALIAS: &str = "Content";

/// Map the `path` query parameter to a directory on disk.
pub fn resolve_path(paths: &PathsConfig, requested: Option<&str>) -> PathBuf {
    match requested {
        None => paths.home_dir.clone(),
        Some(CONTENT_ALIAS) => paths.content_dir(),
        Some(other) => PathBuf::from(other),
    }
}

/// Bytes available to unprivileged users on the filesystem holding `path`.
pub fn free_space(path: &Path) -> Result<u64, ServiceError> {
    if !path.exists() {
        return Err(ServiceError::Validation(format!("path '{}' does not exist", path.display())));
    }
    fs2::available_space(path).map_err(|e| {
        warn!(path = %path.display(), err = %e, "free space lookup failed");
        ServiceError::Validation(format!("cannot read free space for '{}': {e}", path.display()))
    })
}

/// Like [`free_space`], but measures the closest existing ancestor when `path`
/// has not been created yet.
pub fn free_space_nearest(path: &Path) -> Result<u64, ServiceError> {
    let existing = path.ancestors().find(|p| p.exists()).unwrap_or(Path::new("."));
    free_space(existing)
}

pub fn free_space_for(paths: &PathsConfig, requested: Option<&str>) -> Result<u64, ServiceError> {
    free_space(&resolve_path(paths, requested))
}
