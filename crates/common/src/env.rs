//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::{info, warn};

use crate::CoreError;

/// Ensure the home and content directories exist, creating them when missing.
pub async fn ensure_env(home_dir: &Path, content_dir: &Path) -> Result<(), CoreError> {
    for dir in [home_dir, content_dir] {
        if tokio::fs::metadata(dir).await.is_err() {
            warn!(dir = %dir.display(), "directory not found; creating it");
        }
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| CoreError::Io(format!("cannot create {}: {e}", dir.display())))?;
    }
    info!(home = %home_dir.display(), content = %content_dir.display(), "runtime directories ready");
    Ok(())
}
