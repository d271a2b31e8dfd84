//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` so binary crates can prepare the
//! configured directories without depending directly on `common`.

use configs::PathsConfig;

/// Ensure the home and content directories exist before serving.
pub async fn ensure_env(paths: &PathsConfig) -> anyhow::Result<()> {
    common::env::ensure_env(&paths.home_dir, &paths.content_dir()).await?;
    Ok(())
}
