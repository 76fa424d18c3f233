//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::{info, warn};

/// Ensure the data root and the default user's directory exist.
///
/// Per-user roots are normally provisioned by the host; the default user is
/// created here so a fresh checkout can serve requests immediately.
pub async fn ensure_env(data_root: &Path, default_user: &str) -> anyhow::Result<()> {
    if tokio::fs::metadata(data_root).await.is_err() {
        warn!(data_root = %data_root.display(), "data root not found; creating it");
    }
    let user_root = data_root.join(default_user);
    tokio::fs::create_dir_all(&user_root)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", user_root.display()))?;
    info!(user_root = %user_root.display(), "default user directory ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ensure_env_creates_default_user_dir() -> anyhow::Result<()> {
        let root = std::env::temp_dir().join(format!("common_env_{}", uuid::Uuid::new_v4()));
        ensure_env(&root, "default-user").await?;
        assert!(tokio::fs::metadata(root.join("default-user")).await?.is_dir());

        // second call is a no-op
        ensure_env(&root, "default-user").await?;

        let _ = tokio::fs::remove_dir_all(&root).await;
        Ok(())
    }
}
