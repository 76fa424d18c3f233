//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` to keep binary crates importing
//! `service::runtime::ensure_env` without depending directly on `common`.

use std::path::Path;

/// Ensure the data root and the default user's directory exist.
pub async fn ensure_env(data_root: &Path, default_user: &str) -> anyhow::Result<()> {
    common::env::ensure_env(data_root, default_user).await
}
