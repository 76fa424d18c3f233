use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{extract::{Request, State}, http::{HeaderMap, HeaderName}, middleware::Next, response::Response};
use configs::StorageConfig;
use common::utils::path::is_safe_segment;
use service::root::ResourceRoot;
use tracing::{debug, error, warn};

use crate::errors::{ApiError, StartupError};

/// Maps a caller's user handle to their `ResourceRoot` under the data root.
///
/// Stands in for the host's identity context: when an upstream layer already
/// put a [`ResourceRoot`] into the request extensions, that one is used as is.
#[derive(Clone, Debug)]
pub struct UserDirectories {
    data_root: PathBuf,
    default_user: String,
    header: HeaderName,
}

impl UserDirectories {
    pub fn new<P: Into<PathBuf>>(data_root: P, default_user: &str, header: &str) -> Result<Self, StartupError> {
        if !is_safe_segment(default_user) {
            return Err(StartupError::InvalidConfig(format!("default user {default_user:?} is not a valid handle")));
        }
        let header = HeaderName::from_bytes(header.trim().to_ascii_lowercase().as_bytes())
            .map_err(|e| StartupError::InvalidConfig(format!("user header {header:?}: {e}")))?;
        Ok(Self { data_root: data_root.into(), default_user: default_user.to_string(), header })
    }

    pub fn from_config(cfg: &StorageConfig) -> Result<Self, StartupError> {
        Self::new(&cfg.data_root, &cfg.default_user, &cfg.user_header)
    }

    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    pub fn default_user(&self) -> &str {
        &self.default_user
    }

    pub fn root_for(&self, handle: &str) -> ResourceRoot {
        ResourceRoot::new(self.data_root.join(handle))
    }

    fn handle_from<'a>(&'a self, headers: &'a HeaderMap) -> Result<&'a str, ApiError> {
        let Some(value) = headers.get(&self.header) else {
            return Ok(&self.default_user);
        };
        let handle = value
            .to_str()
            .map_err(|_| ApiError::bad_request("Invalid user handle"))?
            .trim();
        if handle.is_empty() {
            return Ok(&self.default_user);
        }
        if !is_safe_segment(handle) {
            warn!(%handle, "rejected unsafe user handle");
            return Err(ApiError::bad_request("Invalid user handle"));
        }
        Ok(handle)
    }
}

/// Middleware: attach the caller's `ResourceRoot` to the request.
pub async fn resolve_user_root(
    State(users): State<Arc<UserDirectories>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if req.extensions().get::<ResourceRoot>().is_none() {
        let handle = users.handle_from(req.headers())?.to_owned();
        let root = users.root_for(&handle);
        // 用户目录通常由宿主创建；这里补建以便独立运行
        if let Err(e) = tokio::fs::create_dir_all(root.path()).await {
            error!(%handle, err = %e, "cannot prepare user directory");
            return Err(ApiError::internal("Failed to resolve user directory"));
        }
        debug!(%handle, root = %root.path().display(), "resolved user root");
        req.extensions_mut().insert(root);
    }
    Ok(next.run(req).await)
}
