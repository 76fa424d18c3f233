use std::{future::Future, sync::Arc};

use common::utils::logging::init_logging_from_env;
use configs::AppConfig;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::plugins::PluginRegistry;
use crate::routes::{self, users::UserDirectories};
use service::runtime;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // no signal handler available: run until the process is killed
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, shutting down");
}

/// Public entry: load configuration and run the HTTP server until Ctrl+C.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_from_env();

    let cfg = AppConfig::load_or_env().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    serve(cfg, shutdown_signal()).await
}

/// Build the app from `cfg` and serve it until `shutdown` resolves.
pub async fn serve<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let users = Arc::new(UserDirectories::from_config(&cfg.storage)?);
    runtime::ensure_env(users.data_root(), users.default_user())
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;

    let registry = PluginRegistry::from_config(&cfg.plugins)?;
    let app = routes::build_router(&registry, Arc::clone(&users), build_cors(), cfg.server.max_body_bytes);

    let listener = tokio::net::TcpListener::bind((cfg.server.host.as_str(), cfg.server.port)).await?;
    let addr = listener.local_addr()?;
    info!(
        %addr,
        data_root = %users.data_root().display(),
        plugins = ?registry.infos().iter().map(|p| p.id).collect::<Vec<_>>(),
        "starting server"
    );
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;

    registry.shutdown();
    info!(event = "stop", "server stopped");
    Ok(())
}
