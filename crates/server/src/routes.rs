use std::sync::Arc;

use axum::{extract::{DefaultBodyLimit, State}, middleware, routing::get, Json, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;

use common::types::Health;
use service::profile::PluginInfo;

use crate::plugins::{PluginRegistry, PLUGIN_PREFIX};

pub mod collections;
pub mod settings;
pub mod users;

use users::{resolve_user_root, UserDirectories};

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Descriptors of every loaded plugin.
pub async fn list_plugins(State(infos): State<Arc<Vec<PluginInfo>>>) -> Json<Vec<PluginInfo>> {
    Json(infos.as_ref().clone())
}

/// Build the full application router: health, plugin listing and every
/// plugin's endpoints behind the user-root middleware.
pub fn build_router(
    registry: &PluginRegistry,
    users: Arc<UserDirectories>,
    cors: CorsLayer,
    max_body_bytes: usize,
) -> Router {
    let public: Router = Router::new()
        .route("/health", get(health))
        .route(PLUGIN_PREFIX, get(list_plugins))
        .with_state(Arc::new(registry.infos()));

    let plugins = registry
        .mount()
        .layer(middleware::from_fn_with_state(users, resolve_user_root));

    public.merge(plugins).layer(
        ServiceBuilder::new()
            .layer(
                TraceLayer::new_for_http()
                    // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                    .make_span_with(
                        DefaultMakeSpan::new()
                            .level(Level::INFO)
                            .include_headers(false),
                    )
                    .on_request(DefaultOnRequest::new().level(Level::INFO))
                    // 响应返回时打点，包含状态码与耗时
                    .on_response(
                        DefaultOnResponse::new()
                            .level(Level::INFO)
                            .include_headers(false),
                    )
                    // 失败（5xx 等）时以 ERROR 记录
                    .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
            )
            .layer(cors)
            .layer(DefaultBodyLimit::max(max_body_bytes)),
    )
}
