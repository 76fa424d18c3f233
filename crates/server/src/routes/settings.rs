use std::sync::Arc;

use axum::{extract::{rejection::JsonRejection, State}, routing::get, Extension, Json, Router};
use serde_json::{json, Value};
use service::model::SETTINGS_LABELS;
use service::root::ResourceRoot;
use service::store::SettingsStore;
use tracing::info;

use crate::errors::{ApiError, StoreAction};

pub fn routes(store: Arc<dyn SettingsStore>) -> Router {
    Router::new()
        .route("/settings", get(read_settings).post(write_settings))
        .with_state(store)
}

/// Current settings document, `{}` when none was saved yet.
pub async fn read_settings(
    State(store): State<Arc<dyn SettingsStore>>,
    Extension(root): Extension<ResourceRoot>,
) -> Result<Json<Value>, ApiError> {
    store
        .read(&root)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_service(e, &SETTINGS_LABELS, StoreAction::Read))
}

/// Replace the settings document with the request body.
pub async fn write_settings(
    State(store): State<Arc<dyn SettingsStore>>,
    Extension(root): Extension<ResourceRoot>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(settings) = body.map_err(ApiError::from_json_rejection)?;
    store
        .write(&root, &settings)
        .await
        .map_err(|e| ApiError::from_service(e, &SETTINGS_LABELS, StoreAction::Save))?;
    info!(root = %root.path().display(), "saved settings");
    Ok(Json(json!({"success": true})))
}
