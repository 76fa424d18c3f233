use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use serde_json::{json, Value};
use service::model::{ItemInput, NamedItem};
use service::root::ResourceRoot;
use service::store::CollectionStore;
use tracing::info;

use crate::errors::{ApiError, StoreAction};

/// Routes for one collection, meant to be nested under its segment
/// (`/samplers`, `/themes`, ...). `PUT` is accepted as an alias of `POST`.
pub fn routes(store: Arc<dyn CollectionStore>) -> Router {
    Router::new()
        .route("/", get(list_items).post(put_item).put(put_item))
        .route("/:name", get(get_item).delete(delete_item))
        .with_state(store)
}

pub async fn list_items(
    State(store): State<Arc<dyn CollectionStore>>,
    Extension(root): Extension<ResourceRoot>,
) -> Result<Json<Vec<NamedItem>>, ApiError> {
    match store.list(&root).await {
        Ok(items) => Ok(Json(items)),
        Err(e) => Err(ApiError::from_service(e, store.labels(), StoreAction::List)),
    }
}

pub async fn get_item(
    State(store): State<Arc<dyn CollectionStore>>,
    Extension(root): Extension<ResourceRoot>,
    Path(name): Path<String>,
) -> Result<Json<NamedItem>, ApiError> {
    match store.get(&root, &name).await {
        Ok(item) => Ok(Json(item)),
        Err(e) => Err(ApiError::from_service(e, store.labels(), StoreAction::Read)),
    }
}

/// Create or overwrite an item from a `{name, preset}` body.
pub async fn put_item(
    State(store): State<Arc<dyn CollectionStore>>,
    Extension(root): Extension<ResourceRoot>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = body.map_err(ApiError::from_json_rejection)?;
    let input = ItemInput::from_body(&body);
    let name = input.name.clone().unwrap_or_default();
    match store.put(&root, input).await {
        Ok(()) => {
            info!(resource = store.labels().singular, %name, "saved item");
            Ok(Json(json!({"success": true})))
        }
        Err(e) => Err(ApiError::from_service(e, store.labels(), StoreAction::Save)),
    }
}

pub async fn delete_item(
    State(store): State<Arc<dyn CollectionStore>>,
    Extension(root): Extension<ResourceRoot>,
    Path(name): Path<String>,
) -> Result<StatusCode, ApiError> {
    match store.delete(&root, &name).await {
        Ok(()) => {
            info!(resource = store.labels().singular, %name, "deleted item");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(e) => Err(ApiError::from_service(e, store.labels(), StoreAction::Delete)),
    }
}
