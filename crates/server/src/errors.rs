use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use service::model::ResourceLabels;
use thiserror::Error;
use tracing::{debug, error};

/// Store operation a handler was performing, used to phrase 500 messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreAction {
    Read,
    List,
    Save,
    Delete,
}

impl StoreAction {
    fn failure_message(self, labels: &ResourceLabels) -> String {
        match self {
            StoreAction::Read => format!("Failed to read {}", labels.singular),
            StoreAction::List => format!("Failed to read {}", labels.plural),
            StoreAction::Save => format!("Failed to save {}", labels.singular),
            StoreAction::Delete => format!("Failed to delete {}", labels.singular),
        }
    }
}

/// Error response rendered as `{"error": "<message>"}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Map a store outcome to a response. Only internal failures are logged
    /// at error level; the cause never reaches the client.
    pub fn from_service(err: ServiceError, labels: &ResourceLabels, action: StoreAction) -> Self {
        match err {
            ServiceError::Validation(msg) => {
                debug!(resource = labels.singular, %msg, "rejected request");
                Self::bad_request(msg)
            }
            ServiceError::NotFound(_) => {
                debug!(resource = labels.singular, ?action, "resource not found");
                Self::new(StatusCode::NOT_FOUND, format!("{} not found", labels.title))
            }
            other => {
                let message = action.failure_message(labels);
                error!(err = %other, resource = labels.singular, ?action, "{message}");
                Self::internal(message)
            }
        }
    }

    /// Body extraction failures keep axum's status but use the JSON error shape.
    pub fn from_json_rejection(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({"error": self.message}))).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
