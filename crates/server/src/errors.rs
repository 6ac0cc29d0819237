use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use service::errors::ServiceError;

/// Error envelope for the JSON API.
///
/// Validation failures carry a field-to-message map rendered as
/// `{"errors": {...}}`; everything else renders as `{"error": "..."}`.
/// Internal failures are logged and never echo their details.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: String,
    pub fields: Option<BTreeMap<String, String>>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: impl Into<String>) -> Self {
        Self { status, title: title.into(), fields: None }
    }

    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(field.to_string(), message.into());
        Self {
            status: StatusCode::BAD_REQUEST,
            title: "Validation Error".into(),
            fields: Some(fields),
        }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        match self.fields {
            Some(fields) => (self.status, Json(serde_json::json!({ "errors": fields }))).into_response(),
            None => (self.status, Json(serde_json::json!({ "error": self.title }))).into_response(),
        }
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation { field, message } => Self::validation(&field, message),
            ServiceError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, msg),
            ServiceError::Conflict(msg) => Self::new(StatusCode::CONFLICT, msg),
            ServiceError::Db(msg) => {
                error!(err = %msg, "internal error");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        }
    }
}
