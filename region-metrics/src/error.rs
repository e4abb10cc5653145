use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced to HTTP callers. Every variant renders as
/// `{"detail": "..."}` with the matching status code.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// None of the requested regions has a row in the dataset.
    #[error("No data for requested regions")]
    NotFound,
    /// The request body could not be turned into a `MetricsRequest`.
    #[error("{detail}")]
    InvalidRequest { status: StatusCode, detail: String },
    #[error("Not Found")]
    RouteNotFound,
}

impl MetricsError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            MetricsError::NotFound | MetricsError::RouteNotFound => StatusCode::NOT_FOUND,
            MetricsError::InvalidRequest { status, .. } => *status,
        }
    }
}

impl From<JsonRejection> for MetricsError {
    fn from(rejection: JsonRejection) -> Self {
        MetricsError::InvalidRequest {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for MetricsError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
