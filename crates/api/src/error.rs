//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use counter_store::CounterStoreError;
use thiserror::Error;

/// API-level error type that maps to HTTP responses.
///
/// Business outcomes (unknown product, no stock left) are answered with a
/// status body and never travel through this type.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The counter store failed; nothing was committed.
    #[error("Counter store error: {0}")]
    Store(#[from] CounterStoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Store(err) => {
                tracing::error!(error = %err, "counter store failure");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}
