//! Health check endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use counter_store::CounterStore;
use serde::Serialize;

use crate::state::AppState;

/// Key read to check that the counter store answers.
const HEALTH_CHECK_KEY: &str = "health.check";

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub counter_store: &'static str,
    pub strategy: String,
    pub products: usize,
}

/// GET /health: reports service and counter store health.
///
/// Answers 503 when the counter store cannot be reached.
pub async fn check<S: CounterStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> (StatusCode, Json<HealthResponse>) {
    let engine = &state.engine;
    let reachable = match engine.store().get(HEALTH_CHECK_KEY).await {
        Ok(_) => true,
        Err(err) => {
            tracing::warn!(error = %err, "counter store health check failed");
            false
        }
    };

    let (code, status, counter_store) = if reachable {
        (StatusCode::OK, "ok", "up")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded", "down")
    };

    (
        code,
        Json(HealthResponse {
            status,
            counter_store,
            strategy: engine.strategy().to_string(),
            products: engine.catalog().len(),
        }),
    )
}
