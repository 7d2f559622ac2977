//! Health Check Endpoint
//!
//! `/health` is a liveness probe only. It never touches storage.

use axum::{routing::get, Json, Router};

use crate::routes::method_not_allowed;
use crate::state::AppState;
use crate::types::HealthResponse;

/// GET /health - Process liveness check
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Process is alive", body = HealthResponse),
    ),
))]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::OK)
}

pub fn create_router() -> Router<AppState> {
    Router::new().route("/health", get(health).fallback(method_not_allowed))
}
