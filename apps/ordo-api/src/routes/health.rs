use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::warn;

use crate::dto::HealthResponse;
use crate::AppState;

/// `GET /health`: 200 while the database answers, 503 otherwise.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    if state.db.health_check().await {
        (StatusCode::OK, Json(HealthResponse { status: "ok" }))
    } else {
        warn!("Health check failed: database unreachable");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unavailable",
            }),
        )
    }
}
