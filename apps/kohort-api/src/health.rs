//! Health endpoints.

use axum::{http::StatusCode, Extension, Json};
use kohort_db::DbPool;

/// Liveness: the process is up.
pub async fn healthz_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Readiness: the database answers.
pub async fn readyz_handler(
    Extension(pool): Extension<DbPool>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    match pool.ping().await {
        Ok(()) => Ok(Json(serde_json::json!({ "status": "ready" }))),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
