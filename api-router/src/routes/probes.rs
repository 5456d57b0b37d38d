use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::api_state::ApiState;

/// Liveness probe: the process is up and routing.
pub async fn live() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Readiness probe: 200 while the data directory can be listed, else 503.
pub async fn ready(State(state): State<ApiState>) -> impl IntoResponse {
    let catalog = state.cache.catalog();
    if !catalog.is_readable().await {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "error",
                "checks": { "data_dir": "fail" },
                "reason": format!("cannot read {}", catalog.root().display())
            })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "checks": { "data_dir": "ok" },
            "cached_documents": state.cache.len().await
        })),
    )
}
