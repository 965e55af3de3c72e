//! Health check handler

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health - Liveness plus database connectivity
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let db_healthy = state.database.is_healthy().await;

    Json(json!({
        "status": if db_healthy { "ok" } else { "degraded" },
        "database": db_healthy,
    }))
}
