//! Health check endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};

use crate::db;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/v1/health", get(health))
}

/// GET /api/v1/health
///
/// Reports whether the database is reachable. Returns 503 when it is not,
/// so load balancers can act on the status code alone.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let database_ok = db::check_health(state.db()).await;

    let status = if database_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let body = json!({
        "status": if database_ok { "ok" } else { "degraded" },
        "database": database_ok,
    });

    (status, Json(body))
}
