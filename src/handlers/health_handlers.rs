//! Liveness & database health handlers.
//!
//! - GET /           -> liveness message, no I/O
//! - GET /health/db  -> pings the document store

use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

/// `GET /`
pub async fn root() -> impl IntoResponse {
    Json(RootResponse {
        message: "API is running",
    })
}

/// `GET /health/db`
///
/// HTTP 200 when the document store answers a ping, HTTP 503 otherwise.
pub async fn database_health(State(state): State<AppState>) -> impl IntoResponse {
    let database = state.documents.database_name().to_string();
    match state.documents.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(DbHealthResponse {
                status: "ok",
                database,
                detail: None,
            }),
        ),
        Err(err) => {
            tracing::warn!(error = %err, "database ping failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(DbHealthResponse {
                    status: "error",
                    database,
                    detail: Some(err.to_string()),
                }),
            )
        }
    }
}

#[derive(Serialize)]
struct RootResponse {
    message: &'static str,
}

#[derive(Serialize)]
struct DbHealthResponse {
    status: &'static str,
    database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}
