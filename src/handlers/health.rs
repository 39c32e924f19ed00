//! Health check handlers

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::{db::TableKind, state::AppState};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Table files currently missing from the data directory
    pub missing_tables: Vec<&'static str>,
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut missing_tables = Vec::new();
    for kind in TableKind::ALL {
        if !tokio::fs::try_exists(state.store().path(kind)).await.unwrap_or(false) {
            missing_tables.push(kind.name());
        }
    }

    let status = if missing_tables.is_empty() { "healthy" } else { "degraded" };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        missing_tables,
    })
}

/// Health routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
