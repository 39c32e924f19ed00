//! Instructor control panel handlers

mod handler;
pub mod response;

pub use handler::*;
pub use response::*;

use axum::{routing::get, Router};

use crate::state::AppState;

/// Admin routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/projects", get(handler::list_all_projects))
        .route("/export", get(handler::export_projects))
}
