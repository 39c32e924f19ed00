//! Dashboard and leaderboard handlers

mod handler;
pub mod response;

pub use handler::*;
pub use response::*;

use axum::{routing::get, Router};

use crate::state::AppState;

/// Stats routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(handler::get_dashboard))
        .route("/leaderboard", get(handler::get_leaderboard))
}
