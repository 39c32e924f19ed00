//! User profile handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::state::AppState;

/// User routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/me", patch(handler::update_profile))
        .route(
            "/me/avatar",
            post(handler::upload_avatar).delete(handler::remove_avatar),
        )
        .route("/{username}/avatar", get(handler::get_avatar))
}
