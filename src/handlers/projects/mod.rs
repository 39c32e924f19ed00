//! Project handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;

/// Project routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handler::submit_project).get(handler::list_projects))
        .route("/mine", get(handler::list_my_projects))
        .route(
            "/{id}",
            get(handler::get_project)
                .patch(handler::edit_project)
                .delete(handler::delete_project),
        )
        .route("/{id}/privacy", put(handler::set_privacy))
        .route("/{id}/likes", post(handler::toggle_like))
        .route("/{id}/comments", post(handler::add_comment))
        .route("/{id}/grade", put(handler::grade_project))
        .route("/{id}/attachment", get(handler::download_attachment))
}
