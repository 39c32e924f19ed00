//! HTTP Request Handlers
//!
//! This module contains all HTTP request handlers organized by domain.

pub mod admin;
pub mod auth;
pub mod form;
pub mod health;
pub mod projects;
pub mod stats;
pub mod users;

use axum::{middleware, Router};

use crate::{middleware::auth::auth_middleware, state::AppState};

/// Create all API routes
pub fn routes(state: AppState) -> Router<AppState> {
    let session = Router::new()
        .nest("/users", users::routes())
        .nest("/projects", projects::routes())
        .nest("/admin", admin::routes())
        .merge(stats::routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(health::routes())
        .nest("/auth", auth::routes(state))
        .merge(session)
}
