//! Insight Arena - Student Project Arena
//!
//! This library provides the core functionality for the Insight Arena
//! platform, where students submit data-analysis projects and instructors
//! grade and rank them.
//!
//! # Features
//!
//! - Student accounts and a shared-key instructor session
//! - Project submission with uploaded artifacts (Excel, Power BI, others)
//! - Private projects, likes and comments
//! - Grading, dashboard figures and a leaderboard
//! - CSV export of the whole project table
//!
//! # Architecture
//!
//! The application follows a layered architecture:
//! - **Handlers**: HTTP request handlers (thin layer)
//! - **Services**: Business logic
//! - **Repositories**: Record store access
//! - **Models**: Table rows and domain types

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

#[cfg(test)]
pub mod test_utils;

use axum::{extract::DefaultBodyLimit, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;

/// Build the full application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest(constants::API_BASE_PATH, handlers::routes(state.clone()))
        .layer(DefaultBodyLimit::max(state.config().server.max_upload_bytes))
        .layer(axum::middleware::from_fn(middleware::logging::logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
