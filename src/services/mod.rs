//! Business logic services

pub mod admin_service;
pub mod auth_service;
pub mod project_service;
pub mod stats_service;
pub mod user_service;

pub use admin_service::AdminService;
pub use auth_service::AuthService;
pub use project_service::ProjectService;
pub use stats_service::StatsService;
pub use user_service::UserService;
