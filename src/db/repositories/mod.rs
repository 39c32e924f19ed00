//! Table repositories
//!
//! Repositories wrap the record store with keyed lookups and single-row edits.

pub mod project_repo;
pub mod user_repo;

pub use project_repo::ProjectRepository;
pub use user_repo::UserRepository;
