//! Domain models
//!
//! Each record type doubles as the row layout of its table file.

pub mod project;
pub mod user;

pub use project::*;
pub use user::*;
