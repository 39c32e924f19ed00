//! Utility functions

pub mod crypto;
pub mod time;
pub mod validation;

pub use crypto::{hash_string, verify_hash};
pub use time::{now_minute, unix_now};
pub use validation::{sanitize_string, validate_username};
