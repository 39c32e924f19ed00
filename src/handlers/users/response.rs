//! User response DTOs

use serde::Serialize;

use crate::handlers::auth::UserResponse;

/// Profile after an edit
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: UserResponse,
}
