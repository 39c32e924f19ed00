//! User request DTOs

use serde::Deserialize;
use validator::Validate;

use crate::constants::MAX_FULL_NAME_LENGTH;

/// Display name change
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = MAX_FULL_NAME_LENGTH))]
    pub full_name: String,
}
