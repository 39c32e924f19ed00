//! Project request DTOs

use serde::Deserialize;
use validator::Validate;

use crate::{
    constants::{MAX_COMMENT_LENGTH, MAX_DESCRIPTION_LENGTH, MAX_GRADE, MAX_REVIEW_LENGTH, MAX_TITLE_LENGTH, MIN_GRADE},
    error::{AppError, AppResult},
    models::Category,
};

/// Listing filters
#[derive(Debug, Deserialize)]
pub struct ProjectListQuery {
    /// Category label; absent, blank or "All" means every category
    pub category: Option<String>,
    pub search: Option<String>,
}

impl ProjectListQuery {
    pub fn category(&self) -> AppResult<Option<Category>> {
        parse_category_filter(self.category.as_deref())
    }
}

/// Parse an optional category filter
pub fn parse_category_filter(raw: Option<&str>) -> AppResult<Option<Category>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(all) if all.eq_ignore_ascii_case("all") => Ok(None),
        Some(label) => Category::from_str(label)
            .map(Some)
            .ok_or_else(|| AppError::Validation(format!("Unknown category: {}", label))),
    }
}

/// Owner edit of title and description
#[derive(Debug, Deserialize, Validate)]
pub struct EditProjectRequest {
    #[validate(length(min = 1, max = MAX_TITLE_LENGTH))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = MAX_DESCRIPTION_LENGTH))]
    pub description: String,
}

/// Visibility change
#[derive(Debug, Deserialize)]
pub struct PrivacyRequest {
    pub is_private: bool,
}

/// New comment
#[derive(Debug, Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(length(min = 1, max = MAX_COMMENT_LENGTH))]
    pub text: String,
}

/// Instructor grading
#[derive(Debug, Deserialize, Validate)]
pub struct GradeRequest {
    #[validate(range(min = MIN_GRADE, max = MAX_GRADE))]
    pub grade: f64,

    #[serde(default)]
    #[validate(length(max = MAX_REVIEW_LENGTH))]
    pub review: String,
}
