//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

/// Default request body limit for uploads, in megabytes
pub const DEFAULT_MAX_UPLOAD_MB: usize = 20;

// =============================================================================
// STORAGE DEFAULTS
// =============================================================================

/// Directory holding the two table files
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Directory for uploaded project artifacts
pub const DEFAULT_PROJECTS_PATH: &str = "./uploaded_projects";

/// Directory for uploaded profile pictures
pub const DEFAULT_PROFILES_PATH: &str = "./user_profiles";

/// User table file name
pub const USER_TABLE_FILE: &str = "user_db_v2.csv";

/// Project table file name
pub const PROJECT_TABLE_FILE: &str = "project_db_v2.csv";

/// Column layout of the user table
pub const USER_COLUMNS: &[&str] = &["username", "password", "full_name", "role", "profile_pic"];

/// Column layout of the project table
pub const PROJECT_COLUMNS: &[&str] = &[
    "id",
    "username",
    "student_name",
    "category",
    "project_title",
    "description",
    "filename",
    "upload_time",
    "is_private",
    "instructor_grade",
    "instructor_review",
    "likes",
    "comments",
];

/// Timestamp layout used for `upload_time` and comment times (minute resolution)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// File name offered by the CSV export
pub const EXPORT_FILE_NAME: &str = "battle_data.csv";

// =============================================================================
// AUTHENTICATION DEFAULTS
// =============================================================================

/// Default JWT token expiry in hours
pub const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;

/// Maximum password length
pub const MAX_PASSWORD_LENGTH: u64 = 128;

/// Username minimum length
pub const MIN_USERNAME_LENGTH: u64 = 3;

/// Username maximum length
pub const MAX_USERNAME_LENGTH: u64 = 32;

/// Maximum display name length
pub const MAX_FULL_NAME_LENGTH: u64 = 100;

/// Identity synthesized for the shared-key instructor session
pub mod instructor {
    /// Reserved username; never stored as a row
    pub const USERNAME: &str = "admin";
    pub const FULL_NAME: &str = "Lead Instructor";
}

// =============================================================================
// PROJECTS
// =============================================================================

/// Lowest accepted grade
pub const MIN_GRADE: f64 = 0.0;

/// Highest accepted grade
pub const MAX_GRADE: f64 = 50.0;

/// Maximum project title length
pub const MAX_TITLE_LENGTH: u64 = 256;

/// Maximum project description length
pub const MAX_DESCRIPTION_LENGTH: u64 = 65535;

/// Maximum comment length
pub const MAX_COMMENT_LENGTH: u64 = 2000;

/// Maximum review length
pub const MAX_REVIEW_LENGTH: u64 = 65535;

/// Accepted file extensions for project artifacts
pub const ATTACHMENT_EXTENSIONS: &[&str] = &["csv", "xlsx", "pdf", "png", "jpg", "jpeg"];

/// Accepted file extensions for profile pictures
pub const AVATAR_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

// =============================================================================
// API VERSIONING
// =============================================================================

/// API base path
pub const API_BASE_PATH: &str = "/api/v1";
