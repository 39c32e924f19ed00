//! Input validation utilities

use crate::constants::{self, MAX_USERNAME_LENGTH, MIN_USERNAME_LENGTH};

/// Validate username format
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    let len = username.chars().count() as u64;
    if len < MIN_USERNAME_LENGTH {
        return Err("Username must be at least 3 characters");
    }
    if len > MAX_USERNAME_LENGTH {
        return Err("Username must be at most 32 characters");
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.')
    {
        return Err("Username can only contain letters, numbers, dots, underscores, and hyphens");
    }
    if username == constants::instructor::USERNAME {
        return Err("Username is reserved");
    }
    Ok(())
}

/// Sanitize string input (remove control characters, trim whitespace)
pub fn sanitize_string(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Sanitize a required text field, rejecting it when nothing is left
pub fn require_text(input: &str, field: &'static str) -> Result<String, String> {
    let sanitized = sanitize_string(input);
    if sanitized.is_empty() {
        return Err(format!("{field} cannot be empty"));
    }
    Ok(sanitized)
}

/// Lowercased extension of a file name
pub fn file_extension(file_name: &str) -> Option<String> {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Validate that a file name carries one of the `allowed` extensions
pub fn validate_extension(file_name: &str, allowed: &[&str]) -> Result<String, String> {
    match file_extension(file_name) {
        Some(ext) if allowed.contains(&ext.as_str()) => Ok(ext),
        _ => Err(format!(
            "Unsupported file type. Allowed types: {}",
            allowed.join(", ")
        )),
    }
}

/// Validate a grade against the accepted range
pub fn validate_grade(score: f64) -> Result<(), String> {
    if !score.is_finite() || !(constants::MIN_GRADE..=constants::MAX_GRADE).contains(&score) {
        return Err(format!(
            "Grade must be between {} and {}",
            constants::MIN_GRADE,
            constants::MAX_GRADE
        ));
    }
    Ok(())
}
