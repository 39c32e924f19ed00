//! User model

use serde::{Deserialize, Serialize};

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Student,
    Instructor,
}

impl Role {
    /// Get role as string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Instructor => "Instructor",
        }
    }

    /// Parse role from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Student" => Some(Self::Student),
            "Instructor" => Some(Self::Instructor),
            _ => None,
        }
    }

    pub fn is_instructor(&self) -> bool {
        matches!(self, Self::Instructor)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row of the user table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    /// PHC-formatted argon2 hash (legacy rows hold a bare SHA-256 hex digest)
    #[serde(rename = "password")]
    pub password_hash: String,
    pub full_name: String,
    pub role: Role,
    /// Stored profile picture file name; `None` means the role-default icon
    #[serde(rename = "profile_pic")]
    pub avatar: Option<String>,
}

impl UserRecord {
    /// Build a fresh student account
    pub fn new_student(username: &str, password_hash: String, full_name: &str) -> Self {
        Self {
            username: username.to_string(),
            password_hash,
            full_name: full_name.to_string(),
            role: Role::Student,
            avatar: None,
        }
    }
}
