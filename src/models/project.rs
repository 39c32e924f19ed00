//! Project model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::db::codec;

use super::Role;

/// Project category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Excel,
    #[serde(rename = "Power BI", alias = "PowerBI")]
    PowerBi,
    #[serde(rename = "Others", alias = "Other")]
    Other,
}

impl Category {
    /// Label as stored in the table
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excel => "Excel",
            Self::PowerBi => "Power BI",
            Self::Other => "Others",
        }
    }

    /// Parse a category label, accepting the short aliases too
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Excel" => Some(Self::Excel),
            "Power BI" | "PowerBI" => Some(Self::PowerBi),
            "Others" | "Other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A discussion entry on a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Author display name at the time of posting
    pub user: String,
    pub text: String,
    #[serde(with = "codec::timestamp")]
    pub time: NaiveDateTime,
}

/// One row of the project table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: i64,
    #[serde(rename = "username")]
    pub owner_username: String,
    /// Copied at submission; does not follow later renames
    #[serde(rename = "student_name")]
    pub owner_name: String,
    pub category: Category,
    #[serde(rename = "project_title")]
    pub title: String,
    pub description: String,
    #[serde(rename = "filename")]
    pub attachment: String,
    #[serde(rename = "upload_time", with = "codec::timestamp")]
    pub submitted_at: NaiveDateTime,
    #[serde(deserialize_with = "codec::flag")]
    pub is_private: bool,
    #[serde(rename = "instructor_grade")]
    pub grade: Option<f64>,
    #[serde(rename = "instructor_review")]
    pub review: String,
    #[serde(with = "codec::json_list")]
    pub likes: Vec<String>,
    #[serde(default, with = "codec::json_list")]
    pub comments: Vec<Comment>,
}

impl ProjectRecord {
    pub fn is_owned_by(&self, username: &str) -> bool {
        self.owner_username == username
    }

    /// Private projects are visible only to their owner and instructors
    pub fn is_visible_to(&self, username: &str, role: Role) -> bool {
        !self.is_private || self.is_owned_by(username) || role.is_instructor()
    }

    pub fn is_graded(&self) -> bool {
        self.grade.is_some()
    }

    /// Flip `username`'s like; returns whether the project is now liked by them
    pub fn toggle_like(&mut self, username: &str) -> bool {
        if let Some(pos) = self.likes.iter().position(|u| u == username) {
            self.likes.remove(pos);
            false
        } else {
            self.likes.push(username.to_string());
            true
        }
    }

    /// Case-insensitive substring match on the title, optionally on the owner name too.
    /// `needle` must already be lowercase.
    pub fn matches_search(&self, needle: &str, include_owner: bool) -> bool {
        self.title.to_lowercase().contains(needle)
            || (include_owner && self.owner_name.to_lowercase().contains(needle))
    }
}
