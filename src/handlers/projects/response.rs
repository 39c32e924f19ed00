//! Project response DTOs

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::{
    middleware::auth::AuthenticatedUser,
    models::{Category, Comment, ProjectRecord},
};

/// A project as seen by one viewer
#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: i64,
    pub owner_username: String,
    pub owner_name: String,
    pub category: Category,
    pub title: String,
    pub description: String,
    pub attachment: String,
    #[serde(with = "crate::db::codec::timestamp")]
    pub submitted_at: NaiveDateTime,
    pub is_private: bool,
    pub grade: Option<f64>,
    pub review: String,
    pub like_count: usize,
    pub liked_by_me: bool,
    pub is_mine: bool,
    pub comments: Vec<CommentResponse>,
}

impl ProjectResponse {
    /// The review text is only shown to the owner and to instructors
    pub fn for_viewer(project: ProjectRecord, viewer: &AuthenticatedUser) -> Self {
        let is_mine = project.is_owned_by(&viewer.username);
        let review = if is_mine || viewer.is_instructor() {
            project.review
        } else {
            String::new()
        };

        Self {
            liked_by_me: project.likes.iter().any(|u| *u == viewer.username),
            is_mine,
            like_count: project.likes.len(),
            id: project.id,
            owner_username: project.owner_username,
            owner_name: project.owner_name,
            category: project.category,
            title: project.title,
            description: project.description,
            attachment: project.attachment,
            submitted_at: project.submitted_at,
            is_private: project.is_private,
            grade: project.grade,
            review,
            comments: project.comments.into_iter().map(CommentResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub user: String,
    pub text: String,
    #[serde(with = "crate::db::codec::timestamp")]
    pub time: NaiveDateTime,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            user: comment.user,
            text: comment.text,
            time: comment.time,
        }
    }
}

/// Listing response
#[derive(Debug, Serialize)]
pub struct ProjectListResponse {
    pub projects: Vec<ProjectResponse>,
    pub total: usize,
}
