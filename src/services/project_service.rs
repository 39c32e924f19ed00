//! Project service

use std::path::PathBuf;

use tracing::info;

use crate::{
    constants::{MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH},
    db::{repositories::ProjectRepository, RecordStore},
    error::{AppError, AppResult},
    middleware::auth::AuthenticatedUser,
    models::{Category, Comment, ProjectRecord},
    storage::{FileStore, UploadedFile},
    utils::{
        time::{now_minute, unix_now},
        validation::{require_text, sanitize_string, validate_grade},
    },
};

/// Input for a new submission
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub category: Category,
    pub title: String,
    pub description: String,
    pub is_private: bool,
    pub file: Option<UploadedFile>,
}

/// Listing filters
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub category: Option<Category>,
    /// Case-insensitive substring
    pub search: Option<String>,
    /// Match `search` against the owner display name as well as the title
    pub search_owner_name: bool,
    /// Restrict to one owner's projects
    pub owner: Option<String>,
}

/// Project service for business logic
pub struct ProjectService;

impl ProjectService {
    /// Submit a project with its artifact
    pub async fn submit(
        store: &RecordStore,
        files: &FileStore,
        viewer: &AuthenticatedUser,
        submission: NewSubmission,
    ) -> AppResult<ProjectRecord> {
        viewer.require_student()?;

        let (title, description) = project_fields(&submission.title, &submission.description)?;
        let file = submission
            .file
            .filter(|f| !f.bytes.is_empty())
            .ok_or_else(|| AppError::Validation("A project file is required".to_string()))?;

        let timestamp = unix_now();
        let attachment = files.save_attachment(&file.file_name, &file.bytes, timestamp).await?;

        let draft = ProjectRecord {
            id: timestamp,
            owner_username: viewer.username.clone(),
            owner_name: viewer.full_name.clone(),
            category: submission.category,
            title,
            description,
            attachment: attachment.clone(),
            submitted_at: now_minute(),
            is_private: submission.is_private,
            grade: None,
            review: String::new(),
            likes: Vec::new(),
            comments: Vec::new(),
        };

        match ProjectRepository::create(store, draft, timestamp).await {
            Ok(project) => {
                info!(id = project.id, owner = %project.owner_username, "Project submitted");
                Ok(project)
            }
            Err(e) => {
                files.remove_attachment(&attachment).await;
                Err(e)
            }
        }
    }

    /// Projects the viewer may see, after filters, in insertion order
    pub async fn list_visible(
        store: &RecordStore,
        viewer: &AuthenticatedUser,
        filter: &ProjectFilter,
    ) -> Vec<ProjectRecord> {
        let projects = ProjectRepository::list_all(store).await;
        Self::filter_visible(projects, viewer, filter)
    }

    /// Apply visibility and listing filters to a loaded table
    pub fn filter_visible(
        projects: Vec<ProjectRecord>,
        viewer: &AuthenticatedUser,
        filter: &ProjectFilter,
    ) -> Vec<ProjectRecord> {
        let needle = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        projects
            .into_iter()
            .filter(|p| p.is_visible_to(&viewer.username, viewer.role))
            .filter(|p| filter.owner.as_deref().is_none_or(|owner| p.is_owned_by(owner)))
            .filter(|p| filter.category.is_none_or(|c| p.category == c))
            .filter(|p| {
                needle
                    .as_deref()
                    .is_none_or(|n| p.matches_search(n, filter.search_owner_name))
            })
            .collect()
    }

    /// One project, if the viewer may see it
    pub async fn get_visible(
        store: &RecordStore,
        viewer: &AuthenticatedUser,
        id: i64,
    ) -> AppResult<ProjectRecord> {
        ProjectRepository::find_by_id(store, id)
            .await
            .filter(|p| p.is_visible_to(&viewer.username, viewer.role))
            .ok_or_else(not_found)
    }

    /// Add or remove the viewer's like
    pub async fn toggle_like(
        store: &RecordStore,
        viewer: &AuthenticatedUser,
        id: i64,
    ) -> AppResult<ProjectRecord> {
        ProjectRepository::update_by_id(store, id, |project| {
            ensure_visible(project, viewer)?;
            project.toggle_like(&viewer.username);
            Ok(project.clone())
        })
        .await
    }

    /// Append a comment under the viewer's display name
    pub async fn add_comment(
        store: &RecordStore,
        viewer: &AuthenticatedUser,
        id: i64,
        text: &str,
    ) -> AppResult<ProjectRecord> {
        let text = require_text(text, "Comment").map_err(AppError::Validation)?;

        ProjectRepository::update_by_id(store, id, |project| {
            ensure_visible(project, viewer)?;
            project.comments.push(Comment {
                user: viewer.full_name.clone(),
                text,
                time: now_minute(),
            });
            Ok(project.clone())
        })
        .await
    }

    /// Set grade and review; overwrites any earlier grading
    pub async fn grade(
        store: &RecordStore,
        viewer: &AuthenticatedUser,
        id: i64,
        score: f64,
        review: &str,
    ) -> AppResult<ProjectRecord> {
        viewer.require_instructor()?;
        validate_grade(score).map_err(AppError::Validation)?;
        let review = sanitize_string(review);

        let project = ProjectRepository::update_by_id(store, id, |project| {
            project.grade = Some(score);
            project.review = review;
            Ok(project.clone())
        })
        .await?;

        info!(id, grade = score, grader = %viewer.username, "Project graded");
        Ok(project)
    }

    /// Owner edit of title and description
    pub async fn edit_own_fields(
        store: &RecordStore,
        viewer: &AuthenticatedUser,
        id: i64,
        title: &str,
        description: &str,
    ) -> AppResult<ProjectRecord> {
        let (title, description) = project_fields(title, description)?;

        ProjectRepository::update_by_id(store, id, |project| {
            ensure_owner(project, viewer)?;
            project.title = title;
            project.description = description;
            Ok(project.clone())
        })
        .await
    }

    /// Owner change of the private flag
    pub async fn set_privacy(
        store: &RecordStore,
        viewer: &AuthenticatedUser,
        id: i64,
        is_private: bool,
    ) -> AppResult<ProjectRecord> {
        ProjectRepository::update_by_id(store, id, |project| {
            ensure_owner(project, viewer)?;
            project.is_private = is_private;
            Ok(project.clone())
        })
        .await
    }

    /// Owner removal of a project and its artifact
    pub async fn delete(
        store: &RecordStore,
        files: &FileStore,
        viewer: &AuthenticatedUser,
        id: i64,
    ) -> AppResult<()> {
        let removed = ProjectRepository::delete_by_id(store, id, |project| ensure_owner(project, viewer))
            .await?;

        files.remove_attachment(&removed.attachment).await;
        info!(id, owner = %removed.owner_username, "Project deleted");
        Ok(())
    }

    /// Location and stored name of a visible project's artifact
    pub async fn attachment(
        store: &RecordStore,
        files: &FileStore,
        viewer: &AuthenticatedUser,
        id: i64,
    ) -> AppResult<(PathBuf, String)> {
        let project = Self::get_visible(store, viewer, id).await?;
        let path = files
            .attachment_path(&project.attachment)
            .ok_or_else(|| AppError::NotFound("Attachment not found".to_string()))?;

        Ok((path, project.attachment))
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Project not found".to_string())
}

/// Sanitized title and description within their length limits
fn project_fields(title: &str, description: &str) -> AppResult<(String, String)> {
    let title = require_text(title, "Project title").map_err(AppError::Validation)?;
    if title.chars().count() as u64 > MAX_TITLE_LENGTH {
        return Err(AppError::Validation(format!(
            "Project title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }

    let description = sanitize_string(description);
    if description.chars().count() as u64 > MAX_DESCRIPTION_LENGTH {
        return Err(AppError::Validation(format!(
            "Description must be at most {MAX_DESCRIPTION_LENGTH} characters"
        )));
    }

    Ok((title, description))
}

/// Invisible projects are reported as missing
fn ensure_visible(project: &ProjectRecord, viewer: &AuthenticatedUser) -> AppResult<()> {
    if project.is_visible_to(&viewer.username, viewer.role) {
        Ok(())
    } else {
        Err(not_found())
    }
}

fn ensure_owner(project: &ProjectRecord, viewer: &AuthenticatedUser) -> AppResult<()> {
    ensure_visible(project, viewer)?;
    if project.is_owned_by(&viewer.username) {
        Ok(())
    } else {
        Err(AppError::Forbidden("Only the owner can change this project".to_string()))
    }
}
