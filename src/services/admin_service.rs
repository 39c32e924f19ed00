//! Instructor control panel service

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::info;

use crate::{
    db::{RecordStore, StoreError},
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    models::{Category, ProjectRecord},
};

/// Row of the instructor table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstructorRow {
    pub id: i64,
    pub student_name: String,
    pub category: Category,
    pub project_title: String,
    #[serde(with = "crate::db::codec::timestamp")]
    pub upload_time: NaiveDateTime,
    /// Score, or "Pending" while ungraded
    pub instructor_grade: String,
    pub is_private: bool,
}

impl From<ProjectRecord> for InstructorRow {
    fn from(project: ProjectRecord) -> Self {
        Self {
            id: project.id,
            student_name: project.owner_name,
            category: project.category,
            project_title: project.title,
            upload_time: project.submitted_at,
            instructor_grade: project.grade.map_or_else(|| "Pending".to_string(), format_grade),
            is_private: project.is_private,
        }
    }
}

/// Admin service for instructors
pub struct AdminService;

impl AdminService {
    /// Every project, private ones included
    pub async fn instructor_table(
        store: &RecordStore,
        viewer: &AuthenticatedUser,
    ) -> AppResult<Vec<InstructorRow>> {
        viewer.require_instructor()?;

        let projects = store.load_or_empty::<ProjectRecord>().await;
        Ok(projects.into_iter().map(InstructorRow::from).collect())
    }

    /// The whole project table as CSV bytes
    ///
    /// A missing table exports as a header-only file; a corrupt one is an error.
    pub async fn export_csv(store: &RecordStore, viewer: &AuthenticatedUser) -> AppResult<Vec<u8>> {
        viewer.require_instructor()?;

        let projects = match store.load_table::<ProjectRecord>().await {
            Ok(projects) => projects,
            Err(StoreError::Missing { .. }) => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        let bytes = RecordStore::to_csv_bytes(&projects)?;
        info!(rows = projects.len(), exporter = %viewer.username, "Project table exported");
        Ok(bytes)
    }
}

/// Whole scores keep one decimal, like the table shows them
fn format_grade(grade: f64) -> String {
    if grade.fract() == 0.0 {
        format!("{grade:.1}")
    } else {
        grade.to_string()
    }
}
