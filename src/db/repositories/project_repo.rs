//! Project repository

use crate::{
    db::RecordStore,
    error::{AppError, AppResult},
    models::ProjectRecord,
};

/// Repository for project table operations
pub struct ProjectRepository;

impl ProjectRepository {
    /// Append a project, assigning its id.
    ///
    /// Ids are the creation unix timestamp, moved past the largest id already
    /// stored so two submissions in the same second stay distinct.
    pub async fn create(
        store: &RecordStore,
        mut project: ProjectRecord,
        timestamp: i64,
    ) -> AppResult<ProjectRecord> {
        store
            .update(move |projects: &mut Vec<ProjectRecord>| {
                let next_free = projects.iter().map(|p| p.id + 1).max().unwrap_or(timestamp);
                project.id = timestamp.max(next_free);
                projects.push(project.clone());
                Ok(project)
            })
            .await
    }

    /// All projects in insertion order (unreadable table reads as empty)
    pub async fn list_all(store: &RecordStore) -> Vec<ProjectRecord> {
        store.load_or_empty::<ProjectRecord>().await
    }

    /// Find project by id
    pub async fn find_by_id(store: &RecordStore, id: i64) -> Option<ProjectRecord> {
        Self::list_all(store).await.into_iter().find(|p| p.id == id)
    }

    /// Apply `change` to one project and save the table
    pub async fn update_by_id<T, F>(store: &RecordStore, id: i64, change: F) -> AppResult<T>
    where
        T: Send,
        F: FnOnce(&mut ProjectRecord) -> AppResult<T> + Send,
    {
        store
            .update(|projects: &mut Vec<ProjectRecord>| {
                let project = projects
                    .iter_mut()
                    .find(|p| p.id == id)
                    .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;
                change(project)
            })
            .await
    }

    /// Remove one project after `check` approves it; returns the removed row
    pub async fn delete_by_id<F>(store: &RecordStore, id: i64, check: F) -> AppResult<ProjectRecord>
    where
        F: FnOnce(&ProjectRecord) -> AppResult<()> + Send,
    {
        store
            .update(|projects: &mut Vec<ProjectRecord>| {
                let index = projects
                    .iter()
                    .position(|p| p.id == id)
                    .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;
                check(&projects[index])?;
                Ok(projects.remove(index))
            })
            .await
    }
}
