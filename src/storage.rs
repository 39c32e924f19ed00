//! Uploaded file storage
//!
//! Project artifacts and profile pictures live as standalone files in two
//! directories and are referenced by bare file name from the tables.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{
    constants::{ATTACHMENT_EXTENSIONS, AVATAR_EXTENSIONS},
    error::{AppError, AppResult},
    utils::validation::{file_extension, validate_extension},
};

/// A file received from a multipart form
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Upload directories
#[derive(Debug, Clone)]
pub struct FileStore {
    projects_dir: PathBuf,
    profiles_dir: PathBuf,
}

impl FileStore {
    pub fn new(projects_dir: impl Into<PathBuf>, profiles_dir: impl Into<PathBuf>) -> Self {
        Self {
            projects_dir: projects_dir.into(),
            profiles_dir: profiles_dir.into(),
        }
    }

    /// Create both upload directories if needed
    pub async fn initialize(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.projects_dir).await?;
        tokio::fs::create_dir_all(&self.profiles_dir).await
    }

    /// Store a project artifact as `<timestamp>_<basename>` without replacing an existing file
    pub async fn save_attachment(
        &self,
        original_name: &str,
        bytes: &[u8],
        timestamp: i64,
    ) -> AppResult<String> {
        let base = base_name(original_name)
            .ok_or_else(|| AppError::Validation("Invalid file name".to_string()))?;
        validate_extension(&base, ATTACHMENT_EXTENSIONS).map_err(AppError::Validation)?;

        // Same-second uploads of the same name get the next free prefix
        let mut prefix = timestamp;
        let mut stored = format!("{prefix}_{base}");
        while tokio::fs::try_exists(self.projects_dir.join(&stored)).await? {
            prefix += 1;
            stored = format!("{prefix}_{base}");
        }

        tokio::fs::write(self.projects_dir.join(&stored), bytes).await?;
        debug!(file = %stored, size = bytes.len(), "Stored attachment");

        Ok(stored)
    }

    /// Store a profile picture as `<username>_<timestamp>.<ext>`
    pub async fn save_avatar(
        &self,
        username: &str,
        original_name: &str,
        bytes: &[u8],
        timestamp: i64,
    ) -> AppResult<String> {
        let ext = validate_extension(original_name, AVATAR_EXTENSIONS).map_err(AppError::Validation)?;

        let stored = format!("{username}_{timestamp}.{ext}");
        tokio::fs::write(self.profiles_dir.join(&stored), bytes).await?;
        debug!(file = %stored, size = bytes.len(), "Stored avatar");

        Ok(stored)
    }

    /// Resolve a stored attachment name; `None` for names that are not plain file names
    pub fn attachment_path(&self, stored: &str) -> Option<PathBuf> {
        resolve(&self.projects_dir, stored)
    }

    /// Resolve a stored avatar name
    pub fn avatar_path(&self, stored: &str) -> Option<PathBuf> {
        resolve(&self.profiles_dir, stored)
    }

    /// Delete an attachment; a missing file is not an error
    pub async fn remove_attachment(&self, stored: &str) {
        if let Some(path) = self.attachment_path(stored) {
            remove_quietly(&path).await;
        }
    }

    /// Delete an avatar; a missing file is not an error
    pub async fn remove_avatar(&self, stored: &str) {
        if let Some(path) = self.avatar_path(stored) {
            remove_quietly(&path).await;
        }
    }
}

/// MIME type served for a stored file
pub fn content_type(file_name: &str) -> &'static str {
    match file_extension(file_name).as_deref() {
        Some("csv") => "text/csv",
        Some("pdf") => "application/pdf",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

/// Final path component of a client-supplied file name
fn base_name(name: &str) -> Option<String> {
    // Browsers on Windows may send full paths with backslashes
    let last = name.rsplit(|c| c == '/' || c == '\\').next()?.trim();
    if last.is_empty() || last == "." || last == ".." {
        return None;
    }
    Some(last.to_string())
}

fn resolve(dir: &Path, stored: &str) -> Option<PathBuf> {
    match base_name(stored) {
        Some(base) if base == stored => Some(dir.join(base)),
        _ => None,
    }
}

async fn remove_quietly(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!(path = %path.display(), "Removed file"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove file"),
    }
}
