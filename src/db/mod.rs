//! Record store
//!
//! Two flat CSV tables (users and projects) with whole-table load and save.
//! Every mutation in the application goes through [`RecordStore::update`]:
//! load the full table, change it in memory, overwrite the file.

pub mod codec;
pub mod repositories;

use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::{
    constants::{PROJECT_COLUMNS, PROJECT_TABLE_FILE, USER_COLUMNS, USER_TABLE_FILE},
    error::AppResult,
    models::{ProjectRecord, UserRecord},
};

/// The tables managed by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Users,
    Projects,
}

impl TableKind {
    pub const ALL: [TableKind; 2] = [TableKind::Users, TableKind::Projects];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Projects => "projects",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Users => USER_TABLE_FILE,
            Self::Projects => PROJECT_TABLE_FILE,
        }
    }

    /// Declared column schema, in file order
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Self::Users => USER_COLUMNS,
            Self::Projects => PROJECT_COLUMNS,
        }
    }
}

/// A row type persisted in one of the tables
pub trait Record: Serialize + DeserializeOwned + Send + Sync + 'static {
    const TABLE: TableKind;
}

impl Record for UserRecord {
    const TABLE: TableKind = TableKind::Users;
}

impl Record for ProjectRecord {
    const TABLE: TableKind = TableKind::Projects;
}

/// Record store failures
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{table} table not found at {path}")]
    Missing { table: &'static str, path: String },

    #[error("I/O error on {table} table: {source}")]
    Io {
        table: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed {table} table: {message}")]
    Malformed { table: &'static str, message: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Whole-table CSV persistence
#[derive(Debug)]
pub struct RecordStore {
    data_dir: PathBuf,
    users_lock: Mutex<()>,
    projects_lock: Mutex<()>,
}

impl RecordStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            users_lock: Mutex::new(()),
            projects_lock: Mutex::new(()),
        }
    }

    /// Path of a table file
    pub fn path(&self, kind: TableKind) -> PathBuf {
        self.data_dir.join(kind.file_name())
    }

    /// Create any missing table with its header row. Existing tables are left untouched.
    pub async fn initialize(&self) -> StoreResult<()> {
        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|source| StoreError::Io { table: "data directory", source })?;

        for kind in TableKind::ALL {
            let path = self.path(kind);
            let exists = tokio::fs::try_exists(&path)
                .await
                .map_err(|source| StoreError::Io { table: kind.name(), source })?;

            if !exists {
                debug!(table = kind.name(), path = %path.display(), "Creating empty table");
                let header = encode_header(kind)?;
                write_file(kind, &path, &header).await?;
            }
        }

        Ok(())
    }

    /// Load every row of a table
    pub async fn load_table<R: Record>(&self) -> StoreResult<Vec<R>> {
        let kind = R::TABLE;
        let path = self.path(kind);

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::Missing {
                    table: kind.name(),
                    path: path.display().to_string(),
                });
            }
            Err(source) => return Err(StoreError::Io { table: kind.name(), source }),
        };

        decode_rows(kind, &bytes)
    }

    /// Load a table for display, presenting an unreadable table as empty
    pub async fn load_or_empty<R: Record>(&self) -> Vec<R> {
        match self.load_table::<R>().await {
            Ok(records) => records,
            Err(e @ StoreError::Missing { .. }) => {
                debug!(error = %e, "Table missing, treating as empty");
                Vec::new()
            }
            Err(e) => {
                warn!(table = R::TABLE.name(), error = %e, "Table unreadable, presenting as empty");
                Vec::new()
            }
        }
    }

    /// Overwrite a table with `records`
    pub async fn save_table<R: Record>(&self, records: &[R]) -> StoreResult<()> {
        let kind = R::TABLE;
        let bytes = encode_rows(kind, records)?;
        write_file(kind, &self.path(kind), &bytes).await
    }

    /// Load, mutate and save one table as a unit.
    ///
    /// Calls on the same table are serialized within this process. When `mutate`
    /// returns an error nothing is written. A corrupt table aborts with a storage
    /// error instead of being replaced.
    pub async fn update<R, T, F>(&self, mutate: F) -> AppResult<T>
    where
        R: Record,
        T: Send,
        F: FnOnce(&mut Vec<R>) -> AppResult<T> + Send,
    {
        let _guard = match R::TABLE {
            TableKind::Users => self.users_lock.lock().await,
            TableKind::Projects => self.projects_lock.lock().await,
        };

        let mut records = match self.load_table::<R>().await {
            Ok(records) => records,
            Err(StoreError::Missing { .. }) => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        let output = mutate(&mut records)?;
        self.save_table(&records).await?;

        Ok(output)
    }

    /// Render rows in the table file format
    pub fn to_csv_bytes<R: Record>(records: &[R]) -> StoreResult<Vec<u8>> {
        encode_rows(R::TABLE, records)
    }
}

fn decode_rows<R: DeserializeOwned>(kind: TableKind, bytes: &[u8]) -> StoreResult<Vec<R>> {
    let mut reader = csv::ReaderBuilder::new().from_reader(bytes);

    reader
        .deserialize()
        .collect::<Result<Vec<R>, csv::Error>>()
        .map_err(|e| StoreError::Malformed {
            table: kind.name(),
            message: e.to_string(),
        })
}

fn malformed(kind: TableKind, e: impl ToString) -> StoreError {
    StoreError::Malformed {
        table: kind.name(),
        message: e.to_string(),
    }
}

/// Writer with the declared header already written, so an empty table still carries its schema
fn header_writer(kind: TableKind) -> StoreResult<csv::Writer<Vec<u8>>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer
        .write_record(kind.columns())
        .map_err(|e| malformed(kind, e))?;

    Ok(writer)
}

fn encode_header(kind: TableKind) -> StoreResult<Vec<u8>> {
    header_writer(kind)?
        .into_inner()
        .map_err(|e| malformed(kind, e))
}

fn encode_rows<R: Serialize>(kind: TableKind, records: &[R]) -> StoreResult<Vec<u8>> {
    let mut writer = header_writer(kind)?;
    for record in records {
        writer.serialize(record).map_err(|e| malformed(kind, e))?;
    }

    writer.into_inner().map_err(|e| malformed(kind, e))
}

async fn write_file(kind: TableKind, path: &Path, bytes: &[u8]) -> StoreResult<()> {
    tokio::fs::write(path, bytes)
        .await
        .map_err(|source| StoreError::Io { table: kind.name(), source })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tempfile::TempDir;

    use super::*;
    use crate::{
        error::AppError,
        models::{Category, Comment, Role},
    };

    fn sample_project() -> ProjectRecord {
        let time = NaiveDate::from_ymd_opt(2024, 5, 2)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        ProjectRecord {
            id: 1714660200,
            owner_username: "alice".to_string(),
            owner_name: "Alice, \"The Analyst\"".to_string(),
            category: Category::PowerBi,
            title: "Churn model".to_string(),
            description: "Line one\nline two".to_string(),
            attachment: "1714660200_churn.pdf".to_string(),
            submitted_at: time,
            is_private: true,
            grade: Some(42.0),
            review: String::new(),
            likes: vec!["alice".to_string(), "bob".to_string()],
            comments: vec![Comment {
                user: "alice".to_string(),
                text: "nice".to_string(),
                time,
            }],
        }
    }

    #[tokio::test]
    async fn test_initialize_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path());

        store.initialize().await.unwrap();
        store.save_table(&[sample_project()]).await.unwrap();
        store.initialize().await.unwrap();

        let projects: Vec<ProjectRecord> = store.load_table().await.unwrap();
        assert_eq!(projects.len(), 1);

        let header = std::fs::read_to_string(store.path(TableKind::Users)).unwrap();
        assert_eq!(header.trim_end(), "username,password,full_name,role,profile_pic");
    }

    #[tokio::test]
    async fn test_initialize_writes_each_table_header() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path());
        store.initialize().await.unwrap();

        for kind in TableKind::ALL {
            let raw = std::fs::read_to_string(store.path(kind)).unwrap();
            assert_eq!(raw.trim_end(), kind.columns().join(","));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_are_all_kept() {
        let dir = TempDir::new().unwrap();
        let store = std::sync::Arc::new(RecordStore::new(dir.path()));
        store.initialize().await.unwrap();

        let mut project = sample_project();
        project.likes.clear();
        store.save_table(&[project]).await.unwrap();

        let tasks: Vec<_> = (0..30)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .update(move |projects: &mut Vec<ProjectRecord>| {
                            projects[0].likes.push(format!("user{i}"));
                            Ok(())
                        })
                        .await
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let projects: Vec<ProjectRecord> = store.load_table().await.unwrap();
        assert_eq!(projects[0].likes.len(), 30);
    }

    #[tokio::test]
    async fn test_project_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path());
        store.initialize().await.unwrap();

        let project = sample_project();
        store.save_table(std::slice::from_ref(&project)).await.unwrap();
        let loaded: Vec<ProjectRecord> = store.load_table().await.unwrap();

        assert_eq!(loaded, vec![project]);
    }

    #[tokio::test]
    async fn test_empty_lists_encode_as_token() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path());
        store.initialize().await.unwrap();

        let mut project = sample_project();
        project.description = "single line".to_string();
        project.likes.clear();
        project.comments.clear();
        project.grade = None;
        store.save_table(&[project]).await.unwrap();

        let raw = std::fs::read_to_string(store.path(TableKind::Projects)).unwrap();
        assert!(raw.lines().nth(1).unwrap().ends_with(",[],[]"));

        let loaded: Vec<ProjectRecord> = store.load_table().await.unwrap();
        assert!(loaded[0].likes.is_empty());
        assert!(loaded[0].grade.is_none());
    }

    #[tokio::test]
    async fn test_reads_rows_written_by_older_tool() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path());
        std::fs::write(
            store.path(TableKind::Projects),
            "id,username,student_name,category,project_title,description,filename,upload_time,is_private,instructor_grade,instructor_review,likes\n\
             1700000000,bob,Bob,Others,Dashboard,,1700000000_d.png,2023-11-14 22:13,False,35.0,Good,[]\n",
        )
        .unwrap();

        let loaded: Vec<ProjectRecord> = store.load_table().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].category, Category::Other);
        assert!(!loaded[0].is_private);
        assert_eq!(loaded[0].grade, Some(35.0));
        assert!(loaded[0].comments.is_empty());
    }

    #[tokio::test]
    async fn test_missing_and_corrupt_tables() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path());

        let missing = store.load_table::<UserRecord>().await;
        assert!(matches!(missing, Err(StoreError::Missing { .. })));

        std::fs::write(store.path(TableKind::Users), "username,password\n\"unterminated").unwrap();
        let corrupt = store.load_table::<UserRecord>().await;
        assert!(matches!(corrupt, Err(StoreError::Malformed { .. })));

        // Display paths fail open
        assert!(store.load_or_empty::<UserRecord>().await.is_empty());
    }

    #[tokio::test]
    async fn test_update_refuses_to_overwrite_corrupt_table() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path());
        let garbage = "not,a,user,table\n1,2\n";
        std::fs::write(store.path(TableKind::Users), garbage).unwrap();

        let result = store
            .update(|users: &mut Vec<UserRecord>| {
                users.push(UserRecord::new_student("carol", "h".into(), "Carol"));
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(AppError::Storage(_))));
        assert_eq!(std::fs::read_to_string(store.path(TableKind::Users)).unwrap(), garbage);
    }

    #[tokio::test]
    async fn test_update_skips_save_on_error() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path());
        store.initialize().await.unwrap();

        let result: AppResult<()> = store
            .update(|users: &mut Vec<UserRecord>| {
                users.push(UserRecord::new_student("dave", "h".into(), "Dave"));
                Err(AppError::Validation("rejected".into()))
            })
            .await;

        assert!(result.is_err());
        assert!(store.load_table::<UserRecord>().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_user_avatar_absent_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path());
        let mut user = UserRecord::new_student("erin", "h".into(), "Erin");
        user.role = Role::Instructor;
        store.save_table(&[user.clone()]).await.unwrap();

        let loaded: Vec<UserRecord> = store.load_table().await.unwrap();
        assert_eq!(loaded, vec![user]);
    }
}
