//! User profile service

use std::path::PathBuf;

use tracing::info;

use crate::{
    db::{repositories::UserRepository, RecordStore},
    error::{AppError, AppResult},
    middleware::auth::AuthenticatedUser,
    models::{Role, UserRecord},
    storage::{FileStore, UploadedFile},
    utils::{time::unix_now, validation::require_text},
};

/// Public view of an account
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub username: String,
    pub full_name: String,
    pub role: Role,
    pub avatar: Option<String>,
}

impl From<UserRecord> for Profile {
    fn from(user: UserRecord) -> Self {
        Self {
            username: user.username,
            full_name: user.full_name,
            role: user.role,
            avatar: user.avatar,
        }
    }
}

/// User service for business logic
pub struct UserService;

impl UserService {
    /// Stored profile of the session user; the shared instructor has no row
    pub async fn current_profile(store: &RecordStore, viewer: &AuthenticatedUser) -> AppResult<Profile> {
        if viewer.is_shared_instructor() {
            return Ok(Profile {
                username: viewer.username.clone(),
                full_name: viewer.full_name.clone(),
                role: viewer.role,
                avatar: None,
            });
        }

        UserRepository::find_by_username(store, &viewer.username)
            .await
            .map(Profile::from)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Change the display name; returns the refreshed session identity
    pub async fn update_full_name(
        store: &RecordStore,
        viewer: &AuthenticatedUser,
        full_name: &str,
    ) -> AppResult<AuthenticatedUser> {
        ensure_stored_account(viewer)?;
        let full_name = require_text(full_name, "Full name").map_err(AppError::Validation)?;

        let user = UserRepository::update_full_name(store, &viewer.username, &full_name).await?;
        info!(username = %user.username, "Display name updated");

        Ok(AuthenticatedUser {
            username: user.username,
            full_name: user.full_name,
            role: user.role,
        })
    }

    /// Store a new profile picture, replacing any previous one
    pub async fn set_avatar(
        store: &RecordStore,
        files: &FileStore,
        viewer: &AuthenticatedUser,
        file: UploadedFile,
    ) -> AppResult<Profile> {
        ensure_stored_account(viewer)?;
        if file.bytes.is_empty() {
            return Err(AppError::Validation("An image file is required".to_string()));
        }

        let stored = files
            .save_avatar(&viewer.username, &file.file_name, &file.bytes, unix_now())
            .await?;

        let (user, previous) =
            match UserRepository::set_avatar(store, &viewer.username, Some(stored.clone())).await {
                Ok(updated) => updated,
                Err(e) => {
                    files.remove_avatar(&stored).await;
                    return Err(e);
                }
            };

        if let Some(previous) = previous.filter(|p| *p != stored) {
            files.remove_avatar(&previous).await;
        }

        info!(username = %user.username, file = %stored, "Avatar updated");
        Ok(user.into())
    }

    /// Drop the profile picture, falling back to the role icon
    pub async fn remove_avatar(
        store: &RecordStore,
        files: &FileStore,
        viewer: &AuthenticatedUser,
    ) -> AppResult<Profile> {
        ensure_stored_account(viewer)?;

        let (user, previous) = UserRepository::set_avatar(store, &viewer.username, None).await?;
        if let Some(previous) = previous {
            files.remove_avatar(&previous).await;
        }

        Ok(user.into())
    }

    /// Location of a user's profile picture
    pub async fn avatar_path(store: &RecordStore, files: &FileStore, username: &str) -> AppResult<PathBuf> {
        UserRepository::find_by_username(store, username)
            .await
            .and_then(|user| user.avatar)
            .and_then(|avatar| files.avatar_path(&avatar))
            .filter(|path| path.is_file())
            .ok_or_else(|| AppError::NotFound("Avatar not found".to_string()))
    }
}

fn ensure_stored_account(viewer: &AuthenticatedUser) -> AppResult<()> {
    if viewer.is_shared_instructor() {
        Err(AppError::Forbidden(
            "The shared instructor session has no profile to edit".to_string(),
        ))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{student, test_state};

    fn image(name: &str) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            bytes: b"\x89PNG".to_vec(),
        }
    }

    #[tokio::test]
    async fn test_update_full_name_refreshes_session() {
        let (state, _dir) = test_state().await;
        let alice = student(&state, "alice", "Alice").await;

        let session = UserService::update_full_name(state.store(), &alice, "  Alice Cooper ")
            .await
            .unwrap();
        assert_eq!(session.full_name, "Alice Cooper");

        let profile = UserService::current_profile(state.store(), &session).await.unwrap();
        assert_eq!(profile.full_name, "Alice Cooper");

        let blank = UserService::update_full_name(state.store(), &alice, " ").await;
        assert!(matches!(blank, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_shared_instructor_has_no_editable_profile() {
        let (state, _dir) = test_state().await;
        let instructor = AuthenticatedUser::shared_instructor();

        let profile = UserService::current_profile(state.store(), &instructor).await.unwrap();
        assert_eq!(profile.role, Role::Instructor);
        assert!(profile.avatar.is_none());

        let rename = UserService::update_full_name(state.store(), &instructor, "Boss").await;
        assert!(matches!(rename, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_avatar_replace_and_remove() {
        let (state, _dir) = test_state().await;
        let alice = student(&state, "alice", "Alice").await;

        let first = UserService::set_avatar(state.store(), state.files(), &alice, image("me.png"))
            .await
            .unwrap();
        let first_name = first.avatar.unwrap();
        let first_path = state.files().avatar_path(&first_name).unwrap();
        assert!(first_path.exists());

        // Force a distinct stored name for the replacement
        state
            .store()
            .update(|users: &mut Vec<UserRecord>| {
                users[0].avatar = Some("alice_1.png".to_string());
                Ok(())
            })
            .await
            .unwrap();
        std::fs::rename(&first_path, state.files().avatar_path("alice_1.png").unwrap()).unwrap();

        let second = UserService::set_avatar(state.store(), state.files(), &alice, image("new.jpg"))
            .await
            .unwrap();
        assert!(second.avatar.as_deref().unwrap().ends_with(".jpg"));
        assert!(!state.files().avatar_path("alice_1.png").unwrap().exists());

        let path = UserService::avatar_path(state.store(), state.files(), "alice").await.unwrap();
        assert!(path.exists());

        let cleared = UserService::remove_avatar(state.store(), state.files(), &alice).await.unwrap();
        assert!(cleared.avatar.is_none());
        assert!(!path.exists());

        let missing = UserService::avatar_path(state.store(), state.files(), "alice").await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_avatar_rejects_other_formats() {
        let (state, _dir) = test_state().await;
        let alice = student(&state, "alice", "Alice").await;

        let gif = UserService::set_avatar(state.store(), state.files(), &alice, image("anim.gif")).await;
        assert!(matches!(gif, Err(AppError::Validation(_))));

        let profile = UserService::current_profile(state.store(), &alice).await.unwrap();
        assert!(profile.avatar.is_none());
    }
}
