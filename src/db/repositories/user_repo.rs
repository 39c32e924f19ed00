//! User repository

use crate::{
    db::RecordStore,
    error::{AppError, AppResult},
    models::UserRecord,
};

/// Repository for user table operations
pub struct UserRepository;

impl UserRepository {
    /// Append a new user; fails when the username is already stored
    pub async fn create(store: &RecordStore, user: UserRecord) -> AppResult<UserRecord> {
        store
            .update(move |users: &mut Vec<UserRecord>| {
                if users.iter().any(|u| u.username == user.username) {
                    return Err(AppError::AlreadyExists("Username taken".to_string()));
                }
                users.push(user.clone());
                Ok(user)
            })
            .await
    }

    /// Find user by exact username
    pub async fn find_by_username(store: &RecordStore, username: &str) -> Option<UserRecord> {
        store
            .load_or_empty::<UserRecord>()
            .await
            .into_iter()
            .find(|u| u.username == username)
    }

    /// Update display name
    pub async fn update_full_name(
        store: &RecordStore,
        username: &str,
        full_name: &str,
    ) -> AppResult<UserRecord> {
        Self::modify(store, username, |user| {
            user.full_name = full_name.to_string();
        })
        .await
    }

    /// Replace the avatar reference, returning the previous one
    pub async fn set_avatar(
        store: &RecordStore,
        username: &str,
        avatar: Option<String>,
    ) -> AppResult<(UserRecord, Option<String>)> {
        let mut previous = None;
        let user = Self::modify(store, username, |user| {
            previous = std::mem::replace(&mut user.avatar, avatar);
        })
        .await?;

        Ok((user, previous))
    }

    async fn modify<F>(store: &RecordStore, username: &str, change: F) -> AppResult<UserRecord>
    where
        F: FnOnce(&mut UserRecord) + Send,
    {
        store
            .update(|users: &mut Vec<UserRecord>| {
                let user = users
                    .iter_mut()
                    .find(|u| u.username == username)
                    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
                change(user);
                Ok(user.clone())
            })
            .await
    }
}
