//! Authentication response DTOs

use serde::Serialize;

use crate::{
    middleware::auth::AuthenticatedUser,
    models::Role,
    services::{auth_service::SessionToken, user_service::Profile},
};

/// Session token response
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserResponse,
}

impl AuthResponse {
    pub fn new(token: SessionToken, user: UserResponse) -> Self {
        Self {
            access_token: token.token,
            token_type: "Bearer".to_string(),
            expires_in: token.expires_in,
            user,
        }
    }
}

/// Account as shown to clients
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub username: String,
    pub full_name: String,
    pub role: Role,
    /// Stored picture name; absent means the role icon
    pub avatar: Option<String>,
}

impl From<Profile> for UserResponse {
    fn from(profile: Profile) -> Self {
        Self {
            username: profile.username,
            full_name: profile.full_name,
            role: profile.role,
            avatar: profile.avatar,
        }
    }
}

impl From<AuthenticatedUser> for UserResponse {
    fn from(session: AuthenticatedUser) -> Self {
        Self {
            username: session.username,
            full_name: session.full_name,
            role: session.role,
            avatar: None,
        }
    }
}

/// Registration success response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserResponse,
}

/// Current user response (for /me endpoint)
#[derive(Debug, Serialize)]
pub struct CurrentUserResponse {
    pub user: UserResponse,
}
