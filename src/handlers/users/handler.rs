//! User handler implementations

use axum::{
    extract::{Multipart, Path, State},
    response::Response,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    handlers::{
        auth::{AuthResponse, UserResponse},
        form::{file_response, UploadForm},
    },
    middleware::auth::AuthenticatedUser,
    services::{AuthService, UserService},
    state::AppState,
};

use super::{request::UpdateProfileRequest, response::ProfileResponse};

/// Change the display name and hand back a token carrying it
pub async fn update_profile(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> AppResult<Json<AuthResponse>> {
    payload.validate()?;

    let session = UserService::update_full_name(state.store(), &auth_user, &payload.full_name).await?;
    let token = AuthService::issue_token(&session, state.config())?;
    let profile = UserService::current_profile(state.store(), &session).await?;

    Ok(Json(AuthResponse::new(token, profile.into())))
}

/// Upload a profile picture (multipart `file`)
pub async fn upload_avatar(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    multipart: Multipart,
) -> AppResult<Json<ProfileResponse>> {
    let form = UploadForm::read(multipart).await?;
    let file = form
        .file
        .ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;

    let profile = UserService::set_avatar(state.store(), state.files(), &auth_user, file).await?;

    Ok(Json(ProfileResponse {
        user: UserResponse::from(profile),
    }))
}

/// Remove the profile picture
pub async fn remove_avatar(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<ProfileResponse>> {
    let profile = UserService::remove_avatar(state.store(), state.files(), &auth_user).await?;

    Ok(Json(ProfileResponse {
        user: profile.into(),
    }))
}

/// Serve a user's profile picture
pub async fn get_avatar(
    State(state): State<AppState>,
    _auth_user: AuthenticatedUser,
    Path(username): Path<String>,
) -> AppResult<Response> {
    let path = UserService::avatar_path(state.store(), state.files(), &username).await?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();

    file_response(&path, &name, false).await
}
