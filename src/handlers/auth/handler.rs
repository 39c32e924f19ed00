//! Authentication handler implementations

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::{
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    services::{user_service::Profile, AuthService, UserService},
    state::AppState,
};

use super::{
    request::{InstructorLoginRequest, LoginRequest, RegisterRequest},
    response::{AuthResponse, CurrentUserResponse, RegisterResponse},
};

/// Register a new student
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    payload.validate()?;

    let user = AuthService::register(
        state.store(),
        &payload.username,
        &payload.password,
        &payload.full_name,
    )
    .await?;

    let response = RegisterResponse {
        message: "Account created. Please login".to_string(),
        user: Profile::from(user).into(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Login with username and password
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    payload.validate()?;

    let (user, token) =
        AuthService::login(state.store(), state.config(), &payload.username, &payload.password).await?;

    Ok(Json(AuthResponse::new(token, Profile::from(user).into())))
}

/// Open an instructor session with the shared key
pub async fn instructor_login(
    State(state): State<AppState>,
    Json(payload): Json<InstructorLoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    payload.validate()?;

    let (session, token) = AuthService::login_instructor(state.config(), &payload.access_key)?;

    Ok(Json(AuthResponse::new(token, session.into())))
}

/// Get current authenticated user
pub async fn get_current_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<CurrentUserResponse>> {
    let profile = UserService::current_profile(state.store(), &auth_user).await?;

    Ok(Json(CurrentUserResponse {
        user: profile.into(),
    }))
}
