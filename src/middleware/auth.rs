//! Authentication middleware

use axum::{
    body::Body,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    constants,
    error::{AppError, AppResult},
    models::Role,
    services::AuthService,
    state::AppState,
};

/// Session identity carried by every authenticated request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub username: String,
    pub full_name: String,
    pub role: Role,
}

impl AuthenticatedUser {
    /// The transient instructor created by the shared key
    pub fn shared_instructor() -> Self {
        Self {
            username: constants::instructor::USERNAME.to_string(),
            full_name: constants::instructor::FULL_NAME.to_string(),
            role: Role::Instructor,
        }
    }

    pub fn is_instructor(&self) -> bool {
        self.role.is_instructor()
    }

    /// Whether this session has no backing user row
    pub fn is_shared_instructor(&self) -> bool {
        self.is_instructor() && self.username == constants::instructor::USERNAME
    }

    pub fn require_instructor(&self) -> AppResult<()> {
        if self.is_instructor() {
            Ok(())
        } else {
            Err(AppError::Forbidden("Instructor access required".to_string()))
        }
    }

    pub fn require_student(&self) -> AppResult<()> {
        if self.is_instructor() {
            Err(AppError::Forbidden("Only students can do this".to_string()))
        } else {
            Ok(())
        }
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// Authentication middleware
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let uri = request.uri().clone();

    let Some(auth_header) = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        debug!(path = %uri.path(), "Auth failed: No Authorization header");
        return Err(AppError::Unauthorized);
    };

    let Some(token) = auth_header.strip_prefix("Bearer ") else {
        debug!(path = %uri.path(), "Auth failed: Invalid Authorization format (expected 'Bearer <token>')");
        return Err(AppError::Unauthorized);
    };

    let claims = match AuthService::verify_token(token, &state.config().jwt.secret) {
        Ok(claims) => claims,
        Err(e) => {
            debug!(path = %uri.path(), error = ?e, "Auth failed: Token verification failed");
            return Err(e);
        }
    };

    let user = AuthenticatedUser {
        username: claims.sub,
        full_name: claims.name,
        role: claims.role,
    };

    debug!(path = %uri.path(), username = %user.username, role = %user.role, "User authenticated successfully");

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
