//! Authentication service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    config::Config,
    db::{repositories::UserRepository, RecordStore},
    error::{AppError, AppResult},
    middleware::auth::AuthenticatedUser,
    models::{Role, UserRecord},
    utils::{
        crypto::{hash_string, is_sha256_hex, verify_hash},
        validation::{require_text, validate_username},
    },
};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // username
    pub name: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

/// Signed session token and its lifetime in seconds
#[derive(Debug, Clone)]
pub struct SessionToken {
    pub token: String,
    pub expires_in: i64,
}

/// Authentication service
pub struct AuthService;

impl AuthService {
    /// Register a new student account
    pub async fn register(
        store: &RecordStore,
        username: &str,
        password: &str,
        full_name: &str,
    ) -> AppResult<UserRecord> {
        validate_username(username).map_err(|e| AppError::Validation(e.to_string()))?;
        let full_name = require_text(full_name, "Full name").map_err(AppError::Validation)?;

        let password_hash = Self::hash_password(password)?;
        let user = UserRepository::create(
            store,
            UserRecord::new_student(username, password_hash, &full_name),
        )
        .await?;

        info!(username = %user.username, "Registered new student");
        Ok(user)
    }

    /// Match a username and password against the user table
    pub async fn authenticate(store: &RecordStore, username: &str, password: &str) -> Option<UserRecord> {
        let user = UserRepository::find_by_username(store, username).await?;
        Self::verify_password(password, &user.password_hash).then_some(user)
    }

    /// Login with username and password
    pub async fn login(
        store: &RecordStore,
        config: &Config,
        username: &str,
        password: &str,
    ) -> AppResult<(UserRecord, SessionToken)> {
        let user = Self::authenticate(store, username, password)
            .await
            .ok_or(AppError::InvalidCredentials)?;

        let token = Self::issue_token(&Self::session_for(&user), config)?;
        Ok((user, token))
    }

    /// Check the shared instructor key; on a match return the transient instructor identity
    pub fn instructor_override(config: &Config, key: &str) -> Option<AuthenticatedUser> {
        let expected = config.instructor.access_key.as_deref()?;
        verify_hash(key, &hash_string(expected)).then(AuthenticatedUser::shared_instructor)
    }

    /// Start an instructor session from the shared key
    pub fn login_instructor(config: &Config, key: &str) -> AppResult<(AuthenticatedUser, SessionToken)> {
        let session = Self::instructor_override(config, key).ok_or_else(|| {
            warn!("Rejected instructor key");
            AppError::InvalidCredentials
        })?;

        let token = Self::issue_token(&session, config)?;
        info!("Instructor session opened with shared key");
        Ok((session, token))
    }

    /// Session identity for a stored user
    pub fn session_for(user: &UserRecord) -> AuthenticatedUser {
        AuthenticatedUser {
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            role: user.role,
        }
    }

    /// Sign a session token
    pub fn issue_token(session: &AuthenticatedUser, config: &Config) -> AppResult<SessionToken> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(config.jwt.expiry_hours);

        let claims = Claims {
            sub: session.username.clone(),
            name: session.full_name.clone(),
            role: session.role,
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Token generation failed: {}", e)))?;

        Ok(SessionToken {
            token,
            expires_in: config.jwt.expiry_hours * 3600,
        })
    }

    /// Verify JWT token and extract claims
    pub fn verify_token(token: &str, secret: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    /// Hash password using Argon2
    fn hash_password(password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))?
            .to_string();

        Ok(hash)
    }

    /// Verify password against a stored hash (argon2, or a legacy bare SHA-256 digest)
    fn verify_password(password: &str, stored: &str) -> bool {
        if is_sha256_hex(stored) {
            return verify_hash(password, stored);
        }

        match PasswordHash::new(stored) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                warn!(error = %e, "Unreadable password hash in user table");
                false
            }
        }
    }
}
