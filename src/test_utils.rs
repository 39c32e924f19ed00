//! Test utilities backed by temporary directories
//!
//! Every state gets its own data and upload directories, removed when the
//! returned `TempDir` is dropped.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::{
    config::{Config, InstructorConfig, JwtConfig, ServerConfig, StorageConfig},
    middleware::auth::AuthenticatedUser,
    services::AuthService,
    state::AppState,
};

pub const TEST_INSTRUCTOR_KEY: &str = "test-instructor-key";

/// Configuration pointing at placeholder paths
pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            max_upload_bytes: 1024 * 1024,
        },
        jwt: JwtConfig {
            secret: "test_secret_key_for_testing_only".to_string(),
            expiry_hours: 1,
        },
        instructor: InstructorConfig {
            access_key: Some(TEST_INSTRUCTOR_KEY.to_string()),
        },
        storage: StorageConfig {
            data_dir: "data".into(),
            projects_path: "uploaded_projects".into(),
            profiles_path: "user_profiles".into(),
        },
    }
}

/// Initialized state rooted in a fresh temporary directory
pub async fn test_state() -> (AppState, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");

    let mut config = test_config();
    config.storage = StorageConfig {
        data_dir: dir.path().join("data"),
        projects_path: dir.path().join("uploaded_projects"),
        profiles_path: dir.path().join("user_profiles"),
    };

    let state = AppState::new(config);
    state.initialize().await.expect("Failed to initialize test state");
    (state, dir)
}

/// Register a student and return its session
pub async fn student(state: &AppState, username: &str, full_name: &str) -> AuthenticatedUser {
    let user = AuthService::register(state.store(), username, "password", full_name)
        .await
        .expect("Failed to register test student");
    AuthService::session_for(&user)
}

/// Bearer token for a session
pub fn bearer(state: &AppState, session: &AuthenticatedUser) -> String {
    let token = AuthService::issue_token(session, state.config()).expect("Failed to issue token");
    format!("Bearer {}", token.token)
}

/// Send a JSON request through the router and decode the JSON reply
pub async fn send_json(
    app: &Router,
    method: Method,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

/// Build a multipart/form-data body; `file` is (field name, file name, bytes)
pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> (String, Vec<u8>) {
    let boundary = "----arena-test-boundary";
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!("--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                .as_bytes(),
        );
    }
    if let Some((name, file_name, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={boundary}"), body)
}

/// Send a multipart request and decode the JSON reply
pub async fn send_multipart(
    app: &Router,
    uri: &str,
    auth: &str,
    fields: &[(&str, &str)],
    file: Option<(&str, &str, &[u8])>,
) -> (StatusCode, Value) {
    let (content_type, body) = multipart_body(fields, file);
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::AUTHORIZATION, auth)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}
