//! Project handler implementations

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use validator::Validate;

use crate::{
    db::codec::parse_flag,
    error::{AppError, AppResult},
    handlers::form::{file_response, UploadForm},
    middleware::auth::AuthenticatedUser,
    models::Category,
    services::{
        project_service::{NewSubmission, ProjectFilter},
        ProjectService,
    },
    state::AppState,
};

use super::{
    request::{CommentRequest, EditProjectRequest, GradeRequest, PrivacyRequest, ProjectListQuery},
    response::{ProjectListResponse, ProjectResponse},
};

/// Submit a project (multipart: category, title, description, is_private, file)
pub async fn submit_project(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<ProjectResponse>)> {
    let form = UploadForm::read(multipart).await?;

    let category = form
        .text("category")
        .map(str::trim)
        .and_then(Category::from_str)
        .ok_or_else(|| AppError::Validation("A valid category is required".to_string()))?;
    let is_private = parse_flag(form.text("is_private").unwrap_or_default())
        .ok_or_else(|| AppError::Validation("is_private must be a boolean".to_string()))?;

    let submission = NewSubmission {
        category,
        title: form.text("title").unwrap_or_default().to_string(),
        description: form.text("description").unwrap_or_default().to_string(),
        is_private,
        file: form.file,
    };

    let project = ProjectService::submit(state.store(), state.files(), &auth_user, submission).await?;

    Ok((
        StatusCode::CREATED,
        Json(ProjectResponse::for_viewer(project, &auth_user)),
    ))
}

/// Arena listing; search covers titles and owner names
pub async fn list_projects(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Query(query): Query<ProjectListQuery>,
) -> AppResult<Json<ProjectListResponse>> {
    let filter = ProjectFilter {
        category: query.category()?,
        search: query.search,
        search_owner_name: true,
        owner: None,
    };

    list(&state, &auth_user, &filter).await
}

/// The viewer's own projects; search covers titles only
pub async fn list_my_projects(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Query(query): Query<ProjectListQuery>,
) -> AppResult<Json<ProjectListResponse>> {
    let filter = ProjectFilter {
        category: query.category()?,
        search: query.search,
        search_owner_name: false,
        owner: Some(auth_user.username.clone()),
    };

    list(&state, &auth_user, &filter).await
}

async fn list(
    state: &AppState,
    auth_user: &AuthenticatedUser,
    filter: &ProjectFilter,
) -> AppResult<Json<ProjectListResponse>> {
    let projects: Vec<ProjectResponse> = ProjectService::list_visible(state.store(), auth_user, filter)
        .await
        .into_iter()
        .map(|p| ProjectResponse::for_viewer(p, auth_user))
        .collect();

    Ok(Json(ProjectListResponse {
        total: projects.len(),
        projects,
    }))
}

/// Get one visible project
pub async fn get_project(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ProjectResponse>> {
    let project = ProjectService::get_visible(state.store(), &auth_user, id).await?;
    Ok(Json(ProjectResponse::for_viewer(project, &auth_user)))
}

/// Owner edit of title and description
pub async fn edit_project(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<EditProjectRequest>,
) -> AppResult<Json<ProjectResponse>> {
    payload.validate()?;

    let project =
        ProjectService::edit_own_fields(state.store(), &auth_user, id, &payload.title, &payload.description)
            .await?;

    Ok(Json(ProjectResponse::for_viewer(project, &auth_user)))
}

/// Owner change of visibility
pub async fn set_privacy(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<PrivacyRequest>,
) -> AppResult<Json<ProjectResponse>> {
    let project = ProjectService::set_privacy(state.store(), &auth_user, id, payload.is_private).await?;
    Ok(Json(ProjectResponse::for_viewer(project, &auth_user)))
}

/// Owner deletion of a project and its file
pub async fn delete_project(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    ProjectService::delete(state.store(), state.files(), &auth_user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Like or unlike
pub async fn toggle_like(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ProjectResponse>> {
    let project = ProjectService::toggle_like(state.store(), &auth_user, id).await?;
    Ok(Json(ProjectResponse::for_viewer(project, &auth_user)))
}

/// Post a comment
pub async fn add_comment(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<CommentRequest>,
) -> AppResult<(StatusCode, Json<ProjectResponse>)> {
    payload.validate()?;

    let project = ProjectService::add_comment(state.store(), &auth_user, id, &payload.text).await?;

    Ok((
        StatusCode::CREATED,
        Json(ProjectResponse::for_viewer(project, &auth_user)),
    ))
}

/// Grade and review (instructors only)
pub async fn grade_project(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<GradeRequest>,
) -> AppResult<Json<ProjectResponse>> {
    auth_user.require_instructor()?;
    payload.validate()?;

    let project =
        ProjectService::grade(state.store(), &auth_user, id, payload.grade, &payload.review).await?;

    Ok(Json(ProjectResponse::for_viewer(project, &auth_user)))
}

/// Download the uploaded artifact
pub async fn download_attachment(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    let (path, name) = ProjectService::attachment(state.store(), state.files(), &auth_user, id).await?;
    file_response(&path, &name, true).await
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::{
        create_router,
        middleware::auth::AuthenticatedUser,
        test_utils::{bearer, send_json, send_multipart, student, test_state},
    };

    async fn submit(app: &Router, auth: &str, title: &str, is_private: &str) -> Value {
        let (status, body) = send_multipart(
            app,
            "/api/v1/projects",
            auth,
            &[
                ("category", "Excel"),
                ("title", title),
                ("description", "Pivot tables"),
                ("is_private", is_private),
            ],
            Some(("file", "sales.xlsx", b"PK\x03\x04".as_slice())),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }

    #[tokio::test]
    async fn test_submit_and_list() {
        let (state, _dir) = test_state().await;
        let alice = bearer(&state, &student(&state, "alice", "Alice Smith").await);
        let bob = bearer(&state, &student(&state, "bob", "Bob").await);
        let app = create_router(state);

        let created = submit(&app, &alice, "Sales 2024", "false").await;
        assert_eq!(created["owner_name"], "Alice Smith");
        assert!(created["grade"].is_null());
        submit(&app, &alice, "Hidden", "true").await;

        let (_, listing) = send_json(&app, Method::GET, "/api/v1/projects", Some(&bob), None).await;
        assert_eq!(listing["total"], 1);

        let (_, by_owner) = send_json(&app, Method::GET, "/api/v1/projects?search=smith", Some(&bob), None).await;
        assert_eq!(by_owner["total"], 1);

        let (_, mine) = send_json(&app, Method::GET, "/api/v1/projects/mine?search=smith", Some(&alice), None).await;
        assert_eq!(mine["total"], 0);

        let (_, mine) = send_json(&app, Method::GET, "/api/v1/projects/mine", Some(&alice), None).await;
        assert_eq!(mine["total"], 2);
    }

    #[tokio::test]
    async fn test_submit_requires_title_and_file() {
        let (state, _dir) = test_state().await;
        let alice = bearer(&state, &student(&state, "alice", "Alice").await);
        let app = create_router(state);

        let (status, _) = send_multipart(
            &app,
            "/api/v1/projects",
            &alice,
            &[("category", "Excel"), ("title", "No file")],
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send_multipart(
            &app,
            "/api/v1/projects",
            &alice,
            &[("category", "Excel"), ("title", "")],
            Some(("file", "a.csv", b"a,b".as_slice())),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_submit_rejects_overlong_title() {
        let (state, _dir) = test_state().await;
        let alice = bearer(&state, &student(&state, "alice", "Alice").await);
        let app = create_router(state);

        let title = "x".repeat(257);
        let (status, _) = send_multipart(
            &app,
            "/api/v1/projects",
            &alice,
            &[("category", "Excel"), ("title", title.as_str())],
            Some(("file", "a.csv", b"a,b".as_slice())),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, mine) = send_json(&app, Method::GET, "/api/v1/projects/mine", Some(&alice), None).await;
        assert_eq!(mine["total"], 0);
    }

    #[tokio::test]
    async fn test_review_hidden_from_other_students() {
        let (state, _dir) = test_state().await;
        let alice = bearer(&state, &student(&state, "alice", "Alice").await);
        let bob = bearer(&state, &student(&state, "bob", "Bob").await);
        let instructor = bearer(&state, &AuthenticatedUser::shared_instructor());
        let app = create_router(state);

        let id = submit(&app, &alice, "Sales", "false").await["id"].as_i64().unwrap();
        let (status, _) = send_json(
            &app,
            Method::PUT,
            &format!("/api/v1/projects/{id}/grade"),
            Some(&instructor),
            Some(json!({ "grade": 20, "review": "Weak analysis, redo" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let uri = format!("/api/v1/projects/{id}");
        let (status, seen_by_bob) = send_json(&app, Method::GET, &uri, Some(&bob), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(seen_by_bob["grade"], 20.0);
        assert_eq!(seen_by_bob["review"], "");

        let (_, listing) = send_json(&app, Method::GET, "/api/v1/projects", Some(&bob), None).await;
        assert_eq!(listing["projects"][0]["review"], "");

        let (_, seen_by_owner) = send_json(&app, Method::GET, &uri, Some(&alice), None).await;
        assert_eq!(seen_by_owner["review"], "Weak analysis, redo");
        let (_, seen_by_instructor) = send_json(&app, Method::GET, &uri, Some(&instructor), None).await;
        assert_eq!(seen_by_instructor["review"], "Weak analysis, redo");
    }

    #[tokio::test]
    async fn test_private_project_is_not_found_for_others() {
        let (state, _dir) = test_state().await;
        let alice = bearer(&state, &student(&state, "alice", "Alice").await);
        let bob = bearer(&state, &student(&state, "bob", "Bob").await);
        let instructor = bearer(&state, &AuthenticatedUser::shared_instructor());
        let app = create_router(state);

        let id = submit(&app, &alice, "Secret", "true").await["id"].as_i64().unwrap();
        let uri = format!("/api/v1/projects/{id}");

        let (status, _) = send_json(&app, Method::GET, &uri, Some(&bob), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send_json(&app, Method::GET, &uri, Some(&instructor), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_social_actions_and_grading() {
        let (state, _dir) = test_state().await;
        let alice = bearer(&state, &student(&state, "alice", "Alice").await);
        let bob = bearer(&state, &student(&state, "bob", "Bob").await);
        let instructor = bearer(&state, &AuthenticatedUser::shared_instructor());
        let app = create_router(state);

        let id = submit(&app, &alice, "Sales", "false").await["id"].as_i64().unwrap();

        let likes = format!("/api/v1/projects/{id}/likes");
        let (_, liked) = send_json(&app, Method::POST, &likes, Some(&bob), None).await;
        assert_eq!(liked["like_count"], 1);
        assert_eq!(liked["liked_by_me"], true);
        let (_, unliked) = send_json(&app, Method::POST, &likes, Some(&bob), None).await;
        assert_eq!(unliked["like_count"], 0);

        let comments = format!("/api/v1/projects/{id}/comments");
        let (status, commented) =
            send_json(&app, Method::POST, &comments, Some(&bob), Some(json!({ "text": "nice" }))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(commented["comments"][0]["user"], "Bob");

        let grade = format!("/api/v1/projects/{id}/grade");
        let (status, _) =
            send_json(&app, Method::PUT, &grade, Some(&alice), Some(json!({ "grade": 50 }))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) =
            send_json(&app, Method::PUT, &grade, Some(&instructor), Some(json!({ "grade": 51 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, graded) = send_json(
            &app,
            Method::PUT,
            &grade,
            Some(&instructor),
            Some(json!({ "grade": 0, "review": "Start again" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(graded["grade"], 0.0);
        assert_eq!(graded["review"], "Start again");
    }

    #[tokio::test]
    async fn test_owner_edits() {
        let (state, _dir) = test_state().await;
        let alice = bearer(&state, &student(&state, "alice", "Alice").await);
        let bob = bearer(&state, &student(&state, "bob", "Bob").await);
        let app = create_router(state);

        let id = submit(&app, &alice, "Draft", "false").await["id"].as_i64().unwrap();
        let uri = format!("/api/v1/projects/{id}");

        let edit = json!({ "title": "Final", "description": "Done" });
        let (status, _) = send_json(&app, Method::PATCH, &uri, Some(&bob), Some(edit.clone())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, edited) = send_json(&app, Method::PATCH, &uri, Some(&alice), Some(edit)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(edited["title"], "Final");

        let privacy = format!("{uri}/privacy");
        let (_, hidden) =
            send_json(&app, Method::PUT, &privacy, Some(&alice), Some(json!({ "is_private": true }))).await;
        assert_eq!(hidden["is_private"], true);

        let (status, _) = send_json(&app, Method::DELETE, &uri, Some(&alice), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send_json(&app, Method::GET, &uri, Some(&alice), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_attachment_download() {
        let (state, _dir) = test_state().await;
        let alice = bearer(&state, &student(&state, "alice", "Alice").await);
        let app = create_router(state);

        let created = submit(&app, &alice, "Sales", "false").await;
        let uri = format!("/api/v1/projects/{}/attachment", created["id"]);

        let request = Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, &alice)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
        assert!(disposition.contains("_sales.xlsx"));
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"PK\x03\x04");
    }
}
