//! Admin handler implementations

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    constants::EXPORT_FILE_NAME,
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    services::AdminService,
    state::AppState,
};

use super::response::InstructorTableResponse;

/// All projects with pending grades marked
pub async fn list_all_projects(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<InstructorTableResponse>> {
    let projects = AdminService::instructor_table(state.store(), &auth_user).await?;

    Ok(Json(InstructorTableResponse {
        total: projects.len(),
        projects,
    }))
}

/// Download the project table as CSV
pub async fn export_projects(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Response> {
    let csv = AdminService::export_csv(state.store(), &auth_user).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
            ),
        ],
        csv,
    )
        .into_response())
}
