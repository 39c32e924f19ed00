//! Stats handler implementations

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    models::ProjectRecord,
    services::{stats_service::Dashboard, StatsService},
    state::AppState,
};

use super::response::LeaderboardResponse;

/// Dashboard figures for the session user
pub async fn get_dashboard(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<Dashboard>> {
    let projects = state.store().load_or_empty::<ProjectRecord>().await;
    Ok(Json(StatsService::dashboard(&projects, &auth_user)))
}

/// Leaderboard over graded projects
pub async fn get_leaderboard(
    State(state): State<AppState>,
    _auth_user: AuthenticatedUser,
) -> AppResult<Json<LeaderboardResponse>> {
    let projects = state.store().load_or_empty::<ProjectRecord>().await;
    Ok(Json(LeaderboardResponse {
        entries: StatsService::leaderboard(&projects),
    }))
}
