//! Stats response DTOs

use serde::Serialize;

use crate::services::stats_service::LeaderboardRow;

/// Ranked students with graded work
#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub entries: Vec<LeaderboardRow>,
}
