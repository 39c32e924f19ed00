//! Admin response DTOs

use serde::Serialize;

use crate::services::admin_service::InstructorRow;

/// Every project, for grading
#[derive(Debug, Serialize)]
pub struct InstructorTableResponse {
    pub projects: Vec<InstructorRow>,
    pub total: usize,
}
