use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A timed exam. The access code is only required to be unique among
/// quizzes that are currently active; a retired quiz's code may be reused.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub access_code: String,
    pub duration_seconds: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuizRequest {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(range(min = 1, message = "duration must be positive"))]
    pub duration_seconds: u32,
    /// Generated from a UUID prefix when omitted or blank.
    pub access_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuizRequest {
    pub title: Option<String>,
    pub duration_seconds: Option<u32>,
    pub access_code: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CheckCodeRequest {
    #[validate(length(min = 1, message = "access code is required"))]
    pub access_code: String,
}

#[derive(Debug, Serialize)]
pub struct CheckCodeResponse {
    pub ok: bool,
    pub quiz_id: String,
}
