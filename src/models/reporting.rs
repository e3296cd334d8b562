use chrono::{DateTime, Utc};
use serde::Serialize;

/// One row of the results projection: Session joined with Student and Quiz
/// by identity. Read-only; built on demand for export consumers.
#[derive(Debug, Clone, Serialize)]
pub struct ResultRow {
    pub submission_id: String,
    pub student_name: String,
    pub class: String,
    pub quiz_title: String,
    pub score: Option<u32>,
    pub total: Option<u32>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}
