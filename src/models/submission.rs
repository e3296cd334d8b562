use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One student's attempt at one quiz ("session" internally, "submission" at
/// the boundary). At most one exists per (student_id, quiz_id) pair.
///
/// Lifecycle: created on first join with `finished_at = None`; mutated
/// exactly once by scoring, which sets `finished_at`, `score` and `total`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: String,
    pub student_id: String,
    pub quiz_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub score: Option<u32>,
    pub total: Option<u32>,
}

impl Submission {
    pub fn is_scored(&self) -> bool {
        self.finished_at.is_some()
    }
}

/// Audit record of what a student selected for one question, written in bulk
/// as part of the scoring transaction and never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_id: String,
    /// Sorted, deduplicated option labels.
    pub selected: Vec<String>,
}

/// question id -> selected option labels, as sent by the client.
pub type SelectionMap = HashMap<String, Vec<String>>;

#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    pub student_id: String,
    pub quiz_id: String,
}

#[derive(Debug, Serialize)]
pub struct JoinResponse {
    pub ok: bool,
    pub quiz_id: String,
    pub submission_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub answers: SelectionMap,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub ok: bool,
    pub score: u32,
    pub total: u32,
    /// True when the session was already scored; `score`/`total` then carry
    /// the first recorded result, not a re-grade of this payload.
    pub resubmission: bool,
}
