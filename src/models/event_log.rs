use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_EVENT_KIND: &str = "blur";
pub const UNKNOWN_STUDENT_LABEL: &str = "unknown";

/// Append-only anti-cheat event. Duplicates are expected and meaningful:
/// every focus loss is logged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEntry {
    pub time: DateTime<Utc>,
    pub event: String,
}

#[derive(Debug, Deserialize)]
pub struct LogEventRequest {
    pub quiz_id: String,
    /// Display name, not a student identity: anonymous or stale sessions can
    /// still generate focus-loss signals worth recording.
    #[serde(default)]
    pub student: Option<String>,
    #[serde(default)]
    pub event: Option<String>,
}
