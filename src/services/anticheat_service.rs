use std::collections::HashMap;

use chrono::Utc;

use crate::error::ApiError;
use crate::metrics::ANTICHEAT_EVENTS_TOTAL;
use crate::models::event_log::{DEFAULT_EVENT_KIND, UNKNOWN_STUDENT_LABEL};
use crate::models::EventEntry;
use crate::store::Store;

/// Append-only recorder for out-of-focus ("blur") and similar events,
/// correlated by quiz id and student display name.
///
/// No deduplication and no rate limiting: log volume during an exam is
/// bounded by UI focus-change frequency, and every event matters. Events are
/// keyed by display name rather than identity because anonymous or stale
/// sessions still produce signals worth keeping.
pub struct AnticheatService {
    store: Store,
}

impl AnticheatService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn record(
        &self,
        quiz_id: &str,
        student_label: Option<&str>,
        event_kind: Option<&str>,
    ) -> Result<(), ApiError> {
        let quiz_id = quiz_id.trim();
        if quiz_id.is_empty() {
            return Err(ApiError::MissingQuizId);
        }

        let student = match student_label.map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => UNKNOWN_STUDENT_LABEL.to_string(),
        };
        let event = match event_kind.map(str::trim) {
            Some(e) if !e.is_empty() => e.to_string(),
            _ => DEFAULT_EVENT_KIND.to_string(),
        };

        ANTICHEAT_EVENTS_TOTAL.with_label_values(&[&event]).inc();
        tracing::debug!("Anti-cheat event: quiz={}, student={}, event={}", quiz_id, student, event);

        let quiz_key = quiz_id.to_string();
        let entry = EventEntry {
            time: Utc::now(),
            event,
        };

        self.store
            .logs
            .update(move |logs| {
                logs.entry(quiz_key)
                    .or_default()
                    .entry(student)
                    .or_default()
                    .push(entry);
            })
            .await?;

        Ok(())
    }

    /// Event stream for one quiz, keyed by student label, in append order.
    pub async fn events_for_quiz(&self, quiz_id: &str) -> HashMap<String, Vec<EventEntry>> {
        let logs = self.store.logs.read().await;
        logs.get(quiz_id).cloned().unwrap_or_default()
    }

    /// Cascade support: drops the event stream of a deleted quiz.
    pub async fn purge_for_quiz(&self, quiz_id: &str) -> Result<(), ApiError> {
        let quiz_key = quiz_id.to_string();
        self.store
            .logs
            .update(move |logs| {
                logs.remove(&quiz_key);
            })
            .await?;
        Ok(())
    }
}
