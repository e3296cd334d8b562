use crate::error::ApiError;
use crate::models::{AnswerRecord, ResultRow};
use crate::store::Store;

/// Read-only projections over Session + Student + Quiz for export consumers.
/// Joins are identity-based; a deleted student or quiz degrades to a "-"
/// placeholder instead of dropping the row, since orphaned sessions are kept
/// for audit.
pub struct ReportingService {
    store: Store,
}

impl ReportingService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn results(&self) -> Vec<ResultRow> {
        let submissions = self.store.submissions.read().await;
        let students = self.store.students.read().await;
        let quizzes = self.store.quizzes.read().await;

        let mut rows: Vec<ResultRow> = submissions
            .iter()
            .map(|sub| {
                let student = students.iter().find(|s| s.id == sub.student_id);
                let quiz = quizzes.iter().find(|q| q.id == sub.quiz_id);
                ResultRow {
                    submission_id: sub.id.clone(),
                    student_name: student.map(|s| s.name.clone()).unwrap_or_else(|| "-".into()),
                    class: student.map(|s| s.class.clone()).unwrap_or_else(|| "-".into()),
                    quiz_title: quiz.map(|q| q.title.clone()).unwrap_or_else(|| "-".into()),
                    score: sub.score,
                    total: sub.total,
                    started_at: sub.started_at,
                    finished_at: sub.finished_at,
                }
            })
            .collect();

        rows.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        rows
    }

    /// Answer audit for one scored submission. Never used for re-scoring.
    pub async fn answers_for_submission(
        &self,
        submission_id: &str,
    ) -> Result<Vec<AnswerRecord>, ApiError> {
        let submissions = self.store.submissions.read().await;
        if !submissions.iter().any(|s| s.id == submission_id) {
            return Err(ApiError::NotJoined);
        }
        drop(submissions);

        let answers = self.store.answers.read().await;
        Ok(answers.get(submission_id).cloned().unwrap_or_default())
    }
}
