use chrono::Utc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::metrics::{SESSIONS_TOTAL, SUBMISSIONS_SCORED_TOTAL};
use crate::models::{AnswerRecord, Question, SelectionMap, Submission};
use crate::store::Store;

use super::scoring;

/// Result of a submit. `resubmission` is true when the session was already
/// scored; `score`/`total` then carry the first recorded result.
#[derive(Debug, Clone, Copy)]
pub struct SubmitOutcome {
    pub score: u32,
    pub total: u32,
    pub resubmission: bool,
}

#[derive(Debug)]
pub struct JoinOutcome {
    pub submission_id: String,
    pub resumed: bool,
}

/// Outcome of the finished-at compare-and-set, decided inside the
/// submissions collection lock.
enum ScoreCas {
    Missing,
    AlreadyScored { score: u32, total: u32 },
    Won,
}

/// Owns the join/submit state machine: NotStarted -> Joined -> Scored,
/// monotonic, with idempotent join and exactly-once scoring.
pub struct SessionService {
    store: Store,
}

impl SessionService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Matches an active quiz whose access code equals the trimmed input.
    /// A deactivated quiz is indistinguishable from one that never existed.
    pub async fn resolve_access_code(&self, code: &str) -> Result<String, ApiError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(ApiError::InvalidInput("access code is required".into()));
        }

        let quizzes = self.store.quizzes.read().await;
        quizzes
            .iter()
            .find(|q| q.is_active && q.access_code == code)
            .map(|q| q.id.clone())
            .ok_or(ApiError::InvalidCode)
    }

    /// Idempotent join: creates the session on first entry, resumes the
    /// existing one afterwards. The clock and question order are never reset
    /// by re-entering. The quiz's active flag is re-checked here because
    /// resolution and join are separate steps and the flag may change
    /// between them.
    pub async fn join(&self, student_id: &str, quiz_id: &str) -> Result<JoinOutcome, ApiError> {
        if student_id.trim().is_empty() || quiz_id.trim().is_empty() {
            return Err(ApiError::InvalidInput(
                "student_id and quiz_id are required".into(),
            ));
        }

        let quizzes = self.store.quizzes.read().await;
        let quiz = quizzes
            .iter()
            .find(|q| q.id == quiz_id)
            .ok_or(ApiError::QuizNotFound)?;
        if !quiz.is_active {
            return Err(ApiError::CodeInactive);
        }
        drop(quizzes);

        // Bind identity through the roster before creating a session.
        let students = self.store.students.read().await;
        if !students.iter().any(|s| s.id == student_id) {
            return Err(ApiError::NotRegistered);
        }
        drop(students);

        let student_id = student_id.to_string();
        let quiz_id = quiz_id.to_string();
        let now = Utc::now();
        let candidate_id = Uuid::new_v4().to_string();

        // Create-or-resume inside the collection lock: two racing joins are
        // serialized, so the loser finds the winner's record and returns it.
        let outcome = self
            .store
            .submissions
            .update(move |submissions| {
                if let Some(existing) = submissions
                    .iter()
                    .find(|s| s.student_id == student_id && s.quiz_id == quiz_id)
                {
                    return JoinOutcome {
                        submission_id: existing.id.clone(),
                        resumed: true,
                    };
                }

                submissions.push(Submission {
                    id: candidate_id.clone(),
                    student_id,
                    quiz_id,
                    started_at: now,
                    finished_at: None,
                    score: None,
                    total: None,
                });

                JoinOutcome {
                    submission_id: candidate_id,
                    resumed: false,
                }
            })
            .await?;

        let status = if outcome.resumed { "resumed" } else { "joined" };
        SESSIONS_TOTAL.with_label_values(&[status]).inc();
        tracing::info!("Session {}: {}", status, outcome.submission_id);

        Ok(outcome)
    }

    /// Exactly-once scoring. Grades against the canonical bank, then runs a
    /// compare-and-set on finished_at under the submissions lock: only the
    /// writer that observes finished_at still unset wins and persists the
    /// result plus the answer batch. A duplicate request (double-click,
    /// client retry) gets the first recorded result back, not an error.
    ///
    /// No server-side deadline: a late submit is accepted as long as the
    /// session is unscored, favoring "never lose a legitimate answer" over
    /// strict duration enforcement.
    pub async fn submit(
        &self,
        submission_id: &str,
        answers: &SelectionMap,
    ) -> Result<SubmitOutcome, ApiError> {
        let submissions = self.store.submissions.read().await;
        let quiz_id = submissions
            .iter()
            .find(|s| s.id == submission_id)
            .map(|s| s.quiz_id.clone())
            .ok_or(ApiError::NotJoined)?;
        drop(submissions);

        let banks = self.store.questions.read().await;
        let questions = banks.get(&quiz_id).cloned().unwrap_or_default();
        drop(banks);

        let (score, total) = scoring::grade(&questions, answers);
        let now = Utc::now();

        let submission_key = submission_id.to_string();
        let cas = self
            .store
            .submissions
            .update(move |submissions| {
                match submissions.iter_mut().find(|s| s.id == submission_key) {
                    None => ScoreCas::Missing,
                    Some(s) if s.is_scored() => ScoreCas::AlreadyScored {
                        score: s.score.unwrap_or(0),
                        total: s.total.unwrap_or(0),
                    },
                    Some(s) => {
                        s.finished_at = Some(now);
                        s.score = Some(score);
                        s.total = Some(total);
                        ScoreCas::Won
                    }
                }
            })
            .await?;

        match cas {
            ScoreCas::Missing => Err(ApiError::NotJoined),
            ScoreCas::AlreadyScored { score, total } => {
                // If the original batch write failed after the CAS committed,
                // this retry is the only writer left that can restore the
                // audit trail. An existing batch is never overwritten, so the
                // first recorded selections always win.
                let records = answer_batch(&questions, answers);
                let submission_key = submission_id.to_string();
                self.store
                    .answers
                    .update(move |answers| {
                        answers.entry(submission_key).or_insert(records);
                    })
                    .await?;

                SUBMISSIONS_SCORED_TOTAL
                    .with_label_values(&["duplicate"])
                    .inc();
                tracing::info!(
                    "Duplicate submit for {}: returning first result {}/{}",
                    submission_id,
                    score,
                    total
                );
                Ok(SubmitOutcome {
                    score,
                    total,
                    resubmission: true,
                })
            }
            ScoreCas::Won => {
                // Only the CAS winner writes the answer batch, so duplicate
                // requests can never append a second batch.
                let records = answer_batch(&questions, answers);
                let submission_key = submission_id.to_string();
                self.store
                    .answers
                    .update(move |answers| {
                        answers.insert(submission_key, records);
                    })
                    .await?;

                SESSIONS_TOTAL.with_label_values(&["scored"]).inc();
                SUBMISSIONS_SCORED_TOTAL.with_label_values(&["graded"]).inc();
                tracing::info!("Scored submission {}: {}/{}", submission_id, score, total);

                Ok(SubmitOutcome {
                    score,
                    total,
                    resubmission: false,
                })
            }
        }
    }

    /// Cascade support for quiz deletion: removes every session for the quiz
    /// together with the answer batches those sessions own.
    pub async fn purge_for_quiz(&self, quiz_id: &str) -> Result<(), ApiError> {
        let quiz_key = quiz_id.to_string();
        let removed: Vec<String> = self
            .store
            .submissions
            .update(move |submissions| {
                let removed = submissions
                    .iter()
                    .filter(|s| s.quiz_id == quiz_key)
                    .map(|s| s.id.clone())
                    .collect::<Vec<_>>();
                submissions.retain(|s| s.quiz_id != quiz_key);
                removed
            })
            .await?;

        if !removed.is_empty() {
            self.store
                .answers
                .update(move |answers| {
                    for submission_id in &removed {
                        answers.remove(submission_id);
                    }
                })
                .await?;
        }

        tracing::info!("Purged sessions for quiz {}", quiz_id);
        Ok(())
    }
}

/// Canonical audit batch for one scored payload: one record per canonical
/// question, selections sorted and deduplicated, missing entries stored as
/// empty selections.
fn answer_batch(questions: &[Question], answers: &SelectionMap) -> Vec<AnswerRecord> {
    questions
        .iter()
        .map(|q| {
            let mut selected = answers.get(&q.id).cloned().unwrap_or_default();
            selected.sort();
            selected.dedup();
            AnswerRecord {
                question_id: q.id.clone(),
                selected,
            }
        })
        .collect()
}
