use chrono::Utc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::question::relabel_options;
use crate::models::{
    CreateQuizRequest, Question, QuestionInput, QuestionOption, Quiz, UpdateQuizRequest,
};
use crate::store::Store;

use super::anticheat_service::AnticheatService;
use super::session_service::SessionService;

const MAX_OPTIONS: usize = 26; // single-letter labels A..Z

/// Administrative lifecycle of quizzes and their question banks.
pub struct ContentService {
    store: Store,
}

impl ContentService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Creates a quiz, generating a short access code when none is given.
    /// Code uniqueness is checked inside the quizzes lock, and only against
    /// active quizzes: a retired quiz's code may be reused.
    pub async fn create_quiz(&self, req: CreateQuizRequest) -> Result<Quiz, ApiError> {
        let title = req.title.trim().to_string();
        let access_code = match req.access_code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => code.to_string(),
            _ => generate_access_code(),
        };

        let quiz = Quiz {
            id: Uuid::new_v4().to_string(),
            title,
            access_code,
            duration_seconds: req.duration_seconds,
            is_active: true,
            created_at: Utc::now(),
        };

        let inserted = quiz.clone();
        self.store
            .quizzes
            .update(move |quizzes| {
                if quizzes
                    .iter()
                    .any(|q| q.is_active && q.access_code == inserted.access_code)
                {
                    return Err(ApiError::DuplicateAccessCode);
                }
                quizzes.push(inserted);
                Ok(())
            })
            .await??;

        // Seed an empty bank entry so the paper builder can tell "quiz not
        // configured" apart from "quiz unknown".
        let quiz_key = quiz.id.clone();
        self.store
            .questions
            .update(move |banks| {
                banks.entry(quiz_key).or_default();
            })
            .await?;

        tracing::info!("Created quiz {} (code: {})", quiz.id, quiz.access_code);
        Ok(quiz)
    }

    pub async fn list_quizzes(&self) -> Vec<Quiz> {
        let mut quizzes = self.store.quizzes.read().await;
        quizzes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        quizzes
    }

    pub async fn update_quiz(
        &self,
        quiz_id: &str,
        req: UpdateQuizRequest,
    ) -> Result<Quiz, ApiError> {
        let title = req.title.map(|t| t.trim().to_string());
        if matches!(&title, Some(t) if t.is_empty()) {
            return Err(ApiError::InvalidInput("title must not be blank".into()));
        }
        if matches!(req.duration_seconds, Some(0)) {
            return Err(ApiError::InvalidInput("duration must be positive".into()));
        }
        let access_code = req.access_code.map(|c| c.trim().to_string());
        if matches!(&access_code, Some(c) if c.is_empty()) {
            return Err(ApiError::InvalidInput("access code must not be blank".into()));
        }

        let quiz_key = quiz_id.to_string();
        self.store
            .quizzes
            .update(move |quizzes| {
                let position = quizzes
                    .iter()
                    .position(|q| q.id == quiz_key)
                    .ok_or(ApiError::QuizNotFound)?;

                // Uniqueness only binds active quizzes; a retired quiz may
                // take any code, and toggle_quiz re-checks on re-activation.
                if let Some(ref code) = access_code {
                    let clash = quizzes[position].is_active
                        && quizzes
                            .iter()
                            .any(|q| q.id != quiz_key && q.is_active && q.access_code == *code);
                    if clash {
                        return Err(ApiError::DuplicateAccessCode);
                    }
                }

                let quiz = &mut quizzes[position];
                if let Some(title) = title {
                    quiz.title = title;
                }
                if let Some(duration) = req.duration_seconds {
                    quiz.duration_seconds = duration;
                }
                if let Some(code) = access_code {
                    quiz.access_code = code;
                }
                Ok(quiz.clone())
            })
            .await?
    }

    /// Flips the active flag. Re-activation re-checks the access code
    /// against the currently active set, since the code may have been reused
    /// while this quiz was retired.
    pub async fn toggle_quiz(&self, quiz_id: &str) -> Result<Quiz, ApiError> {
        let quiz_key = quiz_id.to_string();
        self.store
            .quizzes
            .update(move |quizzes| {
                let activating = {
                    let quiz = quizzes
                        .iter()
                        .find(|q| q.id == quiz_key)
                        .ok_or(ApiError::QuizNotFound)?;
                    !quiz.is_active
                };

                if activating {
                    let code = quizzes
                        .iter()
                        .find(|q| q.id == quiz_key)
                        .map(|q| q.access_code.clone())
                        .unwrap_or_default();
                    let clash = quizzes
                        .iter()
                        .any(|q| q.id != quiz_key && q.is_active && q.access_code == code);
                    if clash {
                        return Err(ApiError::DuplicateAccessCode);
                    }
                }

                let quiz = quizzes
                    .iter_mut()
                    .find(|q| q.id == quiz_key)
                    .ok_or(ApiError::QuizNotFound)?;
                quiz.is_active = activating;
                Ok(quiz.clone())
            })
            .await?
    }

    /// Deletes the quiz and everything it owns: its question bank, every
    /// session for it with their answer batches, and its event log.
    pub async fn delete_quiz(&self, quiz_id: &str) -> Result<(), ApiError> {
        let quiz_key = quiz_id.to_string();
        let removed = self
            .store
            .quizzes
            .update(move |quizzes| {
                let before = quizzes.len();
                quizzes.retain(|q| q.id != quiz_key);
                quizzes.len() != before
            })
            .await?;
        if !removed {
            return Err(ApiError::QuizNotFound);
        }

        let quiz_key = quiz_id.to_string();
        self.store
            .questions
            .update(move |banks| {
                banks.remove(&quiz_key);
            })
            .await?;

        SessionService::new(self.store.clone())
            .purge_for_quiz(quiz_id)
            .await?;
        AnticheatService::new(self.store.clone())
            .purge_for_quiz(quiz_id)
            .await?;

        tracing::info!("Deleted quiz {} and its owned records", quiz_id);
        Ok(())
    }

    /// Admin view of a quiz's bank, correctness flags included.
    pub async fn list_questions(&self, quiz_id: &str) -> Result<Vec<Question>, ApiError> {
        self.require_quiz(quiz_id).await?;
        let banks = self.store.questions.read().await;
        Ok(banks.get(quiz_id).cloned().unwrap_or_default())
    }

    pub async fn create_question(
        &self,
        quiz_id: &str,
        input: QuestionInput,
    ) -> Result<Question, ApiError> {
        self.require_quiz(quiz_id).await?;
        let question = build_question(Uuid::new_v4().to_string(), input)?;

        let quiz_key = quiz_id.to_string();
        let inserted = question.clone();
        self.store
            .questions
            .update(move |banks| {
                banks.entry(quiz_key).or_default().push(inserted);
            })
            .await?;

        Ok(question)
    }

    pub async fn update_question(
        &self,
        quiz_id: &str,
        question_id: &str,
        input: QuestionInput,
    ) -> Result<Question, ApiError> {
        self.require_quiz(quiz_id).await?;
        let replacement = build_question(question_id.to_string(), input)?;

        let quiz_key = quiz_id.to_string();
        let question_key = question_id.to_string();
        let updated = replacement.clone();
        self.store
            .questions
            .update(move |banks| {
                let bank = banks.get_mut(&quiz_key).ok_or(ApiError::QuestionNotFound)?;
                let slot = bank
                    .iter_mut()
                    .find(|q| q.id == question_key)
                    .ok_or(ApiError::QuestionNotFound)?;
                *slot = updated;
                Ok::<(), ApiError>(())
            })
            .await??;

        Ok(replacement)
    }

    pub async fn delete_question(&self, quiz_id: &str, question_id: &str) -> Result<(), ApiError> {
        self.require_quiz(quiz_id).await?;

        let quiz_key = quiz_id.to_string();
        let question_key = question_id.to_string();
        self.store
            .questions
            .update(move |banks| {
                let bank = banks.get_mut(&quiz_key).ok_or(ApiError::QuestionNotFound)?;
                let before = bank.len();
                bank.retain(|q| q.id != question_key);
                if bank.len() == before {
                    return Err(ApiError::QuestionNotFound);
                }
                Ok(())
            })
            .await??;

        Ok(())
    }

    async fn require_quiz(&self, quiz_id: &str) -> Result<(), ApiError> {
        let quizzes = self.store.quizzes.read().await;
        if quizzes.iter().any(|q| q.id == quiz_id) {
            Ok(())
        } else {
            Err(ApiError::QuizNotFound)
        }
    }
}

fn generate_access_code() -> String {
    Uuid::new_v4().simple().to_string()[..6].to_uppercase()
}

/// Validates the §3 question invariants and derives canonical labels:
/// at least 2 non-blank options, at least one correct, labels re-assigned
/// A, B, C... by storage order, and the multi flag forced true when more
/// than one option is correct (an extra correct answer is never dropped).
fn build_question(id: String, input: QuestionInput) -> Result<Question, ApiError> {
    let text = input.text.trim().to_string();
    if text.is_empty() {
        return Err(ApiError::InvalidInput("question text is required".into()));
    }

    let mut options: Vec<QuestionOption> = input
        .options
        .into_iter()
        .filter(|o| !o.text.trim().is_empty())
        .map(|o| QuestionOption {
            label: String::new(),
            text: o.text.trim().to_string(),
            image: o.image,
            is_correct: o.correct,
        })
        .collect();

    if options.len() < 2 {
        return Err(ApiError::InvalidInput(
            "a question needs at least 2 options".into(),
        ));
    }
    if options.len() > MAX_OPTIONS {
        return Err(ApiError::InvalidInput(format!(
            "a question supports at most {MAX_OPTIONS} options"
        )));
    }

    let correct_count = options.iter().filter(|o| o.is_correct).count();
    if correct_count == 0 {
        return Err(ApiError::InvalidInput(
            "at least one option must be marked correct".into(),
        ));
    }

    relabel_options(&mut options);

    Ok(Question {
        id,
        text,
        image: input.image,
        multi: input.multi || correct_count > 1,
        options,
    })
}
