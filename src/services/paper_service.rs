use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

use crate::error::ApiError;
use crate::store::Store;

/// The randomized, correctness-stripped view of a quiz served to one
/// join/resume request. Re-fetching yields a fresh shuffle; scoring is keyed
/// by question/option identity, not position, so that is accepted behavior.
#[derive(Debug, Serialize)]
pub struct PaperView {
    pub title: String,
    pub duration_seconds: u32,
    pub questions: Vec<PaperQuestion>,
}

#[derive(Debug, Serialize)]
pub struct PaperQuestion {
    pub id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub multi: bool,
    pub options: Vec<PaperOption>,
}

#[derive(Debug, Serialize)]
pub struct PaperOption {
    pub label: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

pub struct PaperService {
    store: Store,
}

impl PaperService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Builds a per-request shuffled paper from deep copies of the canonical
    /// bank. The bank itself is never mutated and `is_correct` never leaves
    /// the server. `seed` pins the shuffle for tests; callers pass `None` in
    /// production, giving every call an independent random order.
    pub async fn build_paper(
        &self,
        quiz_id: &str,
        seed: Option<u64>,
    ) -> Result<PaperView, ApiError> {
        let quizzes = self.store.quizzes.read().await;
        let quiz = quizzes
            .iter()
            .find(|q| q.id == quiz_id)
            .ok_or(ApiError::QuizNotFound)?;

        let banks = self.store.questions.read().await;
        let mut questions = banks.get(quiz_id).cloned().unwrap_or_default();
        if questions.is_empty() {
            return Err(ApiError::NoQuestions);
        }

        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        questions.shuffle(&mut rng);
        for question in &mut questions {
            question.options.shuffle(&mut rng);
        }

        let questions = questions
            .into_iter()
            .map(|q| PaperQuestion {
                id: q.id,
                text: q.text,
                image: q.image,
                multi: q.multi,
                options: q
                    .options
                    .into_iter()
                    .map(|o| PaperOption {
                        label: o.label,
                        text: o.text,
                        image: o.image,
                    })
                    .collect(),
            })
            .collect();

        tracing::debug!("Built paper for quiz {}", quiz_id);

        Ok(PaperView {
            title: quiz.title.clone(),
            duration_seconds: quiz.duration_seconds,
            questions,
        })
    }
}
