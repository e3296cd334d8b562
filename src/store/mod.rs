use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::models::{AnswerRecord, EventEntry, Question, Quiz, Student, Submission};

mod collection;

pub use collection::Collection;

/// quiz id -> question bank for that quiz.
pub type QuestionsByQuiz = HashMap<String, Vec<Question>>;
/// submission id -> answer records written by the scoring transaction.
pub type AnswersBySubmission = HashMap<String, Vec<AnswerRecord>>;
/// quiz id -> student label -> events, in append order.
pub type EventsByQuiz = HashMap<String, HashMap<String, Vec<EventEntry>>>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store i/o failure on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt collection file {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode collection: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Key-addressed persistence for the six logical record collections, each a
/// JSON file guarded by its own mutex. File names mirror the data layout the
/// engine replaces (quizzes.json, questions.json, ...).
///
/// Lock order for operations spanning collections: quizzes -> questions ->
/// students -> submissions -> answers -> logs.
#[derive(Clone)]
pub struct Store {
    pub quizzes: Arc<Collection<Vec<Quiz>>>,
    pub questions: Arc<Collection<QuestionsByQuiz>>,
    pub students: Arc<Collection<Vec<Student>>>,
    pub submissions: Arc<Collection<Vec<Submission>>>,
    pub answers: Arc<Collection<AnswersBySubmission>>,
    pub logs: Arc<Collection<EventsByQuiz>>,
}

impl Store {
    pub async fn open(data_dir: &Path) -> Result<Self, StoreError> {
        tokio::fs::create_dir_all(data_dir)
            .await
            .map_err(|source| StoreError::Io {
                path: data_dir.to_path_buf(),
                source,
            })?;

        Ok(Self {
            quizzes: Arc::new(Collection::open(data_dir.join("quizzes.json")).await?),
            questions: Arc::new(Collection::open(data_dir.join("questions.json")).await?),
            students: Arc::new(Collection::open(data_dir.join("students.json")).await?),
            submissions: Arc::new(Collection::open(data_dir.join("submissions.json")).await?),
            answers: Arc::new(Collection::open(data_dir.join("answers.json")).await?),
            logs: Arc::new(Collection::open(data_dir.join("logs.json")).await?),
        })
    }
}
