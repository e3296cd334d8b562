use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

/// Request-level error taxonomy. Everything here is recoverable and reported
/// to the caller as a structured result; the only hard failure is a store
/// write the engine already promised durability for, which surfaces as a 500
/// rather than being downgraded to success.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("access code does not match any open quiz")]
    InvalidCode,
    #[error("this quiz is closed")]
    CodeInactive,
    #[error("student is not registered")]
    NotRegistered,
    #[error("no submission found; join the quiz first")]
    NotJoined,
    #[error("quiz has no questions configured")]
    NoQuestions,
    #[error("quiz not found")]
    QuizNotFound,
    #[error("question not found")]
    QuestionNotFound,
    #[error("student not found")]
    StudentNotFound,
    #[error("access code is already used by an active quiz")]
    DuplicateAccessCode,
    #[error("missing quiz_id")]
    MissingQuizId,
    #[error("{0}")]
    InvalidInput(String),
    #[error("admin token missing or invalid")]
    Unauthorized,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    /// Stable machine-readable discriminant so the client UI can tell
    /// "you already finished" from "you never started" from "exam closed".
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidCode => "invalid_code",
            ApiError::CodeInactive => "code_inactive",
            ApiError::NotRegistered => "not_registered",
            ApiError::NotJoined => "not_joined",
            ApiError::NoQuestions => "no_questions",
            ApiError::QuizNotFound => "quiz_not_found",
            ApiError::QuestionNotFound => "question_not_found",
            ApiError::StudentNotFound => "student_not_found",
            ApiError::DuplicateAccessCode => "duplicate_access_code",
            ApiError::MissingQuizId => "missing_quiz_id",
            ApiError::InvalidInput(_) => "invalid_input",
            ApiError::Unauthorized => "unauthorized",
            ApiError::Store(_) => "store_failure",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidCode
            | ApiError::NoQuestions
            | ApiError::QuizNotFound
            | ApiError::QuestionNotFound
            | ApiError::StudentNotFound => StatusCode::NOT_FOUND,
            ApiError::CodeInactive => StatusCode::GONE,
            ApiError::NotRegistered | ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotJoined | ApiError::MissingQuizId | ApiError::InvalidInput(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::DuplicateAccessCode => StatusCode::CONFLICT,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = if let ApiError::Store(ref err) = self {
            tracing::error!("Store failure: {:#}", err);
            "internal storage failure".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "error": message,
            "code": self.code(),
        }));

        (status, body).into_response()
    }
}
