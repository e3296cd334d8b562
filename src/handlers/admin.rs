use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use validator::Validate;

use crate::{
    error::ApiError,
    models::{CreateQuizRequest, QuestionInput, RegisterRequest, UpdateQuizRequest, UpdateStudentRequest},
    services::{
        anticheat_service::AnticheatService, content_service::ContentService,
        reporting_service::ReportingService, roster_service::RosterService, AppState,
    },
};

// Quizzes

pub async fn list_quizzes(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let quizzes = ContentService::new(state.store.clone()).list_quizzes().await;
    Json(quizzes)
}

pub async fn create_quiz(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateQuizRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| ApiError::InvalidInput(e.to_string()))?;

    let quiz = ContentService::new(state.store.clone())
        .create_quiz(req)
        .await?;
    Ok((StatusCode::CREATED, Json(quiz)))
}

pub async fn update_quiz(
    State(state): State<Arc<AppState>>,
    Path(quiz_id): Path<String>,
    Json(req): Json<UpdateQuizRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let quiz = ContentService::new(state.store.clone())
        .update_quiz(&quiz_id, req)
        .await?;
    Ok(Json(quiz))
}

pub async fn toggle_quiz(
    State(state): State<Arc<AppState>>,
    Path(quiz_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let quiz = ContentService::new(state.store.clone())
        .toggle_quiz(&quiz_id)
        .await?;
    Ok(Json(quiz))
}

pub async fn delete_quiz(
    State(state): State<Arc<AppState>>,
    Path(quiz_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    ContentService::new(state.store.clone())
        .delete_quiz(&quiz_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// Questions

pub async fn list_questions(
    State(state): State<Arc<AppState>>,
    Path(quiz_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let questions = ContentService::new(state.store.clone())
        .list_questions(&quiz_id)
        .await?;
    Ok(Json(questions))
}

pub async fn create_question(
    State(state): State<Arc<AppState>>,
    Path(quiz_id): Path<String>,
    Json(input): Json<QuestionInput>,
) -> Result<impl IntoResponse, ApiError> {
    let question = ContentService::new(state.store.clone())
        .create_question(&quiz_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(question)))
}

pub async fn update_question(
    State(state): State<Arc<AppState>>,
    Path((quiz_id, question_id)): Path<(String, String)>,
    Json(input): Json<QuestionInput>,
) -> Result<impl IntoResponse, ApiError> {
    let question = ContentService::new(state.store.clone())
        .update_question(&quiz_id, &question_id, input)
        .await?;
    Ok(Json(question))
}

pub async fn delete_question(
    State(state): State<Arc<AppState>>,
    Path((quiz_id, question_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    ContentService::new(state.store.clone())
        .delete_question(&quiz_id, &question_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// Students

pub async fn list_students(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let students = RosterService::new(state.store.clone()).list().await;
    Json(students)
}

pub async fn create_student(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| ApiError::InvalidInput(e.to_string()))?;

    let student_id = RosterService::new(state.store.clone())
        .register(&req.name, req.class.as_deref())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "ok": true, "student_id": student_id })),
    ))
}

pub async fn update_student(
    State(state): State<Arc<AppState>>,
    Path(student_id): Path<String>,
    Json(req): Json<UpdateStudentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let student = RosterService::new(state.store.clone())
        .update(&student_id, req.name.as_deref(), req.class.as_deref())
        .await?;
    Ok(Json(student))
}

pub async fn delete_student(
    State(state): State<Arc<AppState>>,
    Path(student_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    RosterService::new(state.store.clone())
        .delete(&student_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// Reporting & logs

pub async fn results(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let rows = ReportingService::new(state.store.clone()).results().await;
    Json(rows)
}

pub async fn quiz_events(
    State(state): State<Arc<AppState>>,
    Path(quiz_id): Path<String>,
) -> impl IntoResponse {
    let events = AnticheatService::new(state.store.clone())
        .events_for_quiz(&quiz_id)
        .await;
    Json(events)
}

pub async fn submission_answers(
    State(state): State<Arc<AppState>>,
    Path(submission_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let answers = ReportingService::new(state.store.clone())
        .answers_for_submission(&submission_id)
        .await?;
    Ok(Json(answers))
}
