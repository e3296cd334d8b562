use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::{
    error::ApiError,
    models::{
        CheckCodeRequest, CheckCodeResponse, JoinRequest, JoinResponse, LogEventRequest,
        RegisterRequest, RegisterResponse, SubmitRequest, SubmitResponse,
    },
    services::{
        anticheat_service::AnticheatService, paper_service::PaperService,
        roster_service::RosterService, session_service::SessionService, AppState,
    },
};

pub async fn classes(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let roster = RosterService::new(state.store.clone()).classes().await;
    Json(roster)
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| ApiError::InvalidInput(e.to_string()))?;

    let service = RosterService::new(state.store.clone());
    let student_id = service.register(&req.name, req.class.as_deref()).await?;

    Ok(Json(RegisterResponse {
        ok: true,
        student_id,
    }))
}

pub async fn check_code(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CheckCodeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let service = SessionService::new(state.store.clone());
    let quiz_id = service.resolve_access_code(&req.access_code).await?;

    Ok(Json(CheckCodeResponse { ok: true, quiz_id }))
}

pub async fn join(
    State(state): State<Arc<AppState>>,
    Json(req): Json<JoinRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let service = SessionService::new(state.store.clone());
    let outcome = service.join(&req.student_id, &req.quiz_id).await?;

    Ok(Json(JoinResponse {
        ok: true,
        quiz_id: req.quiz_id,
        submission_id: outcome.submission_id,
    }))
}

pub async fn get_paper(
    State(state): State<Arc<AppState>>,
    Path(quiz_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let service = PaperService::new(state.store.clone());
    let paper = service.build_paper(&quiz_id, None).await?;

    Ok(Json(paper))
}

pub async fn submit(
    State(state): State<Arc<AppState>>,
    Path(submission_id): Path<String>,
    Json(req): Json<SubmitRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let service = SessionService::new(state.store.clone());
    let outcome = service.submit(&submission_id, &req.answers).await?;

    Ok(Json(SubmitResponse {
        ok: true,
        score: outcome.score,
        total: outcome.total,
        resubmission: outcome.resubmission,
    }))
}

/// Fire-and-forget from the client's point of view, but the append is
/// durable before the acknowledgment goes out.
pub async fn log_event(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LogEventRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let service = AnticheatService::new(state.store.clone());
    service
        .record(&req.quiz_id, req.student.as_deref(), req.event.as_deref())
        .await?;

    Ok((StatusCode::OK, Json(json!({ "ok": true }))))
}
