#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use quizlan_api::{config::Config, create_router, services::AppState, store::Store};

pub const ADMIN_TOKEN: &str = "test-admin-token";

pub fn test_config(data_dir: &std::path::Path) -> Config {
    Config {
        data_dir: data_dir.to_path_buf(),
        bind_addr: "127.0.0.1:0".to_string(),
        admin_token: ADMIN_TOKEN.to_string(),
    }
}

/// App state over a throwaway data dir; keep the TempDir alive for the test.
pub async fn create_test_state() -> (Arc<AppState>, TempDir) {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let dir = TempDir::new().expect("Failed to create temp data dir");
    let config = test_config(dir.path());
    let store = Store::open(&config.data_dir)
        .await
        .expect("Failed to open test store");

    (Arc::new(AppState::new(config, store)), dir)
}

pub async fn create_test_app() -> (Router, TempDir) {
    let (state, dir) = create_test_state().await;
    (create_router(state), dir)
}

/// Sends one request through the router and decodes the JSON body (an empty
/// body decodes to Null).
pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    admin: bool,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if admin {
        builder = builder.header("x-admin-token", ADMIN_TOKEN);
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    request(app, "GET", uri, None, false).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    request(app, "POST", uri, Some(body), false).await
}

pub async fn admin_get(app: &Router, uri: &str) -> (StatusCode, Value) {
    request(app, "GET", uri, None, true).await
}

pub async fn admin_post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    request(app, "POST", uri, Some(body), true).await
}

/// Creates an active quiz through the admin API and returns its id.
pub async fn seed_quiz(app: &Router, title: &str, code: &str, duration: u32) -> String {
    let (status, body) = admin_post(
        app,
        "/admin/quizzes",
        json!({ "title": title, "duration_seconds": duration, "access_code": code }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "seed_quiz failed: {body}");
    body["id"].as_str().unwrap().to_string()
}

/// Adds a question whose correct labels (by storage order) are the given
/// indices, with `option_count` options in total.
pub async fn seed_question(
    app: &Router,
    quiz_id: &str,
    text: &str,
    correct: &[usize],
    option_count: usize,
) -> String {
    let options: Vec<Value> = (0..option_count)
        .map(|i| json!({ "text": format!("{text} option {i}"), "correct": correct.contains(&i) }))
        .collect();
    let (status, body) = admin_post(
        app,
        &format!("/admin/quizzes/{quiz_id}/questions"),
        json!({ "text": text, "multi": correct.len() > 1, "options": options }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "seed_question failed: {body}");
    body["id"].as_str().unwrap().to_string()
}

/// Registers a student and returns their id.
pub async fn seed_student(app: &Router, name: &str, class: &str) -> String {
    let (status, body) = post_json(
        app,
        "/api/v1/register",
        json!({ "name": name, "class": class }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "seed_student failed: {body}");
    body["student_id"].as_str().unwrap().to_string()
}

/// Joins a quiz and returns the submission id.
pub async fn join_quiz(app: &Router, student_id: &str, quiz_id: &str) -> String {
    let (status, body) = post_json(
        app,
        "/api/v1/join",
        json!({ "student_id": student_id, "quiz_id": quiz_id }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "join_quiz failed: {body}");
    body["submission_id"].as_str().unwrap().to_string()
}
