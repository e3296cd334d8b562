mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn register_reuses_the_existing_student_per_name_and_class() {
    let (app, _dir) = common::create_test_app().await;

    let first = common::seed_student(&app, "Lan", "10A").await;
    let second = common::seed_student(&app, "Lan", "10A").await;
    assert_eq!(first, second);

    // Same name in another class is a different student.
    let third = common::seed_student(&app, "Lan", "10B").await;
    assert_ne!(first, third);
}

#[tokio::test]
async fn register_trims_and_defaults_the_class() {
    let (app, _dir) = common::create_test_app().await;

    let (status, body) = common::post_json(
        &app,
        "/api/v1/register",
        json!({ "name": "  Lan  " }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = body["student_id"].as_str().unwrap().to_string();

    // A blank class resolves to the same sentinel bucket.
    let (status, body) = common::post_json(
        &app,
        "/api/v1/register",
        json!({ "name": "Lan", "class": "   " }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["student_id"], id);

    let (status, classes) = common::get(&app, "/api/v1/classes").await;
    assert_eq!(status, StatusCode::OK);
    let unassigned = classes["unassigned"].as_array().unwrap();
    assert_eq!(unassigned.len(), 1);
    assert_eq!(unassigned[0]["name"], "Lan");
}

#[tokio::test]
async fn register_rejects_a_blank_name() {
    let (app, _dir) = common::create_test_app().await;

    let (status, _) =
        common::post_json(&app, "/api/v1/register", json!({ "name": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn classes_lists_students_grouped_and_sorted() {
    let (app, _dir) = common::create_test_app().await;
    common::seed_student(&app, "Binh", "10A").await;
    common::seed_student(&app, "An", "10A").await;
    common::seed_student(&app, "Chi", "10B").await;

    let (status, classes) = common::get(&app, "/api/v1/classes").await;
    assert_eq!(status, StatusCode::OK);

    let class_a: Vec<&str> = classes["10A"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(class_a, vec!["An", "Binh"]);
    assert_eq!(classes["10B"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn admin_can_update_and_delete_students() {
    let (app, _dir) = common::create_test_app().await;
    let id = common::seed_student(&app, "Lan", "10A").await;

    let (status, body) = common::request(
        &app,
        "PATCH",
        &format!("/admin/students/{id}"),
        Some(json!({ "class": "11A" })),
        true,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["class"], "11A");
    assert_eq!(body["name"], "Lan");

    let (status, _) = common::request(
        &app,
        "DELETE",
        &format!("/admin/students/{id}"),
        None,
        true,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = common::request(
        &app,
        "PATCH",
        &format!("/admin/students/{id}"),
        Some(json!({ "class": "12A" })),
        true,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "student_not_found");
}

#[tokio::test]
async fn deleting_a_student_keeps_their_scored_sessions() {
    let (app, _dir) = common::create_test_app().await;
    let quiz_id = common::seed_quiz(&app, "Math", "AB12", 600).await;
    let q1 = common::seed_question(&app, &quiz_id, "Q1", &[0], 2).await;
    let student_id = common::seed_student(&app, "Lan", "10A").await;
    let submission_id = common::join_quiz(&app, &student_id, &quiz_id).await;

    let (status, _) = common::post_json(
        &app,
        &format!("/api/v1/submit/{submission_id}"),
        json!({ "answers": { q1: ["A"] } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = common::request(
        &app,
        "DELETE",
        &format!("/admin/students/{student_id}"),
        None,
        true,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // The row survives with a placeholder where the roster entry was.
    let (status, results) = common::admin_get(&app, "/admin/results").await;
    assert_eq!(status, StatusCode::OK);
    let rows = results.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["student_name"], "-");
    assert_eq!(rows[0]["score"], 1);
}
