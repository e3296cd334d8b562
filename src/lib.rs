use axum::{
    http::{header, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middlewares;
pub mod models;
pub mod services;
pub mod store;

pub use config::Config;
pub use services::AppState;

pub fn create_router(app_state: std::sync::Arc<services::AppState>) -> Router {
    // LAN deployment: the admin UI and quiz pages are served from arbitrary
    // hosts on the local network.
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::HeaderName::from_static(middlewares::auth::ADMIN_TOKEN_HEADER),
        ])
        .allow_origin(tower_http::cors::Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        .nest("/api/v1", student_routes())
        .nest(
            "/admin",
            admin_routes().layer(middleware::from_fn_with_state(
                app_state.clone(),
                middlewares::auth::admin_guard_middleware,
            )),
        )
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn student_routes() -> Router<std::sync::Arc<services::AppState>> {
    Router::new()
        .route("/classes", get(handlers::student::classes))
        .route("/register", post(handlers::student::register))
        .route("/check_code", post(handlers::student::check_code))
        .route("/join", post(handlers::student::join))
        .route("/quiz/{quiz_id}/paper", get(handlers::student::get_paper))
        .route("/submit/{submission_id}", post(handlers::student::submit))
        .route("/events", post(handlers::student::log_event))
}

fn admin_routes() -> Router<std::sync::Arc<services::AppState>> {
    Router::new()
        // Quiz management
        .route(
            "/quizzes",
            get(handlers::admin::list_quizzes).post(handlers::admin::create_quiz),
        )
        .route(
            "/quizzes/{id}",
            axum::routing::patch(handlers::admin::update_quiz).delete(handlers::admin::delete_quiz),
        )
        .route("/quizzes/{id}/toggle", post(handlers::admin::toggle_quiz))
        // Question bank
        .route(
            "/quizzes/{id}/questions",
            get(handlers::admin::list_questions).post(handlers::admin::create_question),
        )
        .route(
            "/quizzes/{id}/questions/{question_id}",
            axum::routing::put(handlers::admin::update_question)
                .delete(handlers::admin::delete_question),
        )
        // Roster management
        .route(
            "/students",
            get(handlers::admin::list_students).post(handlers::admin::create_student),
        )
        .route(
            "/students/{id}",
            axum::routing::patch(handlers::admin::update_student)
                .delete(handlers::admin::delete_student),
        )
        // Results & anti-cheat review
        .route("/results", get(handlers::admin::results))
        .route("/quizzes/{id}/events", get(handlers::admin::quiz_events))
        .route(
            "/submissions/{id}/answers",
            get(handlers::admin::submission_answers),
        )
}
