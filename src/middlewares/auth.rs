use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::{error::ApiError, services::AppState};

pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Guards every /admin route with the single shared administrator secret.
pub async fn admin_guard_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let provided = request
        .headers()
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok());

    if provided != Some(state.config.admin_token.as_str()) {
        tracing::warn!("Rejected admin request with missing or invalid token");
        return ApiError::Unauthorized.into_response();
    }

    next.run(request).await
}
