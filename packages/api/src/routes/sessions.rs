use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::{error::ApiError, middleware::auth::AuthenticatedUser, state::AppState};
use shared::models::progress::UserProgress;
use shared::models::session::requests::{StartSessionRequest, ValidateSessionRequest};
use shared::models::session::responses::{StartSessionResponse, ValidateSessionResponse};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(start_session))
        .route("/sessions/validate", post(validate_session))
        .route("/progress", get(get_progress))
}

async fn start_session(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Json(payload): Json<StartSessionRequest>,
) -> Result<(StatusCode, Json<StartSessionResponse>), ApiError> {
    let session = state
        .session_service
        .start_session(&authenticated_user.user_id, payload.category)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(StartSessionResponse {
            session_id: session.session_id,
        }),
    ))
}

async fn validate_session(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Json(payload): Json<ValidateSessionRequest>,
) -> Result<Json<ValidateSessionResponse>, ApiError> {
    let response = state
        .session_service
        .validate_session(&authenticated_user.user_id, &payload)
        .await?;
    Ok(Json(response))
}

async fn get_progress(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
) -> Result<Json<UserProgress>, ApiError> {
    let progress = state
        .session_service
        .progress_for(&authenticated_user.user_id)
        .await?;
    Ok(Json(progress))
}
