use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{error::ApiError, state::AppState};
use shared::services::errors::auth_service_errors::AuthServiceError;

/// Extractor for routes that require a signed-in player. Rejects with an
/// unauthenticated error before the handler runs.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .ok_or(ApiError::AuthService(AuthServiceError::InvalidToken))?
            .to_str()
            .map_err(|_| {
                ApiError::AuthService(AuthServiceError::ValidationError(
                    "Invalid header format".to_string(),
                ))
            })?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::AuthService(AuthServiceError::InvalidToken))?;

        let user_id = state
            .auth_service
            .extract_user_id_from_token(token)
            .map_err(ApiError::from)?;

        Ok(AuthenticatedUser { user_id })
    }
}
