use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::models::room::responses::ErrorResponse;
use shared::services::errors::{
    auth_service_errors::AuthServiceError, room_service_errors::RoomServiceError,
    session_service_errors::SessionServiceError,
};

#[derive(Debug)]
pub enum ApiError {
    RoomService(RoomServiceError),
    SessionService(SessionServiceError),
    AuthService(AuthServiceError),
}

impl From<RoomServiceError> for ApiError {
    fn from(error: RoomServiceError) -> Self {
        ApiError::RoomService(error)
    }
}

impl From<SessionServiceError> for ApiError {
    fn from(error: SessionServiceError) -> Self {
        ApiError::SessionService(error)
    }
}

impl From<AuthServiceError> for ApiError {
    fn from(error: AuthServiceError) -> Self {
        ApiError::AuthService(error)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::RoomService(RoomServiceError::ValidationError(_)) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::RoomService(RoomServiceError::RoomNotFound) => StatusCode::NOT_FOUND,
            ApiError::RoomService(
                RoomServiceError::RoomFull
                | RoomServiceError::AlreadyStarted
                | RoomServiceError::NotPlaying
                | RoomServiceError::NotFinished,
            ) => StatusCode::CONFLICT,
            ApiError::RoomService(RoomServiceError::NotInRoom | RoomServiceError::NotHost) => {
                StatusCode::FORBIDDEN
            }
            ApiError::RoomService(
                RoomServiceError::CodeGenerationFailed | RoomServiceError::RepositoryError(_),
            ) => StatusCode::INTERNAL_SERVER_ERROR,

            ApiError::SessionService(SessionServiceError::InvalidArgument(_)) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::SessionService(SessionServiceError::NotFound) => StatusCode::NOT_FOUND,
            ApiError::SessionService(SessionServiceError::PermissionDenied) => {
                StatusCode::FORBIDDEN
            }
            ApiError::SessionService(SessionServiceError::AlreadyValidated) => {
                StatusCode::CONFLICT
            }
            ApiError::SessionService(SessionServiceError::RepositoryError(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            ApiError::AuthService(
                AuthServiceError::InvalidToken | AuthServiceError::ExpiredToken,
            ) => StatusCode::UNAUTHORIZED,
            ApiError::AuthService(AuthServiceError::ValidationError(_)) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::AuthService(AuthServiceError::JwtError(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::RoomService(e) => e.code(),
            ApiError::SessionService(e) => e.code(),
            ApiError::AuthService(
                AuthServiceError::InvalidToken | AuthServiceError::ExpiredToken,
            ) => "unauthenticated",
            ApiError::AuthService(AuthServiceError::ValidationError(_)) => "invalid-argument",
            ApiError::AuthService(AuthServiceError::JwtError(_)) => "internal",
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::RoomService(e) => e.to_string(),
            ApiError::SessionService(e) => e.to_string(),
            ApiError::AuthService(e) => e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.message(),
            code: self.code().to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
