use crate::repositories::errors::progress_repository_errors::ProgressRepositoryError;
use crate::repositories::errors::session_repository_errors::SessionRepositoryError;
use crate::services::errors::activity_service_errors::ActivityServiceError;

#[derive(Debug)]
pub enum SessionServiceError {
    InvalidArgument(String),
    NotFound,
    /// Session owner does not match the caller. Logged as a hijack
    /// attempt before being returned.
    PermissionDenied,
    /// The session was already validated; finalization is one-shot.
    AlreadyValidated,
    RepositoryError(String),
}

impl SessionServiceError {
    /// Named error code as exposed at the callable boundary.
    pub fn code(&self) -> &'static str {
        match self {
            SessionServiceError::InvalidArgument(_) => "invalid-argument",
            SessionServiceError::NotFound => "not-found",
            SessionServiceError::PermissionDenied => "permission-denied",
            SessionServiceError::AlreadyValidated => "already-exists",
            SessionServiceError::RepositoryError(_) => "internal",
        }
    }
}

impl std::fmt::Display for SessionServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionServiceError::InvalidArgument(msg) => {
                write!(f, "Invalid session data: {}", msg)
            }
            SessionServiceError::NotFound => write!(f, "Session not found"),
            SessionServiceError::PermissionDenied => write!(f, "Session mismatch"),
            SessionServiceError::AlreadyValidated => write!(f, "Session already validated"),
            SessionServiceError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for SessionServiceError {}

impl From<SessionRepositoryError> for SessionServiceError {
    fn from(err: SessionRepositoryError) -> Self {
        match err {
            SessionRepositoryError::AlreadyFinalized => SessionServiceError::AlreadyValidated,
            other => SessionServiceError::RepositoryError(other.to_string()),
        }
    }
}

impl From<ProgressRepositoryError> for SessionServiceError {
    fn from(err: ProgressRepositoryError) -> Self {
        SessionServiceError::RepositoryError(err.to_string())
    }
}

impl From<ActivityServiceError> for SessionServiceError {
    fn from(err: ActivityServiceError) -> Self {
        SessionServiceError::RepositoryError(err.to_string())
    }
}
