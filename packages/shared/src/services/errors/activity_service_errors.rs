use crate::repositories::errors::activity_repository_errors::ActivityRepositoryError;
use crate::repositories::errors::progress_repository_errors::ProgressRepositoryError;

#[derive(Debug)]
pub enum ActivityServiceError {
    RepositoryError(String),
}

impl std::fmt::Display for ActivityServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityServiceError::RepositoryError(msg) => {
                write!(f, "Repository error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ActivityServiceError {}

impl From<ActivityRepositoryError> for ActivityServiceError {
    fn from(err: ActivityRepositoryError) -> Self {
        ActivityServiceError::RepositoryError(err.to_string())
    }
}

impl From<ProgressRepositoryError> for ActivityServiceError {
    fn from(err: ProgressRepositoryError) -> Self {
        ActivityServiceError::RepositoryError(err.to_string())
    }
}
