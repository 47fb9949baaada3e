#[derive(Debug)]
pub enum AuthServiceError {
    InvalidToken,
    ExpiredToken,
    ValidationError(String),
    JwtError(String),
}

impl std::fmt::Display for AuthServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthServiceError::InvalidToken => write!(f, "Invalid token"),
            AuthServiceError::ExpiredToken => write!(f, "Expired token"),
            AuthServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AuthServiceError::JwtError(msg) => write!(f, "JWT error: {}", msg),
        }
    }
}

impl std::error::Error for AuthServiceError {}
