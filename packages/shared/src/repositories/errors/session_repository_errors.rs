#[derive(Debug)]
pub enum SessionRepositoryError {
    /// Conditional finalize failed: the session was already validated.
    AlreadyFinalized,
    Serialization(String),
    DynamoDb(String),
}

impl std::fmt::Display for SessionRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionRepositoryError::AlreadyFinalized => {
                write!(f, "Session already finalized")
            }
            SessionRepositoryError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            SessionRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
        }
    }
}

impl std::error::Error for SessionRepositoryError {}
