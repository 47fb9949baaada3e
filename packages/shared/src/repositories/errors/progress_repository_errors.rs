#[derive(Debug)]
pub enum ProgressRepositoryError {
    Serialization(String),
    DynamoDb(String),
}

impl std::fmt::Display for ProgressRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProgressRepositoryError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            ProgressRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
        }
    }
}

impl std::error::Error for ProgressRepositoryError {}
