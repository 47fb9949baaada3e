#[derive(Debug)]
pub enum ActivityRepositoryError {
    Serialization(String),
    DynamoDb(String),
}

impl std::fmt::Display for ActivityRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityRepositoryError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            ActivityRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
        }
    }
}

impl std::error::Error for ActivityRepositoryError {}
