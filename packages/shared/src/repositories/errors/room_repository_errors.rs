#[derive(Debug)]
pub enum RoomRepositoryError {
    /// A room document with the generated code already exists.
    CodeInUse,
    NotFound,
    Serialization(String),
    DynamoDb(String),
}

impl std::fmt::Display for RoomRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoomRepositoryError::CodeInUse => write!(f, "Room code already in use"),
            RoomRepositoryError::NotFound => write!(f, "Room not found"),
            RoomRepositoryError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            RoomRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
        }
    }
}

impl std::error::Error for RoomRepositoryError {}
