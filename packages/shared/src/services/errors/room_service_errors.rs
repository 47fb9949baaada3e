use crate::repositories::errors::room_repository_errors::RoomRepositoryError;

#[derive(Debug)]
pub enum RoomServiceError {
    ValidationError(String),
    RoomNotFound,
    RoomFull,
    AlreadyStarted,
    /// Caller is not a participant of the room.
    NotInRoom,
    /// Status-mutating call from a non-host participant.
    NotHost,
    /// The room is not accepting answers in its current status.
    NotPlaying,
    /// Results were requested before the game finished.
    NotFinished,
    /// Code generation exhausted its retries without finding a free code.
    CodeGenerationFailed,
    RepositoryError(String),
}

impl RoomServiceError {
    /// Stable machine-readable code surfaced to clients.
    pub fn code(&self) -> &'static str {
        match self {
            RoomServiceError::ValidationError(_) => "invalid-argument",
            RoomServiceError::RoomNotFound => "room-not-found",
            RoomServiceError::RoomFull => "room-full",
            RoomServiceError::AlreadyStarted => "already-started",
            RoomServiceError::NotInRoom => "not-in-room",
            RoomServiceError::NotHost => "not-host",
            RoomServiceError::NotPlaying => "not-playing",
            RoomServiceError::NotFinished => "not-finished",
            RoomServiceError::CodeGenerationFailed => "internal",
            RoomServiceError::RepositoryError(_) => "internal",
        }
    }
}

impl std::fmt::Display for RoomServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoomServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            RoomServiceError::RoomNotFound => write!(f, "Room not found"),
            RoomServiceError::RoomFull => write!(f, "Room is full"),
            RoomServiceError::AlreadyStarted => write!(f, "Game already started"),
            RoomServiceError::NotInRoom => write!(f, "Player is not in this room"),
            RoomServiceError::NotHost => write!(f, "Only the host may do this"),
            RoomServiceError::NotPlaying => write!(f, "Game is not in progress"),
            RoomServiceError::NotFinished => write!(f, "Game has not finished"),
            RoomServiceError::CodeGenerationFailed => {
                write!(f, "Could not generate a unique room code")
            }
            RoomServiceError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for RoomServiceError {}

impl From<RoomRepositoryError> for RoomServiceError {
    fn from(err: RoomRepositoryError) -> Self {
        match err {
            RoomRepositoryError::NotFound => RoomServiceError::RoomNotFound,
            other => RoomServiceError::RepositoryError(other.to_string()),
        }
    }
}
