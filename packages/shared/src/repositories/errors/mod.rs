pub mod activity_repository_errors;
pub mod progress_repository_errors;
pub mod room_repository_errors;
pub mod session_repository_errors;
