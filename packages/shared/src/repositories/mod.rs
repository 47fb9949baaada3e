pub mod activity_repository;
pub mod connection_repository;
pub mod errors;
pub mod progress_repository;
pub mod room_repository;
pub mod session_repository;
