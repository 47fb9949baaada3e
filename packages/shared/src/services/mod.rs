pub mod activity_service;
pub mod answer_tracker;
pub mod auth_service;
pub mod errors;
pub mod room_service;
pub mod session_service;
