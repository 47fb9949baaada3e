pub mod activity_service_errors;
pub mod auth_service_errors;
pub mod room_service_errors;
pub mod session_service_errors;
