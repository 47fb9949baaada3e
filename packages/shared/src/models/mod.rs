pub mod activity;
pub mod auth;
pub mod progress;
pub mod room;
pub mod session;
