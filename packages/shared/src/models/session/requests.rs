use serde::{Deserialize, Serialize};

use crate::models::session::SessionAnswer;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartSessionRequest {
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateSessionRequest {
    pub session_id: String,
    pub answers: Vec<SessionAnswer>,
    pub final_score: u32,
    pub category: Option<String>,
}
