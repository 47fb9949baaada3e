use serde::{Deserialize, Serialize};

use crate::models::room::MatchOutcome;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoomResponse {
    pub room_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResultResponse {
    pub outcome: MatchOutcome,
    pub your_score: u32,
    pub opponent_score: u32,
    pub opponent_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}
