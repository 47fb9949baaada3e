use serde::{Deserialize, Serialize};

use crate::models::session::Violation;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartSessionResponse {
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateSessionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validated_score: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flagged: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Non-fatal violations (0-2) surfaced even when scoring succeeds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Vec<Violation>>,
}
