use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-user running totals. Score counters are only ever moved through
/// atomic increments in the repository, so concurrent writers of the same
/// user's progress (e.g. two open tabs) cannot lose updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProgress {
    pub user_id: String,
    #[serde(default)]
    pub total_score: u64,
    #[serde(default)]
    pub games_played: u64,
    #[serde(default)]
    pub last_validated_score: Option<u32>,
    #[serde(default)]
    pub last_game_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub flagged_for_review: bool,
    #[serde(default)]
    pub flagged_at: Option<DateTime<Utc>>,
}

impl UserProgress {
    /// Zeroed record for users who have never finished a validated game.
    pub fn empty(user_id: &str) -> Self {
        UserProgress {
            user_id: user_id.to_string(),
            total_score: 0,
            games_played: 0,
            last_validated_score: None,
            last_game_at: None,
            flagged_for_review: false,
            flagged_at: None,
        }
    }
}
