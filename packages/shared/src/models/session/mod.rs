pub mod requests;
pub mod responses;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Hard ceiling on points a single correct answer can be worth. Used to
/// clamp claimed scores during validation.
pub const MAX_POINTS_PER_ANSWER: u32 = 100;

/// One completed solo game, submitted for server-side validation.
/// Finalized exactly once: `validated` flips to true and either `flagged`
/// is set or a `validated_score` is recorded, never both reworked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    pub session_id: String,
    pub user_id: String,
    pub category: Option<String>,
    pub started_at: DateTime<Utc>,
    pub validated: bool,
    pub flagged: bool,
    pub perfect_game: bool,
    pub claimed_score: Option<u32>,
    pub validated_score: Option<u32>,
    pub violations: Option<Vec<Violation>>,
    pub validated_at: Option<DateTime<Utc>>,
}

impl GameSession {
    pub fn new(user_id: &str, category: Option<String>) -> Self {
        GameSession {
            session_id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            category,
            started_at: Utc::now(),
            validated: false,
            flagged: false,
            perfect_game: false,
            claimed_score: None,
            validated_score: None,
            violations: None,
            validated_at: None,
        }
    }
}

/// Answer entry as submitted by the client at game end. `time_to_answer_ms`
/// is absent when the client could not measure it; only measured times are
/// checked against the timing floor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionAnswer {
    pub question_index: usize,
    pub answer_index: i32,
    pub is_correct: bool,
    pub time_to_answer_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Violation {
    FastAnswer {
        question_index: usize,
        time_ms: u64,
    },
    GameTooFast {
        total_ms: i64,
        expected_ms: i64,
    },
    ScoreExceedsMax {
        claimed: u32,
        max_possible: u32,
    },
    ExcessivePerfectGames {
        count: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_defaults() {
        let session = GameSession::new("user-1", Some("history".into()));

        assert!(!session.session_id.is_empty());
        assert_eq!(session.user_id, "user-1");
        assert_eq!(session.category.as_deref(), Some("history"));
        assert!(!session.validated);
        assert!(!session.flagged);
        assert!(session.validated_score.is_none());
        assert!(session.violations.is_none());

        let now = Utc::now();
        assert!((now - session.started_at).num_seconds() < 10);
    }

    #[test]
    fn test_session_id_uniqueness() {
        let a = GameSession::new("user-1", None);
        let b = GameSession::new("user-1", None);
        assert_ne!(a.session_id, b.session_id);
    }

    #[test]
    fn test_violation_tagged_serialization() {
        let violation = Violation::FastAnswer {
            question_index: 3,
            time_ms: 120,
        };
        let serialized = serde_json::to_string(&violation).unwrap();
        assert!(serialized.contains("\"type\":\"fast_answer\""));
        assert!(serialized.contains("\"time_ms\":120"));

        let deserialized: Violation = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, violation);
    }

    #[test]
    fn test_session_serialization_roundtrip() {
        let mut session = GameSession::new("user-1", None);
        session.validated = true;
        session.validated_score = Some(250);
        session.violations = Some(vec![Violation::ScoreExceedsMax {
            claimed: 400,
            max_possible: 250,
        }]);

        let serialized = serde_json::to_string(&session).unwrap();
        let deserialized: GameSession = serde_json::from_str(&serialized).unwrap();

        assert_eq!(deserialized.session_id, session.session_id);
        assert_eq!(deserialized.validated_score, Some(250));
        assert_eq!(deserialized.violations.unwrap().len(), 1);
    }
}
