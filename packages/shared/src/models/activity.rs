use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    SessionHijackAttempt,
    MultipleViolations,
}

/// Append-only audit entry. Never mutated; read back only to count a
/// user's recent entries when deciding whether to escalate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuspiciousActivity {
    pub id: String,
    pub user_id: String,
    pub kind: ActivityKind,
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl SuspiciousActivity {
    pub fn new(user_id: &str, kind: ActivityKind, details: serde_json::Value) -> Self {
        SuspiciousActivity {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            kind,
            details,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&ActivityKind::SessionHijackAttempt).unwrap(),
            "\"session_hijack_attempt\""
        );
        assert_eq!(
            serde_json::to_string(&ActivityKind::MultipleViolations).unwrap(),
            "\"multiple_violations\""
        );
    }

    #[test]
    fn test_new_activity() {
        let activity = SuspiciousActivity::new(
            "user-1",
            ActivityKind::SessionHijackAttempt,
            json!({ "session_id": "abc" }),
        );

        assert!(!activity.id.is_empty());
        assert_eq!(activity.user_id, "user-1");
        assert_eq!(activity.details["session_id"], "abc");
    }
}
