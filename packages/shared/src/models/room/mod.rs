pub mod requests;
pub mod responses;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Length of the human-shareable invite code.
pub const ROOM_CODE_LEN: usize = 6;

/// Fixed per-question countdown, seconds.
pub const QUESTION_TIME_SECS: u32 = 15;

/// Lead time between the host pressing start and play beginning.
pub const COUNTDOWN_LEAD_MS: i64 = 3000;

/// A player silent for longer than this while the game is in progress
/// is treated as disconnected and forfeits.
pub const PRESENCE_TIMEOUT_SECS: i64 = 30;

/// Answer index written when the question timer fires with no selection.
pub const TIMEOUT_ANSWER_INDEX: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Per-correct-answer bonus applied in solo play only. The battle
    /// path awards speed-weighted points with no difficulty bonus.
    pub fn solo_bonus(&self) -> u32 {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 5,
            Difficulty::Hard => 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Waiting,
    Countdown,
    Playing,
    Finished,
}

/// Question snapshot copied into the room at creation time. Immutable for
/// the room's lifetime so both players see identical, ordered questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    pub category: String,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_index: usize,
    pub answer_index: i32,
    pub is_correct: bool,
    pub points: u32,
    pub timestamp: DateTime<Utc>,
    pub time_to_answer_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSlot {
    pub id: String,
    pub display_name: String,
    pub score: u32,
    pub current_question_index: usize,
    pub answers: Vec<AnswerRecord>,
    pub ready: bool,
    pub connected: bool,
    pub last_seen: DateTime<Utc>,
    pub suspicious_actions: u32,
}

impl PlayerSlot {
    pub fn new(id: &str, display_name: &str) -> Self {
        PlayerSlot {
            id: id.to_string(),
            display_name: display_name.to_string(),
            score: 0,
            current_question_index: 0,
            answers: Vec::new(),
            ready: true,
            connected: true,
            last_seen: Utc::now(),
            suspicious_actions: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchOutcome {
    Win,
    Loss,
    Tie,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub room_code: String,
    pub host: PlayerSlot,
    pub guest: Option<PlayerSlot>,
    pub questions: Vec<Question>,
    pub difficulty: Difficulty,
    pub status: RoomStatus,
    pub current_question_index: usize,
    pub created_at: DateTime<Utc>,
    pub game_start_time: Option<DateTime<Utc>>,
    pub forfeited_by: Option<String>,
}

impl Room {
    pub fn new(
        room_code: String,
        host_id: &str,
        host_name: &str,
        questions: Vec<Question>,
        difficulty: Difficulty,
    ) -> Self {
        Room {
            room_code,
            host: PlayerSlot::new(host_id, host_name),
            guest: None,
            questions,
            difficulty,
            status: RoomStatus::Waiting,
            current_question_index: 0,
            created_at: Utc::now(),
            game_start_time: None,
            forfeited_by: None,
        }
    }

    pub fn is_full(&self) -> bool {
        self.guest.is_some()
    }

    pub fn is_host(&self, player_id: &str) -> bool {
        self.host.id == player_id
    }

    pub fn slot(&self, player_id: &str) -> Option<&PlayerSlot> {
        if self.host.id == player_id {
            Some(&self.host)
        } else {
            self.guest.as_ref().filter(|g| g.id == player_id)
        }
    }

    pub fn slot_mut(&mut self, player_id: &str) -> Option<&mut PlayerSlot> {
        if self.host.id == player_id {
            Some(&mut self.host)
        } else {
            self.guest.as_mut().filter(|g| g.id == player_id)
        }
    }

    pub fn opponent_of(&self, player_id: &str) -> Option<&PlayerSlot> {
        if self.host.id == player_id {
            self.guest.as_ref()
        } else if self.guest.as_ref().is_some_and(|g| g.id == player_id) {
            Some(&self.host)
        } else {
            None
        }
    }

    /// True once the countdown lead time has elapsed and the room should
    /// be promoted to playing.
    pub fn countdown_elapsed(&self, now: DateTime<Utc>) -> bool {
        self.status == RoomStatus::Countdown
            && self
                .game_start_time
                .is_some_and(|start| now >= start)
    }

    /// True when a playing participant has been silent past the presence
    /// timeout.
    pub fn presence_expired(slot: &PlayerSlot, now: DateTime<Utc>) -> bool {
        now - slot.last_seen > Duration::seconds(PRESENCE_TIMEOUT_SECS)
    }

    /// Outcome for one participant of a finished room. A forfeit hands the
    /// win to the remaining player; otherwise final scores decide and a
    /// tie is a named result, not an error.
    pub fn outcome_for(&self, player_id: &str) -> Option<MatchOutcome> {
        let me = self.slot(player_id)?;
        let opponent = self.opponent_of(player_id)?;

        if let Some(forfeiter) = &self.forfeited_by {
            return Some(if forfeiter == &me.id {
                MatchOutcome::Loss
            } else {
                MatchOutcome::Win
            });
        }

        Some(if me.score > opponent.score {
            MatchOutcome::Win
        } else if me.score < opponent.score {
            MatchOutcome::Loss
        } else {
            MatchOutcome::Tie
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_questions(count: usize) -> Vec<Question> {
        (0..count)
            .map(|i| Question {
                prompt: format!("Question {}", i),
                options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
                correct_answer: i % 4,
                category: "general".into(),
                difficulty: Difficulty::Medium,
            })
            .collect()
    }

    #[test]
    fn test_new_room_defaults() {
        let room = Room::new(
            "ABC123".into(),
            "host-1",
            "Amina",
            sample_questions(10),
            Difficulty::Medium,
        );

        assert_eq!(room.room_code, "ABC123");
        assert_eq!(room.status, RoomStatus::Waiting);
        assert!(room.guest.is_none());
        assert!(!room.is_full());
        assert_eq!(room.host.score, 0);
        assert!(room.host.answers.is_empty());
        assert!(room.game_start_time.is_none());
        assert_eq!(room.questions.len(), 10);
    }

    #[test]
    fn test_slot_lookup() {
        let mut room = Room::new(
            "ABC123".into(),
            "host-1",
            "Amina",
            sample_questions(2),
            Difficulty::Easy,
        );
        room.guest = Some(PlayerSlot::new("guest-1", "Kofi"));

        assert_eq!(room.slot("host-1").unwrap().display_name, "Amina");
        assert_eq!(room.slot("guest-1").unwrap().display_name, "Kofi");
        assert!(room.slot("stranger").is_none());
        assert_eq!(room.opponent_of("host-1").unwrap().id, "guest-1");
        assert_eq!(room.opponent_of("guest-1").unwrap().id, "host-1");
        assert!(room.opponent_of("stranger").is_none());
    }

    #[test]
    fn test_outcome_from_scores() {
        let mut room = Room::new(
            "ABC123".into(),
            "host-1",
            "Amina",
            sample_questions(2),
            Difficulty::Easy,
        );
        room.guest = Some(PlayerSlot::new("guest-1", "Kofi"));
        room.status = RoomStatus::Finished;
        room.host.score = 120;
        room.guest.as_mut().unwrap().score = 90;

        assert_eq!(room.outcome_for("host-1"), Some(MatchOutcome::Win));
        assert_eq!(room.outcome_for("guest-1"), Some(MatchOutcome::Loss));

        room.guest.as_mut().unwrap().score = 120;
        assert_eq!(room.outcome_for("host-1"), Some(MatchOutcome::Tie));
        assert_eq!(room.outcome_for("guest-1"), Some(MatchOutcome::Tie));
    }

    #[test]
    fn test_outcome_after_forfeit_ignores_scores() {
        let mut room = Room::new(
            "ABC123".into(),
            "host-1",
            "Amina",
            sample_questions(2),
            Difficulty::Easy,
        );
        room.guest = Some(PlayerSlot::new("guest-1", "Kofi"));
        room.status = RoomStatus::Finished;
        room.host.score = 10;
        room.guest.as_mut().unwrap().score = 200;
        room.forfeited_by = Some("guest-1".into());

        assert_eq!(room.outcome_for("host-1"), Some(MatchOutcome::Win));
        assert_eq!(room.outcome_for("guest-1"), Some(MatchOutcome::Loss));
    }

    #[test]
    fn test_countdown_elapsed() {
        let mut room = Room::new(
            "ABC123".into(),
            "host-1",
            "Amina",
            sample_questions(2),
            Difficulty::Easy,
        );
        let now = Utc::now();

        room.status = RoomStatus::Countdown;
        room.game_start_time = Some(now + Duration::milliseconds(COUNTDOWN_LEAD_MS));
        assert!(!room.countdown_elapsed(now));
        assert!(room.countdown_elapsed(now + Duration::milliseconds(COUNTDOWN_LEAD_MS)));

        room.status = RoomStatus::Waiting;
        assert!(!room.countdown_elapsed(now + Duration::days(1)));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&RoomStatus::Countdown).unwrap(),
            "\"countdown\""
        );
        assert_eq!(
            serde_json::to_string(&Difficulty::Hard).unwrap(),
            "\"hard\""
        );
        assert_eq!(
            serde_json::to_string(&MatchOutcome::Tie).unwrap(),
            "\"tie\""
        );
    }

    #[test]
    fn test_room_serialization_roundtrip() {
        let mut room = Room::new(
            "XY42ZQ".into(),
            "host-1",
            "Amina",
            sample_questions(3),
            Difficulty::Hard,
        );
        room.guest = Some(PlayerSlot::new("guest-1", "Kofi"));

        let serialized = serde_json::to_string(&room).unwrap();
        let deserialized: Room = serde_json::from_str(&serialized).unwrap();

        assert_eq!(deserialized.room_code, room.room_code);
        assert_eq!(deserialized.status, RoomStatus::Waiting);
        assert_eq!(deserialized.guest.unwrap().id, "guest-1");
        assert_eq!(deserialized.questions.len(), 3);
    }
}
