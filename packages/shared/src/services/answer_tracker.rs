//! Shared answer-submission protocol used by both the solo loop and the
//! battle path: append-only answer recording, the scoring formulas, and
//! the client-side timing guard that mirrors the server validator's
//! minimum-time rule.

use chrono::Utc;

use crate::models::room::{AnswerRecord, Difficulty, QUESTION_TIME_SECS, TIMEOUT_ANSWER_INDEX};

/// Minimum believable time to read and answer a question. Matches the
/// server-side validation floor.
pub const MIN_ANSWER_TIME_MS: u64 = 500;

/// Suspicious submissions tolerated before the game is flagged locally.
pub const SUSPICIOUS_ACTION_LIMIT: u32 = 5;

/// Base points for a correct answer in solo play.
pub const SOLO_BASE_POINTS: u32 = 10;

/// Whole seconds left on the fixed question timer after answering.
/// Elapsed values beyond the timer, however large, leave zero seconds.
pub fn remaining_seconds(time_to_answer_ms: u64) -> u32 {
    let elapsed_secs = u32::try_from(time_to_answer_ms / 1000).unwrap_or(u32::MAX);
    QUESTION_TIME_SECS.saturating_sub(elapsed_secs)
}

/// Battle scoring: speed-weighted, floor of 10 for any correct answer,
/// nothing for a miss. No difficulty bonus in the battle path.
pub fn battle_points(is_correct: bool, time_to_answer_ms: u64) -> u32 {
    if is_correct {
        std::cmp::max(10, remaining_seconds(time_to_answer_ms) * 2)
    } else {
        0
    }
}

/// Solo scoring: flat base plus a difficulty bonus, doubled while the
/// double-points power-up is active.
pub fn solo_points(is_correct: bool, difficulty: Difficulty, double_points: bool) -> u32 {
    if !is_correct {
        return 0;
    }
    let points = SOLO_BASE_POINTS + difficulty.solo_bonus();
    if double_points {
        points * 2
    } else {
        points
    }
}

pub fn is_suspicious_timing(time_to_answer_ms: u64) -> bool {
    time_to_answer_ms < MIN_ANSWER_TIME_MS
}

/// Per-game tracker driving one player's run through a question sequence.
/// Records are append-only and indexed by submission order.
#[derive(Debug)]
pub struct AnswerTracker {
    question_count: usize,
    next_index: usize,
    score: u32,
    answers: Vec<AnswerRecord>,
    suspicious_actions: u32,
}

impl AnswerTracker {
    pub fn new(question_count: usize) -> Self {
        AnswerTracker {
            question_count,
            next_index: 0,
            score: 0,
            answers: Vec::with_capacity(question_count),
            suspicious_actions: 0,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    pub fn current_question_index(&self) -> usize {
        self.next_index
    }

    pub fn suspicious_actions(&self) -> u32 {
        self.suspicious_actions
    }

    /// True once enough suspicious submissions accumulated that rewards
    /// must not be credited client-side. The server validator still runs
    /// its own checks regardless.
    pub fn flagged(&self) -> bool {
        self.suspicious_actions >= SUSPICIOUS_ACTION_LIMIT
    }

    pub fn is_complete(&self) -> bool {
        self.next_index >= self.question_count
    }

    pub fn record_battle_answer(
        &mut self,
        answer_index: i32,
        is_correct: bool,
        time_to_answer_ms: u64,
    ) -> &AnswerRecord {
        let points = battle_points(is_correct, time_to_answer_ms);
        self.record(answer_index, is_correct, points, time_to_answer_ms)
    }

    pub fn record_solo_answer(
        &mut self,
        answer_index: i32,
        is_correct: bool,
        difficulty: Difficulty,
        double_points: bool,
        time_to_answer_ms: u64,
    ) -> &AnswerRecord {
        let points = solo_points(is_correct, difficulty, double_points);
        self.record(answer_index, is_correct, points, time_to_answer_ms)
    }

    /// Records a timer expiry: no selection, always incorrect, zero
    /// points, still advances the local index.
    pub fn record_timeout(&mut self) -> &AnswerRecord {
        let timeout_ms = (QUESTION_TIME_SECS as u64) * 1000;
        self.record(TIMEOUT_ANSWER_INDEX, false, 0, timeout_ms)
    }

    fn record(
        &mut self,
        answer_index: i32,
        is_correct: bool,
        points: u32,
        time_to_answer_ms: u64,
    ) -> &AnswerRecord {
        if is_suspicious_timing(time_to_answer_ms) {
            self.suspicious_actions += 1;
        }

        let record = AnswerRecord {
            question_index: self.next_index,
            answer_index,
            is_correct,
            points,
            timestamp: Utc::now(),
            time_to_answer_ms,
        };

        self.score += points;
        self.next_index += 1;
        let index = self.answers.len();
        self.answers.push(record);
        &self.answers[index]
    }
}
