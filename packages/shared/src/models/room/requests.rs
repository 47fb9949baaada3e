use serde::{Deserialize, Serialize};

use crate::models::room::{Difficulty, Question};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoomRequest {
    pub display_name: String,
    pub difficulty: Difficulty,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRoomRequest {
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAnswerRequest {
    pub question_index: usize,
    /// Selected option, or -1 when the question timer fired unanswered.
    pub answer_index: i32,
    pub time_to_answer_ms: u64,
}
