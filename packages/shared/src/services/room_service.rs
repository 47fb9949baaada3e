use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use tracing::{info, warn};

use crate::models::room::requests::SubmitAnswerRequest;
use crate::models::room::responses::MatchResultResponse;
use crate::models::room::{
    AnswerRecord, Difficulty, PlayerSlot, Question, Room, RoomStatus, COUNTDOWN_LEAD_MS,
    ROOM_CODE_LEN,
};
use crate::repositories::errors::room_repository_errors::RoomRepositoryError;
use crate::repositories::room_repository::RoomRepository;
use crate::services::answer_tracker::{
    battle_points, is_suspicious_timing, SUSPICIOUS_ACTION_LIMIT,
};
use crate::services::errors::room_service_errors::RoomServiceError;

const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Collision retries before giving up on room creation.
const MAX_CODE_ATTEMPTS: u32 = 5;

/// Coordinates the lifecycle of a two-player battle room. Each participant
/// only ever writes its own slot; room-level status transitions require
/// the host's identity. Time-driven transitions (countdown expiry,
/// presence timeouts) are applied lazily on the next read or mutation.
/// They are deterministic, so concurrent writers converge on the same
/// document state.
#[derive(Clone)]
pub struct RoomService {
    repository: Arc<dyn RoomRepository + Send + Sync>,
}

impl RoomService {
    pub fn new(repository: Arc<dyn RoomRepository + Send + Sync>) -> Self {
        RoomService { repository }
    }

    fn generate_room_code() -> String {
        let mut rng = rand::thread_rng();
        (0..ROOM_CODE_LEN)
            .map(|_| CODE_CHARSET[rng.gen_range(0..CODE_CHARSET.len())] as char)
            .collect()
    }

    pub async fn create_room(
        &self,
        host_id: &str,
        host_name: &str,
        questions: Vec<Question>,
        difficulty: Difficulty,
    ) -> Result<Room, RoomServiceError> {
        if host_id.is_empty() || host_name.is_empty() {
            return Err(RoomServiceError::ValidationError(
                "Host id and display name cannot be empty".to_string(),
            ));
        }
        if questions.is_empty() {
            return Err(RoomServiceError::ValidationError(
                "A room needs at least one question".to_string(),
            ));
        }
        for question in &questions {
            if question.options.len() < 2 || question.correct_answer >= question.options.len() {
                return Err(RoomServiceError::ValidationError(format!(
                    "Malformed question: {}",
                    question.prompt
                )));
            }
        }

        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = Self::generate_room_code();
            let room = Room::new(
                code.clone(),
                host_id,
                host_name,
                questions.clone(),
                difficulty,
            );

            match self.repository.create_room(&room).await {
                Ok(()) => {
                    info!("Created room {} for host {}", code, host_id);
                    return Ok(room);
                }
                Err(RoomRepositoryError::CodeInUse) => {
                    warn!("Room code {} already taken, regenerating", code);
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(RoomServiceError::CodeGenerationFailed)
    }

    /// Reads the room, applying any due time-driven transitions first.
    pub async fn get_room(&self, room_code: &str) -> Result<Room, RoomServiceError> {
        let mut room = self.require_room(room_code).await?;
        if Self::apply_time_transitions(&mut room, Utc::now()) {
            self.repository.update_room(&room).await?;
        }
        Ok(room)
    }

    pub async fn join_room(
        &self,
        room_code: &str,
        guest_id: &str,
        guest_name: &str,
    ) -> Result<Room, RoomServiceError> {
        if guest_id.is_empty() || guest_name.is_empty() {
            return Err(RoomServiceError::ValidationError(
                "Guest id and display name cannot be empty".to_string(),
            ));
        }

        let mut room = self.require_room(room_code).await?;

        if room.is_host(guest_id) {
            return Err(RoomServiceError::ValidationError(
                "Cannot join your own room".to_string(),
            ));
        }
        if room.status != RoomStatus::Waiting {
            return Err(RoomServiceError::AlreadyStarted);
        }
        if room.is_full() {
            return Err(RoomServiceError::RoomFull);
        }

        room.guest = Some(PlayerSlot::new(guest_id, guest_name));
        self.repository.update_room(&room).await?;

        info!("Player {} joined room {}", guest_id, room_code);
        Ok(room)
    }

    /// Host-only. No-ops when the guest is missing or the game already
    /// left the waiting state; the countdown-to-playing promotion happens
    /// on a later read once the lead time has elapsed.
    pub async fn start_game(
        &self,
        room_code: &str,
        caller_id: &str,
    ) -> Result<Room, RoomServiceError> {
        let mut room = self.require_room(room_code).await?;

        if !room.is_host(caller_id) {
            return Err(RoomServiceError::NotHost);
        }
        if room.guest.is_none() || room.status != RoomStatus::Waiting {
            return Ok(room);
        }

        room.status = RoomStatus::Countdown;
        room.game_start_time = Some(Utc::now() + Duration::milliseconds(COUNTDOWN_LEAD_MS));
        self.repository.update_room(&room).await?;

        info!("Room {} entering countdown", room_code);
        Ok(room)
    }

    /// Records one answer into the caller's own slot. Correctness and
    /// points are recomputed from the room's question snapshot rather
    /// than taken from the client. The first player to complete the
    /// sequence flips the room to finished, but the slower player's
    /// remaining answers still land so the final document carries both
    /// full runs.
    pub async fn submit_answer(
        &self,
        room_code: &str,
        player_id: &str,
        request: &SubmitAnswerRequest,
    ) -> Result<Room, RoomServiceError> {
        let mut room = self.require_room(room_code).await?;
        let now = Utc::now();
        let transitioned = Self::apply_time_transitions(&mut room, now);

        let accepting = match room.status {
            RoomStatus::Playing => true,
            RoomStatus::Finished => room.forfeited_by.is_none(),
            RoomStatus::Waiting | RoomStatus::Countdown => false,
        };
        if !accepting {
            if transitioned {
                self.repository.update_room(&room).await?;
            }
            return Err(RoomServiceError::NotPlaying);
        }

        let question_count = room.questions.len();
        let is_host = room.is_host(player_id);
        let question = room
            .questions
            .get(request.question_index)
            .cloned()
            .ok_or_else(|| {
                RoomServiceError::ValidationError("Question index out of range".to_string())
            })?;

        let slot = room
            .slot_mut(player_id)
            .ok_or(RoomServiceError::NotInRoom)?;

        if request.question_index != slot.current_question_index {
            return Err(RoomServiceError::ValidationError(
                "Answer submitted out of order".to_string(),
            ));
        }

        let is_correct = request.answer_index >= 0
            && request.answer_index as usize == question.correct_answer;

        if is_suspicious_timing(request.time_to_answer_ms) {
            slot.suspicious_actions += 1;
            warn!(
                "Suspiciously fast answer from {} in room {} ({} ms)",
                player_id, room_code, request.time_to_answer_ms
            );
        }

        // A flagged player keeps playing but stops earning points.
        let points = if slot.suspicious_actions >= SUSPICIOUS_ACTION_LIMIT {
            0
        } else {
            battle_points(is_correct, request.time_to_answer_ms)
        };

        slot.answers.push(AnswerRecord {
            question_index: request.question_index,
            answer_index: request.answer_index,
            is_correct,
            points,
            timestamp: now,
            time_to_answer_ms: request.time_to_answer_ms,
        });
        slot.score += points;
        slot.current_question_index += 1;
        slot.last_seen = now;
        slot.connected = true;

        let finished = slot.current_question_index >= question_count;

        if is_host {
            room.current_question_index = room.host.current_question_index;
        }
        if finished {
            room.status = RoomStatus::Finished;
            info!("Room {} finished by {}", room_code, player_id);
        }

        self.repository.update_room(&room).await?;
        Ok(room)
    }

    pub async fn heartbeat(
        &self,
        room_code: &str,
        player_id: &str,
    ) -> Result<Room, RoomServiceError> {
        let mut room = self.require_room(room_code).await?;
        let now = Utc::now();

        {
            let slot = room
                .slot_mut(player_id)
                .ok_or(RoomServiceError::NotInRoom)?;
            slot.last_seen = now;
            slot.connected = true;
        }

        Self::apply_time_transitions(&mut room, now);
        self.repository.update_room(&room).await?;
        Ok(room)
    }

    /// Host leaving tears the room down for both players. A guest leaving
    /// while waiting frees the slot; leaving mid-game forfeits.
    pub async fn leave_room(
        &self,
        room_code: &str,
        player_id: &str,
    ) -> Result<(), RoomServiceError> {
        let mut room = self.require_room(room_code).await?;

        if room.is_host(player_id) {
            self.repository.delete_room(room_code).await?;
            info!("Host left, room {} deleted", room_code);
            return Ok(());
        }

        let is_guest = room.guest.as_ref().is_some_and(|g| g.id == player_id);
        if !is_guest {
            return Err(RoomServiceError::NotInRoom);
        }

        match room.status {
            RoomStatus::Waiting => {
                room.guest = None;
            }
            RoomStatus::Countdown | RoomStatus::Playing => {
                room.forfeited_by = Some(player_id.to_string());
                room.status = RoomStatus::Finished;
                if let Some(guest) = room.guest.as_mut() {
                    guest.connected = false;
                }
                info!("Guest {} forfeited room {}", player_id, room_code);
            }
            RoomStatus::Finished => {
                if let Some(guest) = room.guest.as_mut() {
                    guest.connected = false;
                }
            }
        }

        self.repository.update_room(&room).await?;
        Ok(())
    }

    pub async fn result_for(
        &self,
        room_code: &str,
        player_id: &str,
    ) -> Result<MatchResultResponse, RoomServiceError> {
        let room = self.get_room(room_code).await?;

        if room.status != RoomStatus::Finished {
            return Err(RoomServiceError::NotFinished);
        }

        let me = room.slot(player_id).ok_or(RoomServiceError::NotInRoom)?;
        let opponent = room
            .opponent_of(player_id)
            .ok_or(RoomServiceError::NotInRoom)?;
        let outcome = room
            .outcome_for(player_id)
            .ok_or(RoomServiceError::NotInRoom)?;

        Ok(MatchResultResponse {
            outcome,
            your_score: me.score,
            opponent_score: opponent.score,
            opponent_name: opponent.display_name.clone(),
        })
    }

    async fn require_room(&self, room_code: &str) -> Result<Room, RoomServiceError> {
        self.repository
            .get_room(room_code)
            .await?
            .ok_or(RoomServiceError::RoomNotFound)
    }

    /// Applies countdown expiry and the presence sweep. Returns true when
    /// the document changed and needs writing back.
    fn apply_time_transitions(room: &mut Room, now: DateTime<Utc>) -> bool {
        let mut changed = false;

        if room.countdown_elapsed(now) {
            room.status = RoomStatus::Playing;
            changed = true;
        }

        if room.status == RoomStatus::Playing {
            let host_gone = Room::presence_expired(&room.host, now);
            let guest_gone = room
                .guest
                .as_ref()
                .is_some_and(|g| Room::presence_expired(g, now));

            if host_gone {
                room.host.connected = false;
            }
            if guest_gone {
                if let Some(guest) = room.guest.as_mut() {
                    guest.connected = false;
                }
            }

            match (host_gone, guest_gone) {
                (true, false) => {
                    room.forfeited_by = Some(room.host.id.clone());
                    room.status = RoomStatus::Finished;
                    changed = true;
                }
                (false, true) => {
                    room.forfeited_by = room.guest.as_ref().map(|g| g.id.clone());
                    room.status = RoomStatus::Finished;
                    changed = true;
                }
                (true, true) => {
                    // Both silent: end the match and let scores decide.
                    room.status = RoomStatus::Finished;
                    changed = true;
                }
                (false, false) => {}
            }
        }

        changed
    }
}
