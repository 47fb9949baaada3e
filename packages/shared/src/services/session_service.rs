use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::json;
use tracing::{info, warn};

use crate::models::activity::ActivityKind;
use crate::models::session::requests::ValidateSessionRequest;
use crate::models::session::responses::ValidateSessionResponse;
use crate::models::session::{GameSession, SessionAnswer, Violation, MAX_POINTS_PER_ANSWER};
use crate::repositories::progress_repository::ProgressRepository;
use crate::repositories::session_repository::SessionRepository;
use crate::services::activity_service::ActivityService;
use crate::services::answer_tracker::MIN_ANSWER_TIME_MS;
use crate::services::errors::session_service_errors::SessionServiceError;

/// Minimum plausible time per question when checking whole-game duration.
const MIN_MS_PER_QUESTION: i64 = 3000;

/// Violations at or above this count mark the session as flagged and
/// withhold all credit.
const VIOLATION_FLAG_THRESHOLD: usize = 3;

/// Perfect games allowed per rolling hour, the one being validated
/// included.
const PERFECT_GAME_LIMIT: usize = 5;

/// Validates finished solo sessions server-side. The client reports its
/// own answers and score; validation never trusts the claimed score,
/// recomputing the ceiling from the answers and clamping to it. A session
/// is finalized exactly once.
#[derive(Clone)]
pub struct SessionService {
    session_repository: Arc<dyn SessionRepository + Send + Sync>,
    progress_repository: Arc<dyn ProgressRepository + Send + Sync>,
    activity_service: ActivityService,
}

impl SessionService {
    pub fn new(
        session_repository: Arc<dyn SessionRepository + Send + Sync>,
        progress_repository: Arc<dyn ProgressRepository + Send + Sync>,
        activity_service: ActivityService,
    ) -> Self {
        SessionService {
            session_repository,
            progress_repository,
            activity_service,
        }
    }

    /// Opens a session the moment the player starts a game. The server
    /// records the start time; elapsed-time checks at validation measure
    /// against it rather than anything the client reports.
    pub async fn start_session(
        &self,
        user_id: &str,
        category: Option<String>,
    ) -> Result<GameSession, SessionServiceError> {
        if user_id.is_empty() {
            return Err(SessionServiceError::InvalidArgument(
                "User id cannot be empty".to_string(),
            ));
        }

        let session = GameSession::new(user_id, category);
        self.session_repository.create_session(&session).await?;

        info!("Started session {} for user {}", session.session_id, user_id);
        Ok(session)
    }

    /// Validates a finished session and credits the score when it holds
    /// up. Fewer than three violations are surfaced as warnings alongside
    /// a clamped score; three or more flag the session, withhold credit,
    /// and write an audit entry.
    pub async fn validate_session(
        &self,
        caller_id: &str,
        request: &ValidateSessionRequest,
    ) -> Result<ValidateSessionResponse, SessionServiceError> {
        if request.session_id.is_empty() {
            return Err(SessionServiceError::InvalidArgument(
                "Session id cannot be empty".to_string(),
            ));
        }

        let mut session = self
            .session_repository
            .get_session(&request.session_id)
            .await?
            .ok_or(SessionServiceError::NotFound)?;

        if session.user_id != caller_id {
            warn!(
                "User {} submitted results for session {} owned by {}",
                caller_id, session.session_id, session.user_id
            );
            self.activity_service
                .record(
                    caller_id,
                    ActivityKind::SessionHijackAttempt,
                    json!({
                        "session_id": session.session_id,
                        "owner_id": session.user_id,
                    }),
                )
                .await?;
            return Err(SessionServiceError::PermissionDenied);
        }

        if session.validated {
            return Err(SessionServiceError::AlreadyValidated);
        }

        let now = Utc::now();
        let mut violations = Vec::new();

        for answer in &request.answers {
            if let Some(time_ms) = answer.time_to_answer_ms {
                if time_ms < MIN_ANSWER_TIME_MS {
                    violations.push(Violation::FastAnswer {
                        question_index: answer.question_index,
                        time_ms,
                    });
                }
            }
        }

        let total_ms = (now - session.started_at).num_milliseconds();
        let expected_ms = request.answers.len() as i64 * MIN_MS_PER_QUESTION;
        if total_ms < expected_ms {
            violations.push(Violation::GameTooFast {
                total_ms,
                expected_ms,
            });
        }

        let correct_count = request.answers.iter().filter(|a| a.is_correct).count();
        let max_possible = correct_count as u32 * MAX_POINTS_PER_ANSWER;
        if request.final_score > max_possible {
            violations.push(Violation::ScoreExceedsMax {
                claimed: request.final_score,
                max_possible,
            });
        }
        // The clamp is unconditional; a within-bounds claim passes through.
        let validated_score = request.final_score.min(max_possible);

        let perfect_game = Self::is_perfect_game(&request.answers);
        if perfect_game {
            let since = now - Duration::hours(1);
            let recent = self
                .session_repository
                .count_recent_perfect_games(&session.user_id, since)
                .await?;
            if recent + 1 >= PERFECT_GAME_LIMIT {
                violations.push(Violation::ExcessivePerfectGames { count: recent + 1 });
            }
        }

        let flagged = violations.len() >= VIOLATION_FLAG_THRESHOLD;

        session.validated = true;
        session.flagged = flagged;
        session.perfect_game = perfect_game;
        session.claimed_score = Some(request.final_score);
        session.validated_score = if flagged { None } else { Some(validated_score) };
        session.violations = (!violations.is_empty()).then(|| violations.clone());
        session.validated_at = Some(now);

        self.session_repository.finalize_session(&session).await?;

        if flagged {
            warn!(
                "Session {} flagged with {} violations",
                session.session_id,
                violations.len()
            );
            self.activity_service
                .record(
                    &session.user_id,
                    ActivityKind::MultipleViolations,
                    json!({
                        "session_id": session.session_id,
                        "violations": violations,
                        "claimed_score": request.final_score,
                    }),
                )
                .await?;

            return Ok(ValidateSessionResponse {
                success: false,
                validated_score: None,
                flagged: Some(true),
                message: Some(
                    "Session flagged for review due to suspicious activity".to_string(),
                ),
                warnings: None,
            });
        }

        self.progress_repository
            .apply_validated_score(&session.user_id, validated_score)
            .await?;

        info!(
            "Session {} validated, {} points credited to {}",
            session.session_id, validated_score, session.user_id
        );

        Ok(ValidateSessionResponse {
            success: true,
            validated_score: Some(validated_score),
            flagged: None,
            message: None,
            warnings: (!violations.is_empty()).then_some(violations),
        })
    }

    /// Running totals for a user, zeroed when they have never played.
    pub async fn progress_for(
        &self,
        user_id: &str,
    ) -> Result<crate::models::progress::UserProgress, SessionServiceError> {
        Ok(self
            .progress_repository
            .get_progress(user_id)
            .await?
            .unwrap_or_else(|| crate::models::progress::UserProgress::empty(user_id)))
    }

    /// An empty answer sheet is not a perfect game.
    fn is_perfect_game(answers: &[SessionAnswer]) -> bool {
        !answers.is_empty() && answers.iter().all(|a| a.is_correct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::activity_repository::MockActivityRepository;
    use crate::repositories::progress_repository::MockProgressRepository;
    use crate::repositories::session_repository::tests::InMemorySessionRepository;

    struct Fixture {
        sessions: Arc<InMemorySessionRepository>,
        service: SessionService,
    }

    fn setup() -> Fixture {
        setup_with(InMemorySessionRepository::new(), passive_progress(), quiet_activity())
    }

    fn setup_with(
        sessions: InMemorySessionRepository,
        progress: MockProgressRepository,
        activity: MockActivityRepository,
    ) -> Fixture {
        let sessions = Arc::new(sessions);
        let progress = Arc::new(progress);
        let activity_service = ActivityService::new(Arc::new(activity), progress.clone());
        let service =
            SessionService::new(sessions.clone(), progress.clone(), activity_service);
        Fixture { sessions, service }
    }

    /// Progress repository that accepts any credit and never escalates.
    fn passive_progress() -> MockProgressRepository {
        let mut progress = MockProgressRepository::new();
        progress
            .expect_apply_validated_score()
            .returning(|_, _| Ok(()));
        progress.expect_flag_for_review().returning(|_| Ok(()));
        progress
    }

    fn quiet_activity() -> MockActivityRepository {
        let mut activity = MockActivityRepository::new();
        activity.expect_log_activity().returning(|_| Ok(()));
        activity
            .expect_count_recent_for_user()
            .returning(|_, _| Ok(1));
        activity
    }

    fn honest_answers(count: usize, correct: usize) -> Vec<SessionAnswer> {
        (0..count)
            .map(|i| SessionAnswer {
                question_index: i,
                answer_index: 0,
                is_correct: i < correct,
                time_to_answer_ms: Some(4_000),
            })
            .collect()
    }

    /// Starts a session backdated far enough that duration checks pass.
    async fn aged_session(fixture: &Fixture, user_id: &str) -> String {
        let session = fixture
            .service
            .start_session(user_id, Some("general".into()))
            .await
            .unwrap();
        let id = session.session_id.clone();
        let mut stored = fixture.sessions.stored(&id).unwrap();
        stored.started_at = Utc::now() - Duration::minutes(5);
        fixture.sessions.insert(stored);
        id
    }

    fn request(session_id: &str, answers: Vec<SessionAnswer>, final_score: u32) -> ValidateSessionRequest {
        ValidateSessionRequest {
            session_id: session_id.to_string(),
            answers,
            final_score,
            category: Some("general".into()),
        }
    }

    #[tokio::test]
    async fn test_start_session_persists_unvalidated() {
        let fixture = setup();

        let session = fixture
            .service
            .start_session("user-1", Some("history".into()))
            .await
            .unwrap();

        let stored = fixture.sessions.stored(&session.session_id).unwrap();
        assert!(!stored.validated);
        assert!(!stored.flagged);
        assert_eq!(stored.user_id, "user-1");
    }

    #[tokio::test]
    async fn test_start_session_rejects_empty_user() {
        let fixture = setup();
        let result = fixture.service.start_session("", None).await;
        assert!(matches!(
            result,
            Err(SessionServiceError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn test_honest_session_is_credited() {
        let mut progress = MockProgressRepository::new();
        progress
            .expect_apply_validated_score()
            .withf(|user_id, score| user_id == "user-1" && *score == 80)
            .times(1)
            .returning(|_, _| Ok(()));
        let fixture = setup_with(InMemorySessionRepository::new(), progress, quiet_activity());
        let id = aged_session(&fixture, "user-1").await;

        let response = fixture
            .service
            .validate_session("user-1", &request(&id, honest_answers(10, 8), 80))
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.validated_score, Some(80));
        assert!(response.warnings.is_none());
        assert!(response.flagged.is_none());

        let stored = fixture.sessions.stored(&id).unwrap();
        assert!(stored.validated);
        assert!(!stored.flagged);
        assert_eq!(stored.validated_score, Some(80));
        assert_eq!(stored.claimed_score, Some(80));
    }

    #[tokio::test]
    async fn test_unknown_session_not_found() {
        let fixture = setup();
        let result = fixture
            .service
            .validate_session("user-1", &request("missing", honest_answers(2, 2), 20))
            .await;
        assert!(matches!(result, Err(SessionServiceError::NotFound)));
    }

    #[tokio::test]
    async fn test_hijack_attempt_denied_and_audited() {
        let mut activity = MockActivityRepository::new();
        activity
            .expect_log_activity()
            .withf(|entry| {
                entry.user_id == "attacker"
                    && entry.kind == ActivityKind::SessionHijackAttempt
                    && entry.details["owner_id"] == "user-1"
            })
            .times(1)
            .returning(|_| Ok(()));
        activity
            .expect_count_recent_for_user()
            .returning(|_, _| Ok(1));
        let fixture = setup_with(InMemorySessionRepository::new(), passive_progress(), activity);
        let id = aged_session(&fixture, "user-1").await;

        let result = fixture
            .service
            .validate_session("attacker", &request(&id, honest_answers(5, 5), 50))
            .await;

        assert!(matches!(result, Err(SessionServiceError::PermissionDenied)));
        // The owner's session is untouched.
        assert!(!fixture.sessions.stored(&id).unwrap().validated);
    }

    #[tokio::test]
    async fn test_double_validation_rejected() {
        let fixture = setup();
        let id = aged_session(&fixture, "user-1").await;
        let req = request(&id, honest_answers(5, 5), 50);

        fixture.service.validate_session("user-1", &req).await.unwrap();
        let result = fixture.service.validate_session("user-1", &req).await;

        assert!(matches!(result, Err(SessionServiceError::AlreadyValidated)));
    }

    #[tokio::test]
    async fn test_inflated_score_clamped_with_warning() {
        let mut progress = MockProgressRepository::new();
        progress
            .expect_apply_validated_score()
            .withf(|_, score| *score == 500)
            .times(1)
            .returning(|_, _| Ok(()));
        let fixture = setup_with(InMemorySessionRepository::new(), progress, quiet_activity());
        let id = aged_session(&fixture, "user-1").await;

        let response = fixture
            .service
            .validate_session("user-1", &request(&id, honest_answers(10, 5), 9_999))
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.validated_score, Some(500));
        let warnings = response.warnings.unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            warnings[0],
            Violation::ScoreExceedsMax {
                claimed: 9_999,
                max_possible: 500
            }
        ));
    }

    #[tokio::test]
    async fn test_each_fast_answer_is_its_own_violation() {
        let fixture = setup();
        let id = aged_session(&fixture, "user-1").await;

        let mut answers = honest_answers(10, 10);
        answers[2].time_to_answer_ms = Some(120);
        answers[7].time_to_answer_ms = Some(300);
        // Unmeasured times are exempt from the floor.
        answers[5].time_to_answer_ms = None;

        let response = fixture
            .service
            .validate_session("user-1", &request(&id, answers, 900))
            .await
            .unwrap();

        assert!(response.success);
        let warnings = response.warnings.unwrap();
        assert_eq!(warnings.len(), 2);
        assert!(warnings
            .iter()
            .all(|v| matches!(v, Violation::FastAnswer { .. })));
    }

    #[tokio::test]
    async fn test_three_violations_flag_and_withhold_credit() {
        let mut progress = MockProgressRepository::new();
        progress.expect_apply_validated_score().times(0);
        progress.expect_flag_for_review().returning(|_| Ok(()));

        let mut activity = MockActivityRepository::new();
        activity
            .expect_log_activity()
            .withf(|entry| entry.kind == ActivityKind::MultipleViolations)
            .times(1)
            .returning(|_| Ok(()));
        activity
            .expect_count_recent_for_user()
            .returning(|_, _| Ok(1));

        let fixture = setup_with(InMemorySessionRepository::new(), progress, activity);

        // Fresh session: whole-game duration check fails, plus two fast
        // answers and an inflated score.
        let session = fixture
            .service
            .start_session("user-1", None)
            .await
            .unwrap();
        let mut answers = honest_answers(10, 5);
        answers[0].time_to_answer_ms = Some(100);
        answers[1].time_to_answer_ms = Some(100);

        let response = fixture
            .service
            .validate_session("user-1", &request(&session.session_id, answers, 9_999))
            .await
            .unwrap();

        assert!(!response.success);
        assert_eq!(response.flagged, Some(true));
        assert!(response.validated_score.is_none());
        assert!(response.message.is_some());

        let stored = fixture.sessions.stored(&session.session_id).unwrap();
        assert!(stored.validated);
        assert!(stored.flagged);
        assert!(stored.validated_score.is_none());
        assert_eq!(stored.claimed_score, Some(9_999));
        assert!(stored.violations.unwrap().len() >= 3);
    }

    #[tokio::test]
    async fn test_all_fast_answers_flag_on_their_own() {
        let mut progress = MockProgressRepository::new();
        progress.expect_apply_validated_score().times(0);
        progress.expect_flag_for_review().returning(|_| Ok(()));
        let fixture =
            setup_with(InMemorySessionRepository::new(), progress, quiet_activity());
        let id = aged_session(&fixture, "user-1").await;

        // Every answer under the floor: ten violations from timing alone.
        let mut answers = honest_answers(10, 10);
        for answer in &mut answers {
            answer.time_to_answer_ms = Some(100);
        }

        let response = fixture
            .service
            .validate_session("user-1", &request(&id, answers, 1_000))
            .await
            .unwrap();

        assert!(!response.success);
        assert_eq!(response.flagged, Some(true));

        let violations = fixture
            .sessions
            .stored(&id)
            .unwrap()
            .violations
            .unwrap();
        assert_eq!(
            violations
                .iter()
                .filter(|v| matches!(v, Violation::FastAnswer { .. }))
                .count(),
            10
        );
    }

    #[tokio::test]
    async fn test_two_violations_warn_but_credit() {
        let fixture = setup();
        let id = aged_session(&fixture, "user-1").await;

        let mut answers = honest_answers(10, 10);
        answers[0].time_to_answer_ms = Some(100);
        answers[1].time_to_answer_ms = Some(100);

        let response = fixture
            .service
            .validate_session("user-1", &request(&id, answers, 1_000))
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.validated_score, Some(1_000));
        assert_eq!(response.warnings.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_perfect_game_streak_limited() {
        let sessions = InMemorySessionRepository::new().with_recent_perfect_games(4);
        let fixture = setup_with(sessions, passive_progress(), quiet_activity());
        let id = aged_session(&fixture, "user-1").await;

        let response = fixture
            .service
            .validate_session("user-1", &request(&id, honest_answers(10, 10), 1_000))
            .await
            .unwrap();

        // One violation only: a warning, not a flag.
        assert!(response.success);
        let warnings = response.warnings.unwrap();
        assert!(matches!(
            warnings[0],
            Violation::ExcessivePerfectGames { count: 5 }
        ));

        assert!(fixture.sessions.stored(&id).unwrap().perfect_game);
    }

    #[tokio::test]
    async fn test_imperfect_game_skips_streak_check() {
        let sessions = InMemorySessionRepository::new().with_recent_perfect_games(10);
        let fixture = setup_with(sessions, passive_progress(), quiet_activity());
        let id = aged_session(&fixture, "user-1").await;

        let response = fixture
            .service
            .validate_session("user-1", &request(&id, honest_answers(10, 9), 900))
            .await
            .unwrap();

        assert!(response.success);
        assert!(response.warnings.is_none());
        assert!(!fixture.sessions.stored(&id).unwrap().perfect_game);
    }

    #[tokio::test]
    async fn test_progress_defaults_to_zeroed_record() {
        let mut progress = MockProgressRepository::new();
        progress.expect_get_progress().returning(|_| Ok(None));
        let fixture =
            setup_with(InMemorySessionRepository::new(), progress, quiet_activity());

        let stats = fixture.service.progress_for("new-user").await.unwrap();

        assert_eq!(stats.user_id, "new-user");
        assert_eq!(stats.total_score, 0);
        assert_eq!(stats.games_played, 0);
        assert!(!stats.flagged_for_review);
    }

    #[tokio::test]
    async fn test_empty_answer_sheet_is_not_perfect() {
        let fixture = setup();
        let id = aged_session(&fixture, "user-1").await;

        let response = fixture
            .service
            .validate_session("user-1", &request(&id, vec![], 0))
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.validated_score, Some(0));
        assert!(!fixture.sessions.stored(&id).unwrap().perfect_game);
    }
}
