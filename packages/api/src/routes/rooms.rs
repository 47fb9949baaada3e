use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::{error::ApiError, middleware::auth::AuthenticatedUser, state::AppState};
use shared::models::room::requests::{CreateRoomRequest, JoinRoomRequest, SubmitAnswerRequest};
use shared::models::room::responses::{CreateRoomResponse, MatchResultResponse};
use shared::models::room::Room;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/rooms", post(create_room))
        .route("/rooms/{code}", get(get_room))
        .route("/rooms/{code}/join", post(join_room))
        .route("/rooms/{code}/start", post(start_game))
        .route("/rooms/{code}/answers", post(submit_answer))
        .route("/rooms/{code}/heartbeat", post(heartbeat))
        .route("/rooms/{code}/leave", post(leave_room))
        .route("/rooms/{code}/result", get(match_result))
}

async fn create_room(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Json(payload): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<CreateRoomResponse>), ApiError> {
    let room = state
        .room_service
        .create_room(
            &authenticated_user.user_id,
            &payload.display_name,
            payload.questions,
            payload.difficulty,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateRoomResponse {
            room_code: room.room_code,
        }),
    ))
}

async fn get_room(
    State(state): State<AppState>,
    _authenticated_user: AuthenticatedUser,
    Path(code): Path<String>,
) -> Result<Json<Room>, ApiError> {
    let room = state.room_service.get_room(&code).await?;
    Ok(Json(room))
}

async fn join_room(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Path(code): Path<String>,
    Json(payload): Json<JoinRoomRequest>,
) -> Result<Json<Room>, ApiError> {
    let room = state
        .room_service
        .join_room(&code, &authenticated_user.user_id, &payload.display_name)
        .await?;
    Ok(Json(room))
}

async fn start_game(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Path(code): Path<String>,
) -> Result<Json<Room>, ApiError> {
    let room = state
        .room_service
        .start_game(&code, &authenticated_user.user_id)
        .await?;
    Ok(Json(room))
}

async fn submit_answer(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Path(code): Path<String>,
    Json(payload): Json<SubmitAnswerRequest>,
) -> Result<Json<Room>, ApiError> {
    let room = state
        .room_service
        .submit_answer(&code, &authenticated_user.user_id, &payload)
        .await?;
    Ok(Json(room))
}

async fn heartbeat(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Path(code): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .room_service
        .heartbeat(&code, &authenticated_user.user_id)
        .await?;
    Ok(StatusCode::OK)
}

async fn leave_room(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Path(code): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .room_service
        .leave_room(&code, &authenticated_user.user_id)
        .await?;
    Ok(StatusCode::OK)
}

async fn match_result(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Path(code): Path<String>,
) -> Result<Json<MatchResultResponse>, ApiError> {
    let result = state
        .room_service
        .result_for(&code, &authenticated_user.user_id)
        .await?;
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    use crate::app;
    use crate::state::tests::{bearer_for, test_state};
    use crate::state::AppState;

    fn create_room_payload() -> Value {
        json!({
            "display_name": "Amina",
            "difficulty": "medium",
            "questions": [
                {
                    "prompt": "Capital of Ghana?",
                    "options": ["Accra", "Lagos", "Nairobi", "Cairo"],
                    "correct_answer": 0,
                    "category": "geography",
                    "difficulty": "medium"
                },
                {
                    "prompt": "2 + 2?",
                    "options": ["3", "4"],
                    "correct_answer": 1,
                    "category": "math",
                    "difficulty": "medium"
                }
            ]
        })
    }

    async fn send(
        state: &AppState,
        method: &str,
        uri: &str,
        user: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("Authorization", bearer_for(user));
        let body = match body {
            Some(value) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = app(state.clone())
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn created_room(state: &AppState) -> String {
        let (status, body) =
            send(state, "POST", "/rooms", "host-1", Some(create_room_payload())).await;
        assert_eq!(status, StatusCode::CREATED);
        body["room_code"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_create_room_returns_code() {
        let state = test_state();
        let code = created_room(&state).await;
        assert_eq!(code.len(), 6);
    }

    #[tokio::test]
    async fn test_create_room_requires_auth() {
        let state = test_state();
        let response = app(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/rooms")
                    .header("Content-Type", "application/json")
                    .body(Body::from(create_room_payload().to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_join_and_fetch_room() {
        let state = test_state();
        let code = created_room(&state).await;

        let (status, body) = send(
            &state,
            "POST",
            &format!("/rooms/{}/join", code),
            "guest-1",
            Some(json!({ "display_name": "Kofi" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["guest"]["id"], "guest-1");

        let (status, body) =
            send(&state, "GET", &format!("/rooms/{}", code), "guest-1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "waiting");
        assert_eq!(body["host"]["display_name"], "Amina");
    }

    #[tokio::test]
    async fn test_unknown_room_is_not_found() {
        let state = test_state();
        let (status, body) = send(&state, "GET", "/rooms/NOPE42", "guest-1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "room-not-found");
    }

    #[tokio::test]
    async fn test_guest_cannot_start_game() {
        let state = test_state();
        let code = created_room(&state).await;
        send(
            &state,
            "POST",
            &format!("/rooms/{}/join", code),
            "guest-1",
            Some(json!({ "display_name": "Kofi" })),
        )
        .await;

        let (status, body) = send(
            &state,
            "POST",
            &format!("/rooms/{}/start", code),
            "guest-1",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "not-host");
    }

    #[tokio::test]
    async fn test_host_start_enters_countdown() {
        let state = test_state();
        let code = created_room(&state).await;
        send(
            &state,
            "POST",
            &format!("/rooms/{}/join", code),
            "guest-1",
            Some(json!({ "display_name": "Kofi" })),
        )
        .await;

        let (status, body) = send(
            &state,
            "POST",
            &format!("/rooms/{}/start", code),
            "host-1",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "countdown");
        assert!(body["game_start_time"].is_string());
    }

    #[tokio::test]
    async fn test_answer_before_start_conflicts() {
        let state = test_state();
        let code = created_room(&state).await;

        let (status, body) = send(
            &state,
            "POST",
            &format!("/rooms/{}/answers", code),
            "host-1",
            Some(json!({
                "question_index": 0,
                "answer_index": 0,
                "time_to_answer_ms": 4000
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "not-playing");
    }

    #[tokio::test]
    async fn test_heartbeat_and_leave() {
        let state = test_state();
        let code = created_room(&state).await;
        send(
            &state,
            "POST",
            &format!("/rooms/{}/join", code),
            "guest-1",
            Some(json!({ "display_name": "Kofi" })),
        )
        .await;

        let (status, _) = send(
            &state,
            "POST",
            &format!("/rooms/{}/heartbeat", code),
            "guest-1",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(
            &state,
            "POST",
            &format!("/rooms/{}/leave", code),
            "host-1",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        // Host leaving deletes the room.
        let (status, _) = send(&state, "GET", &format!("/rooms/{}", code), "guest-1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_result_before_finish_conflicts() {
        let state = test_state();
        let code = created_room(&state).await;

        let (status, body) = send(
            &state,
            "GET",
            &format!("/rooms/{}/result", code),
            "host-1",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "not-finished");
    }
}
