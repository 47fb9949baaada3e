use axum::{routing::get, Router};
use lambda_http::{run, tracing, Error};
use std::env::set_var;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use shared::repositories::activity_repository::DynamoDbActivityRepository;
use shared::repositories::progress_repository::DynamoDbProgressRepository;
use shared::repositories::room_repository::DynamoDbRoomRepository;
use shared::repositories::session_repository::DynamoDbSessionRepository;
use shared::services::activity_service::ActivityService;
use shared::services::auth_service::AuthService;
use shared::services::room_service::RoomService;
use shared::services::session_service::SessionService;

pub fn app(app_state: state::AppState) -> Router {
    // ToDo: Tighten this up
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .merge(routes::rooms::routes())
        .merge(routes::sessions::routes())
        .layer(cors)
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    set_var("AWS_LAMBDA_HTTP_IGNORE_STAGE_IN_PATH", "true");

    // required to enable CloudWatch error logging by the runtime
    tracing::init_default_subscriber();

    let config = aws_config::load_from_env().await;
    let client = aws_sdk_dynamodb::Client::new(&config);

    let room_repository = Arc::new(DynamoDbRoomRepository::new(client.clone()));
    let session_repository = Arc::new(DynamoDbSessionRepository::new(client.clone()));
    let progress_repository = Arc::new(DynamoDbProgressRepository::new(client.clone()));
    let activity_repository = Arc::new(DynamoDbActivityRepository::new(client.clone()));

    let activity_service =
        ActivityService::new(activity_repository, progress_repository.clone());

    let app_state = state::AppState {
        auth_service: Arc::new(AuthService::new()),
        room_service: Arc::new(RoomService::new(room_repository)),
        session_service: Arc::new(SessionService::new(
            session_repository,
            progress_repository,
            activity_service,
        )),
    };

    run(app(app_state)).await
}
