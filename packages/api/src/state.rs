use std::sync::Arc;

use shared::services::auth_service::AuthServiceTrait;
use shared::services::room_service::RoomService;
use shared::services::session_service::SessionService;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServiceTrait>,
    pub room_service: Arc<RoomService>,
    pub session_service: Arc<SessionService>,
}
