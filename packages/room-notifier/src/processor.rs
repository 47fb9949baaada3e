use std::sync::Arc;

use aws_lambda_events::event::dynamodb::Event;
use lambda_runtime::Error;
use serde::Serialize;
use serde_dynamo::aws_sdk_dynamodb_1::from_item;
use shared::models::room::Room;
use shared::repositories::connection_repository::ConnectionRepository;
use tracing::{error, info, warn};

/// Message pushed to each participant's WebSocket when their room's
/// document changes.
#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum RoomMessage<'a> {
    RoomUpdated { room: &'a Room },
    RoomClosed { room_code: &'a str },
}

/// Fans room document changes out to the connected participants. Delivery
/// is best effort: a participant without a live connection is skipped and
/// a stale connection is pruned, never retried.
#[derive(Clone)]
pub struct RoomNotifier {
    connections: Arc<dyn ConnectionRepository>,
}

impl RoomNotifier {
    pub fn new(connections: Arc<dyn ConnectionRepository>) -> Self {
        Self { connections }
    }

    pub async fn process_event(&self, event: Event) -> Result<(), Error> {
        info!("Processing {} records", event.records.len());

        for record in event.records {
            let event_name = record.event_name.as_str();

            match event_name {
                "INSERT" | "MODIFY" => {
                    let room: Room = from_item(record.change.new_image.into())?;
                    self.notify_room_updated(&room).await;
                }
                "REMOVE" => {
                    let room: Room = from_item(record.change.old_image.into())?;
                    self.notify_room_closed(&room).await;
                }
                _ => {
                    warn!("Unhandled event type: {}", event_name);
                }
            }
        }

        Ok(())
    }

    pub async fn notify_room_updated(&self, room: &Room) {
        let message = match serde_json::to_string(&RoomMessage::RoomUpdated { room }) {
            Ok(message) => message,
            Err(e) => {
                error!("Failed to serialize room {}: {}", room.room_code, e);
                return;
            }
        };

        for player_id in Self::participants(room) {
            self.push(&player_id, &message).await;
        }
    }

    pub async fn notify_room_closed(&self, room: &Room) {
        let message = match serde_json::to_string(&RoomMessage::RoomClosed {
            room_code: &room.room_code,
        }) {
            Ok(message) => message,
            Err(e) => {
                error!("Failed to serialize close event for {}: {}", room.room_code, e);
                return;
            }
        };

        for player_id in Self::participants(room) {
            self.push(&player_id, &message).await;
        }
    }

    fn participants(room: &Room) -> Vec<String> {
        let mut ids = vec![room.host.id.clone()];
        if let Some(guest) = &room.guest {
            ids.push(guest.id.clone());
        }
        ids
    }

    async fn push(&self, player_id: &str, message: &str) {
        let connection_id = match self.connections.get_connection_id(player_id).await {
            Ok(Some(connection_id)) => connection_id,
            Ok(None) => {
                info!("Player {} has no live connection, skipping", player_id);
                return;
            }
            Err(e) => {
                error!("Failed to resolve connection for {}: {}", player_id, e);
                return;
            }
        };

        if let Err(e) = self.connections.send_message(&connection_id, message).await {
            error!("Failed to push to {} ({}): {}", player_id, connection_id, e);
            // The gateway reports gone connections as send failures.
            if let Err(e) = self.connections.remove_connection(player_id).await {
                error!("Failed to prune connection for {}: {}", player_id, e);
            }
        }
    }
}
