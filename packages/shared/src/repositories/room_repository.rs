use crate::models::room::Room;
use crate::repositories::errors::room_repository_errors::RoomRepositoryError;
use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;

#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Creates the room document, failing with `CodeInUse` when a room
    /// with the same code already exists.
    async fn create_room(&self, room: &Room) -> Result<(), RoomRepositoryError>;

    async fn get_room(&self, room_code: &str) -> Result<Option<Room>, RoomRepositoryError>;

    async fn update_room(&self, room: &Room) -> Result<(), RoomRepositoryError>;

    async fn delete_room(&self, room_code: &str) -> Result<(), RoomRepositoryError>;
}

pub struct DynamoDbRoomRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbRoomRepository {
    pub fn new(client: Client) -> Self {
        let table_name = std::env::var("ROOMS_TABLE")
            .expect("ROOMS_TABLE environment variable must be set");
        Self { client, table_name }
    }
}

#[async_trait]
impl RoomRepository for DynamoDbRoomRepository {
    async fn create_room(&self, room: &Room) -> Result<(), RoomRepositoryError> {
        let item = serde_dynamo::to_item(room)
            .map_err(|e| RoomRepositoryError::Serialization(e.to_string()))?;

        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(room_code)")
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("ConditionalCheckFailedException") {
                    Err(RoomRepositoryError::CodeInUse)
                } else {
                    Err(RoomRepositoryError::DynamoDb(error_str))
                }
            }
        }
    }

    async fn get_room(&self, room_code: &str) -> Result<Option<Room>, RoomRepositoryError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("room_code", AttributeValue::S(room_code.to_string()))
            .send()
            .await
            .map_err(|e| RoomRepositoryError::DynamoDb(e.to_string()))?;

        if let Some(item) = output.item {
            let room: Room = serde_dynamo::from_item(item)
                .map_err(|e| RoomRepositoryError::Serialization(e.to_string()))?;
            Ok(Some(room))
        } else {
            Ok(None)
        }
    }

    async fn update_room(&self, room: &Room) -> Result<(), RoomRepositoryError> {
        let item = serde_dynamo::to_item(room)
            .map_err(|e| RoomRepositoryError::Serialization(e.to_string()))?;

        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_exists(room_code)")
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("ConditionalCheckFailedException") {
                    Err(RoomRepositoryError::NotFound)
                } else {
                    Err(RoomRepositoryError::DynamoDb(error_str))
                }
            }
        }
    }

    async fn delete_room(&self, room_code: &str) -> Result<(), RoomRepositoryError> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key("room_code", AttributeValue::S(room_code.to_string()))
            .send()
            .await
            .map_err(|e| RoomRepositoryError::DynamoDb(e.to_string()))?;
        Ok(())
    }
}
