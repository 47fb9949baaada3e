use async_trait::async_trait;
use aws_sdk_apigatewaymanagement::{primitives::Blob, Client as ApiGatewayClient};
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use std::env;
use tracing::info;

/// Registry of players' WebSocket connections, used to push room snapshots.
/// Registration happens in the gateway's connect hook; this side only
/// resolves, sends and prunes.
#[async_trait]
pub trait ConnectionRepository: Send + Sync {
    async fn get_connection_id(
        &self,
        player_id: &str,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>>;

    async fn send_message(
        &self,
        connection_id: &str,
        message: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn remove_connection(
        &self,
        player_id: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

pub struct DynamoDbConnectionRepository {
    dynamodb_client: DynamoDbClient,
    api_gateway_client: ApiGatewayClient,
    table_name: String,
}

impl DynamoDbConnectionRepository {
    pub fn new(dynamodb_client: DynamoDbClient, api_gateway_client: ApiGatewayClient) -> Self {
        let table_name = env::var("PLAYER_CONNECTIONS_TABLE")
            .expect("PLAYER_CONNECTIONS_TABLE environment variable must be set");

        Self {
            dynamodb_client,
            api_gateway_client,
            table_name,
        }
    }
}

#[async_trait]
impl ConnectionRepository for DynamoDbConnectionRepository {
    async fn get_connection_id(
        &self,
        player_id: &str,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        let output = self
            .dynamodb_client
            .get_item()
            .table_name(&self.table_name)
            .key("player_id", AttributeValue::S(player_id.to_string()))
            .send()
            .await?;

        let connection_id = output.item.and_then(|item| {
            item.get("connection_id").and_then(|attr| match attr {
                AttributeValue::S(id) => Some(id.clone()),
                _ => None,
            })
        });

        Ok(connection_id)
    }

    async fn send_message(
        &self,
        connection_id: &str,
        message: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.api_gateway_client
            .post_to_connection()
            .connection_id(connection_id)
            .data(Blob::new(message.as_bytes()))
            .send()
            .await?;

        Ok(())
    }

    async fn remove_connection(
        &self,
        player_id: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.dynamodb_client
            .delete_item()
            .table_name(&self.table_name)
            .key("player_id", AttributeValue::S(player_id.to_string()))
            .send()
            .await?;

        info!("Removed WebSocket connection for player: {}", player_id);
        Ok(())
    }
}
