use chrono::{DateTime, Utc};

use crate::models::session::GameSession;
use crate::repositories::errors::session_repository_errors::SessionRepositoryError;
use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde_dynamo::to_attribute_value;

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create_session(&self, session: &GameSession) -> Result<(), SessionRepositoryError>;

    async fn get_session(
        &self,
        session_id: &str,
    ) -> Result<Option<GameSession>, SessionRepositoryError>;

    /// Writes the validated session back. Guarded so a session can be
    /// finalized exactly once.
    async fn finalize_session(&self, session: &GameSession)
        -> Result<(), SessionRepositoryError>;

    /// Number of the user's perfect-game sessions started after `since`.
    async fn count_recent_perfect_games(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<usize, SessionRepositoryError>;
}

pub struct DynamoDbSessionRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbSessionRepository {
    pub fn new(client: Client) -> Self {
        let table_name = std::env::var("SESSIONS_TABLE")
            .expect("SESSIONS_TABLE environment variable must be set");
        Self { client, table_name }
    }
}

#[async_trait]
impl SessionRepository for DynamoDbSessionRepository {
    async fn create_session(&self, session: &GameSession) -> Result<(), SessionRepositoryError> {
        let item = serde_dynamo::to_item(session)
            .map_err(|e| SessionRepositoryError::Serialization(e.to_string()))?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| SessionRepositoryError::DynamoDb(e.to_string()))?;

        Ok(())
    }

    async fn get_session(
        &self,
        session_id: &str,
    ) -> Result<Option<GameSession>, SessionRepositoryError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("session_id", AttributeValue::S(session_id.to_string()))
            .send()
            .await
            .map_err(|e| SessionRepositoryError::DynamoDb(e.to_string()))?;

        if let Some(item) = output.item {
            let session: GameSession = serde_dynamo::from_item(item)
                .map_err(|e| SessionRepositoryError::Serialization(e.to_string()))?;
            Ok(Some(session))
        } else {
            Ok(None)
        }
    }

    async fn finalize_session(
        &self,
        session: &GameSession,
    ) -> Result<(), SessionRepositoryError> {
        let item = serde_dynamo::to_item(session)
            .map_err(|e| SessionRepositoryError::Serialization(e.to_string()))?;

        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_exists(session_id) AND validated = :not_validated")
            .expression_attribute_values(":not_validated", AttributeValue::Bool(false))
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("ConditionalCheckFailedException") {
                    Err(SessionRepositoryError::AlreadyFinalized)
                } else {
                    Err(SessionRepositoryError::DynamoDb(error_str))
                }
            }
        }
    }

    async fn count_recent_perfect_games(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<usize, SessionRepositoryError> {
        // RFC 3339 timestamps compare correctly as strings, so a plain
        // string filter over the user GSI is enough here.
        let output = self
            .client
            .query()
            .table_name(&self.table_name)
            .index_name("GSI_SessionsByUser")
            .key_condition_expression("user_id = :user_id")
            .filter_expression("perfect_game = :perfect AND started_at > :since")
            .expression_attribute_values(":user_id", AttributeValue::S(user_id.to_string()))
            .expression_attribute_values(":perfect", AttributeValue::Bool(true))
            .expression_attribute_values(
                ":since",
                to_attribute_value(since)
                    .map_err(|e| SessionRepositoryError::Serialization(e.to_string()))?,
            )
            .send()
            .await
            .map_err(|e| SessionRepositoryError::DynamoDb(e.to_string()))?;

        Ok(output.items().len())
    }
}
