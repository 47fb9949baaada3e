use crate::models::progress::UserProgress;
use crate::repositories::errors::progress_repository_errors::ProgressRepositoryError;
use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde_dynamo::to_attribute_value;

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    async fn get_progress(
        &self,
        user_id: &str,
    ) -> Result<Option<UserProgress>, ProgressRepositoryError>;

    /// Credits a validated score to the user's running totals. Uses atomic
    /// increments so simultaneous writers of the same progress document
    /// cannot lose updates.
    async fn apply_validated_score(
        &self,
        user_id: &str,
        score: u32,
    ) -> Result<(), ProgressRepositoryError>;

    /// Marks the account for manual review. Not a ban.
    async fn flag_for_review(&self, user_id: &str) -> Result<(), ProgressRepositoryError>;
}

pub struct DynamoDbProgressRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbProgressRepository {
    pub fn new(client: Client) -> Self {
        let table_name = std::env::var("PROGRESS_TABLE")
            .expect("PROGRESS_TABLE environment variable must be set");
        Self { client, table_name }
    }
}

#[async_trait]
impl ProgressRepository for DynamoDbProgressRepository {
    async fn get_progress(
        &self,
        user_id: &str,
    ) -> Result<Option<UserProgress>, ProgressRepositoryError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("user_id", AttributeValue::S(user_id.to_string()))
            .send()
            .await
            .map_err(|e| ProgressRepositoryError::DynamoDb(e.to_string()))?;

        if let Some(item) = output.item {
            let progress: UserProgress = serde_dynamo::from_item(item)
                .map_err(|e| ProgressRepositoryError::Serialization(e.to_string()))?;
            Ok(Some(progress))
        } else {
            Ok(None)
        }
    }

    async fn apply_validated_score(
        &self,
        user_id: &str,
        score: u32,
    ) -> Result<(), ProgressRepositoryError> {
        self.client
            .update_item()
            .table_name(&self.table_name)
            .key("user_id", AttributeValue::S(user_id.to_string()))
            .update_expression(
                "SET last_validated_score = :score, last_game_at = :now \
                 ADD total_score :score_inc, games_played :one",
            )
            .expression_attribute_values(":score", AttributeValue::N(score.to_string()))
            .expression_attribute_values(":score_inc", AttributeValue::N(score.to_string()))
            .expression_attribute_values(":one", AttributeValue::N("1".to_string()))
            .expression_attribute_values(
                ":now",
                to_attribute_value(chrono::Utc::now())
                    .map_err(|e| ProgressRepositoryError::Serialization(e.to_string()))?,
            )
            .send()
            .await
            .map_err(|e| ProgressRepositoryError::DynamoDb(e.to_string()))?;

        Ok(())
    }

    async fn flag_for_review(&self, user_id: &str) -> Result<(), ProgressRepositoryError> {
        self.client
            .update_item()
            .table_name(&self.table_name)
            .key("user_id", AttributeValue::S(user_id.to_string()))
            .update_expression("SET flagged_for_review = :flag, flagged_at = :now")
            .expression_attribute_values(":flag", AttributeValue::Bool(true))
            .expression_attribute_values(
                ":now",
                to_attribute_value(chrono::Utc::now())
                    .map_err(|e| ProgressRepositoryError::Serialization(e.to_string()))?,
            )
            .send()
            .await
            .map_err(|e| ProgressRepositoryError::DynamoDb(e.to_string()))?;

        Ok(())
    }
}
