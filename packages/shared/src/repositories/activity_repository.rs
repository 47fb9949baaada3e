use chrono::{DateTime, Utc};

use crate::models::activity::SuspiciousActivity;
use crate::repositories::errors::activity_repository_errors::ActivityRepositoryError;
use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde_dynamo::to_attribute_value;

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    async fn log_activity(
        &self,
        activity: &SuspiciousActivity,
    ) -> Result<(), ActivityRepositoryError>;

    /// Number of audit entries for the user created after `since`.
    async fn count_recent_for_user(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<usize, ActivityRepositoryError>;
}

pub struct DynamoDbActivityRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbActivityRepository {
    pub fn new(client: Client) -> Self {
        let table_name = std::env::var("SUSPICIOUS_ACTIVITY_TABLE")
            .expect("SUSPICIOUS_ACTIVITY_TABLE environment variable must be set");
        Self { client, table_name }
    }
}

#[async_trait]
impl ActivityRepository for DynamoDbActivityRepository {
    async fn log_activity(
        &self,
        activity: &SuspiciousActivity,
    ) -> Result<(), ActivityRepositoryError> {
        let item = serde_dynamo::to_item(activity)
            .map_err(|e| ActivityRepositoryError::Serialization(e.to_string()))?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| ActivityRepositoryError::DynamoDb(e.to_string()))?;

        Ok(())
    }

    async fn count_recent_for_user(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<usize, ActivityRepositoryError> {
        let output = self
            .client
            .query()
            .table_name(&self.table_name)
            .index_name("GSI_ActivityByUser")
            .key_condition_expression("user_id = :user_id AND created_at > :since")
            .expression_attribute_values(":user_id", AttributeValue::S(user_id.to_string()))
            .expression_attribute_values(
                ":since",
                to_attribute_value(since)
                    .map_err(|e| ActivityRepositoryError::Serialization(e.to_string()))?,
            )
            .send()
            .await
            .map_err(|e| ActivityRepositoryError::DynamoDb(e.to_string()))?;

        Ok(output.items().len())
    }
}
