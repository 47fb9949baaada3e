use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::warn;

use crate::models::activity::{ActivityKind, SuspiciousActivity};
use crate::repositories::activity_repository::ActivityRepository;
use crate::repositories::progress_repository::ProgressRepository;
use crate::services::errors::activity_service_errors::ActivityServiceError;

/// Audit entries within the review window that trigger an account flag.
pub const REVIEW_THRESHOLD: usize = 10;

const REVIEW_WINDOW_HOURS: i64 = 24;

/// Writes suspicious-activity audit entries and escalates accounts that
/// accumulate too many of them. Escalation flags the account for manual
/// review; it never blocks the request that tripped it.
#[derive(Clone)]
pub struct ActivityService {
    activity_repository: Arc<dyn ActivityRepository + Send + Sync>,
    progress_repository: Arc<dyn ProgressRepository + Send + Sync>,
}

impl ActivityService {
    pub fn new(
        activity_repository: Arc<dyn ActivityRepository + Send + Sync>,
        progress_repository: Arc<dyn ProgressRepository + Send + Sync>,
    ) -> Self {
        ActivityService {
            activity_repository,
            progress_repository,
        }
    }

    /// Appends one audit entry and returns how many entries the user has
    /// accumulated in the current window, this one included.
    pub async fn record(
        &self,
        user_id: &str,
        kind: ActivityKind,
        details: serde_json::Value,
    ) -> Result<usize, ActivityServiceError> {
        let entry = SuspiciousActivity::new(user_id, kind, details);
        self.activity_repository.log_activity(&entry).await?;

        let since = Utc::now() - Duration::hours(REVIEW_WINDOW_HOURS);
        let recent = self
            .activity_repository
            .count_recent_for_user(user_id, since)
            .await?;

        if recent >= REVIEW_THRESHOLD {
            warn!(
                "User {} has {} suspicious entries in {}h, flagging for review",
                user_id, recent, REVIEW_WINDOW_HOURS
            );
            self.progress_repository.flag_for_review(user_id).await?;
        }

        Ok(recent)
    }
}
