use std::sync::Arc;

use crate::core::Result;
use crate::modules::notifications::models::NotificationResponse;
use crate::modules::notifications::repositories::NotificationRepository;

/// Read side of the notification feed
pub struct NotificationService {
    repo: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    pub fn new(repo: Arc<dyn NotificationRepository>) -> Self {
        Self { repo }
    }

    pub async fn list_for_user(
        &self,
        user_id: &str,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<NotificationResponse>, i64)> {
        let offset = crate::core::response::page_offset(page, limit);
        let rows = self.repo.list_for_user(user_id, limit, offset).await?;
        let total = self.repo.count_for_user(user_id).await?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }
}
