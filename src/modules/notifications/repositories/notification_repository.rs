use async_trait::async_trait;
use chrono::Utc;
use sqlx::MySqlPool;
use uuid::Uuid;

use crate::core::Result;
use crate::modules::notifications::models::{Notification, NotificationIntent};

/// Outbox storage operations
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Insert a pending row for later delivery
    async fn enqueue(&self, intent: &NotificationIntent) -> Result<Notification>;

    /// Fetch the oldest pending rows, up to `batch`
    async fn claim_pending(&self, batch: i64) -> Result<Vec<Notification>>;

    async fn record_attempt(&self, id: &str) -> Result<()>;

    async fn mark_sent(&self, id: &str) -> Result<()>;

    async fn mark_failed(&self, id: &str) -> Result<()>;

    async fn list_for_user(
        &self,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>>;

    async fn count_for_user(&self, user_id: &str) -> Result<i64>;
}

/// MySQL-backed outbox
pub struct MySqlNotificationRepository {
    pool: MySqlPool,
}

impl MySqlNotificationRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for MySqlNotificationRepository {
    async fn enqueue(&self, intent: &NotificationIntent) -> Result<Notification> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO notifications (id, user_id, kind, title, body, status, attempts, created_at)
            VALUES (?, ?, ?, ?, ?, 'pending', 0, ?)
            "#,
        )
        .bind(&id)
        .bind(&intent.user_id)
        .bind(&intent.kind)
        .bind(&intent.title)
        .bind(&intent.body)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let row = sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, user_id, kind, title, body, status, attempts, created_at, sent_at, read_at
            FROM notifications
            WHERE id = ?
            "#,
        )
        .bind(&id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn claim_pending(&self, batch: i64) -> Result<Vec<Notification>> {
        let rows = sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, user_id, kind, title, body, status, attempts, created_at, sent_at, read_at
            FROM notifications
            WHERE status = 'pending'
            ORDER BY created_at ASC
            LIMIT ?
            "#,
        )
        .bind(batch)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn record_attempt(&self, id: &str) -> Result<()> {
        sqlx::query("UPDATE notifications SET attempts = attempts + 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn mark_sent(&self, id: &str) -> Result<()> {
        sqlx::query("UPDATE notifications SET status = 'sent', sent_at = NOW() WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn mark_failed(&self, id: &str) -> Result<()> {
        sqlx::query("UPDATE notifications SET status = 'failed' WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>> {
        let rows = sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, user_id, kind, title, body, status, attempts, created_at, sent_at, read_at
            FROM notifications
            WHERE user_id = ? AND status <> 'failed'
            ORDER BY created_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn count_for_user(&self, user_id: &str) -> Result<i64> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM notifications WHERE user_id = ? AND status <> 'failed'",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }
}
