//! Background delivery loop for the notification outbox.
//!
//! Business transitions only enqueue intents; this worker owns delivery,
//! retries and failure accounting. Nothing here ever propagates back to a
//! request handler.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::OutboxConfig;
use crate::core::Result;
use crate::modules::notifications::models::Notification;
use crate::modules::notifications::repositories::NotificationRepository;

/// Delivery channel for a single notification
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn deliver(&self, notification: &Notification) -> Result<()>;
}

/// In-app delivery: the outbox row itself is what the dashboard reads, so
/// delivery amounts to acknowledging the row.
pub struct InAppSender;

#[async_trait]
impl NotificationSender for InAppSender {
    async fn deliver(&self, notification: &Notification) -> Result<()> {
        tracing::debug!(
            notification_id = %notification.id,
            user_id = %notification.user_id,
            "in-app notification visible"
        );
        Ok(())
    }
}

pub struct OutboxWorker {
    repo: Arc<dyn NotificationRepository>,
    sender: Arc<dyn NotificationSender>,
    config: OutboxConfig,
}

impl OutboxWorker {
    pub fn new(
        repo: Arc<dyn NotificationRepository>,
        sender: Arc<dyn NotificationSender>,
        config: OutboxConfig,
    ) -> Self {
        Self {
            repo,
            sender,
            config,
        }
    }

    /// Poll the outbox until the process shuts down
    pub async fn run(self) {
        let mut interval =
            tokio::time::interval(Duration::from_secs(self.config.poll_interval_seconds));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        tracing::info!(
            poll_interval_seconds = self.config.poll_interval_seconds,
            batch_size = self.config.batch_size,
            "notification outbox worker started"
        );

        loop {
            interval.tick().await;
            if let Err(e) = self.tick().await {
                tracing::error!(error = %e, "outbox tick failed");
            }
        }
    }

    /// Deliver one batch of pending notifications.
    ///
    /// Returns the number successfully delivered.
    pub async fn tick(&self) -> Result<usize> {
        let pending = self.repo.claim_pending(self.config.batch_size).await?;
        let mut delivered = 0;

        for notification in pending {
            self.repo.record_attempt(&notification.id).await?;

            match self.sender.deliver(&notification).await {
                Ok(()) => {
                    self.repo.mark_sent(&notification.id).await?;
                    delivered += 1;
                }
                Err(e) => {
                    let attempts = notification.attempts + 1;
                    tracing::warn!(
                        notification_id = %notification.id,
                        attempts,
                        error = %e,
                        "notification delivery failed"
                    );
                    if attempts >= self.config.max_attempts {
                        self.repo.mark_failed(&notification.id).await?;
                    }
                }
            }
        }

        Ok(delivered)
    }
}
