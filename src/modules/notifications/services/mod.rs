pub mod notification_service;
pub mod outbox_worker;

pub use notification_service::NotificationService;
pub use outbox_worker::{InAppSender, NotificationSender, OutboxWorker};
