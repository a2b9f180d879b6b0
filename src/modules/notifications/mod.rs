// Notification outbox module

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Notification, NotificationIntent, NotificationStatus};
pub use repositories::NotificationRepository;
pub use services::{NotificationService, OutboxWorker};
