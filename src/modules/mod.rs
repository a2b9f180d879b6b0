pub mod analytics;
pub mod auth;
pub mod credit;
pub mod notifications;
pub mod savings;
pub mod users;
