//! SACCO Admin API Library
//!
//! Admin back-office for a savings-and-credit platform: authentication,
//! user directory, credit-request approval workflow, savings analytics and
//! in-app notifications.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

// Re-export commonly used types
pub use modules::analytics;
pub use modules::auth;
pub use modules::credit;
pub use modules::notifications;
pub use modules::savings;
pub use modules::users;
