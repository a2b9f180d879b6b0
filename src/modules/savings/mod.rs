// Savings analytics module

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{SavingsAccount, SavingsAnalytics};
pub use repositories::SavingsRepository;
pub use services::SavingsService;
