// Admin session module

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::Claims;
pub use repositories::TokenRepository;
pub use services::AuthService;
