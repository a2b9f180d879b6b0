// User directory module

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{User, UserProfile, UserRole, UserStatus};
pub use repositories::UserRepository;
pub use services::UserService;
