pub mod savings_repository;

pub use savings_repository::{MySqlSavingsRepository, SavingsRepository};
