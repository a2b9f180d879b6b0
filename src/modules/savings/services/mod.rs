pub mod savings_service;

pub use savings_service::SavingsService;
