// Credit request lifecycle module

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{CreditRequest, CreditStatus, Repayment};
pub use repositories::CreditRepository;
pub use services::CreditService;
