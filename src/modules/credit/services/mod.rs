pub mod credit_service;
pub mod reference;

pub use credit_service::CreditService;
