pub mod credit_controller;
pub mod repayment_controller;
