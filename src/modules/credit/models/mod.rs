pub mod credit_request;
pub mod repayment;

pub use credit_request::{
    remaining_balance, total_owed, CreditRequest, CreditRequestDetail, CreditRequestResponse,
    CreditStatus, CreditStatusCounts, RejectRequestBody, RepaymentBody,
};
pub use repayment::{NewRepayment, Repayment};
