use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::modules::credit::models::{CreditRequestResponse, CreditStatusCounts, Repayment};
use crate::modules::savings::models::SavingsAccount;

use super::user::UserProfile;

/// A member's credit request with its repayment history
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditRequestWithRepayments {
    #[serde(flatten)]
    pub request: CreditRequestResponse,
    pub repayments: Vec<Repayment>,
}

/// Admin detail view of a user: profile plus savings, credit history and
/// session activity.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetailResponse {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub savings_account: Option<SavingsAccount>,
    pub credit_requests: Vec<CreditRequestWithRepayments>,
    pub credit_summary: CreditStatusCounts,
    pub active_sessions: i64,
    pub last_login: Option<DateTime<Utc>>,
}
