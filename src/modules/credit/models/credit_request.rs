use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::modules::users::models::UserSummary;

use super::repayment::Repayment;

/// Credit request lifecycle.
///
/// A request leaves `pending` exactly once, to `approved` or `rejected`.
/// `disbursed` and `repaid` are reached by processes outside this service;
/// the admin API only ever observes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(20)", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CreditStatus {
    Pending,
    Approved,
    Rejected,
    Disbursed,
    Repaid,
}

impl std::fmt::Display for CreditStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreditStatus::Pending => write!(f, "pending"),
            CreditStatus::Approved => write!(f, "approved"),
            CreditStatus::Rejected => write!(f, "rejected"),
            CreditStatus::Disbursed => write!(f, "disbursed"),
            CreditStatus::Repaid => write!(f, "repaid"),
        }
    }
}

impl std::str::FromStr for CreditStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(CreditStatus::Pending),
            "approved" => Ok(CreditStatus::Approved),
            "rejected" => Ok(CreditStatus::Rejected),
            "disbursed" => Ok(CreditStatus::Disbursed),
            "repaid" => Ok(CreditStatus::Repaid),
            other => Err(format!("Unknown credit status: {other}")),
        }
    }
}

/// A loan application owned by a member
#[derive(Debug, Clone, FromRow)]
pub struct CreditRequest {
    pub id: String,
    pub user_id: String,
    pub amount: Decimal,
    /// Percent, e.g. 10.00 for 10%
    pub interest_rate: Decimal,
    pub duration_months: i32,
    pub purpose: String,
    pub status: CreditStatus,
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CreditRequest {
    /// Principal plus interest: `amount × (1 + interest_rate/100)`
    pub fn total_owed(&self) -> Decimal {
        total_owed(self.amount, self.interest_rate)
    }
}

/// Principal plus interest for a given rate in percent
pub fn total_owed(principal: Decimal, interest_rate: Decimal) -> Decimal {
    principal * (Decimal::ONE + interest_rate / Decimal::ONE_HUNDRED)
}

/// What is still owed after the recorded repayments
pub fn remaining_balance(principal: Decimal, interest_rate: Decimal, repaid: Decimal) -> Decimal {
    total_owed(principal, interest_rate) - repaid
}

/// API view of a credit request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditRequestResponse {
    pub id: String,
    pub user_id: String,
    pub amount: Decimal,
    pub interest_rate: Decimal,
    pub duration_months: i32,
    pub purpose: String,
    pub status: CreditStatus,
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<CreditRequest> for CreditRequestResponse {
    fn from(r: CreditRequest) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            amount: r.amount,
            interest_rate: r.interest_rate,
            duration_months: r.duration_months,
            purpose: r.purpose,
            status: r.status,
            approved_by: r.approved_by,
            approved_at: r.approved_at,
            rejection_reason: r.rejection_reason,
            created_at: r.created_at,
        }
    }
}

/// Detail view joining the owning user and all repayments
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditRequestDetail {
    #[serde(flatten)]
    pub request: CreditRequestResponse,
    pub user: UserSummary,
    pub repayments: Vec<Repayment>,
    pub total_owed: Decimal,
    pub remaining_balance: Decimal,
}

/// Per-status request counts for a single member
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct CreditStatusCounts {
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
    pub disbursed: i64,
    pub repaid: i64,
}

#[derive(Debug, Deserialize)]
pub struct RejectRequestBody {
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct RepaymentBody {
    pub amount: Decimal,
}
