use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// A member's savings account
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsAccount {
    pub id: String,
    pub user_id: String,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Platform-wide savings aggregates for the admin dashboard
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SavingsAnalytics {
    pub total_balance: Decimal,
    pub total_accounts: i64,
    pub deposits_count: i64,
    pub withdrawals_count: i64,
}
