use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// A single payment against an approved credit request.
///
/// Rows are append-only; nothing updates or deletes a repayment.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Repayment {
    pub id: String,
    pub credit_request_id: String,
    pub amount: Decimal,
    pub reference_number: String,
    pub payment_date: DateTime<Utc>,
}

/// Insert payload for a repayment row
#[derive(Debug, Clone)]
pub struct NewRepayment {
    pub credit_request_id: String,
    pub amount: Decimal,
    pub reference_number: String,
}
