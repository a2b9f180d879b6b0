//! Repayment reference numbers.
//!
//! References are human-readable reconciliation ids of the form
//! `CR{unix_millis}{3-digit suffix}`. Candidates are checked against the
//! store before use; the `reference_number` UNIQUE index remains the
//! correctness guarantee, the check only avoids burning an insert on an
//! obvious collision.

use chrono::Utc;
use rand::Rng;

/// Attempts before giving up with `AppError::ReferenceExhausted`
pub const MAX_REFERENCE_ATTEMPTS: u32 = 8;

/// Synthesize a candidate reference number
pub fn candidate() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: u16 = rand::thread_rng().gen_range(0..1000);
    format!("CR{millis}{suffix:03}")
}
