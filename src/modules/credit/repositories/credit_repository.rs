use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, QueryBuilder};
use uuid::Uuid;

use crate::core::Result;
use crate::modules::credit::models::{
    CreditRequest, CreditStatus, CreditStatusCounts, NewRepayment, Repayment,
};
use crate::modules::users::models::UserSummary;

/// Sortable columns for the admin request listing; unknown keys fall back
/// to creation time (sort keys are interpolated into ORDER BY).
pub fn sort_column(key: &str) -> &'static str {
    match key {
        "amount" => "amount",
        "interestRate" | "interest_rate" => "interest_rate",
        "durationMonths" | "duration_months" => "duration_months",
        "status" => "status",
        _ => "created_at",
    }
}

#[async_trait]
pub trait CreditRepository: Send + Sync {
    async fn find_request(&self, id: &str) -> Result<Option<CreditRequest>>;

    async fn find_request_with_repayments(
        &self,
        id: &str,
    ) -> Result<Option<(CreditRequest, Vec<Repayment>)>>;

    /// Detail join: request, owning user, all repayments
    async fn find_detail(
        &self,
        id: &str,
    ) -> Result<Option<(CreditRequest, UserSummary, Vec<Repayment>)>>;

    async fn list_requests(
        &self,
        status: Option<&str>,
        sort_by: &str,
        descending: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CreditRequest>>;

    async fn count_requests(&self, status: Option<&str>) -> Result<i64>;

    /// Conditional single-transition write: only touches the row while it
    /// is still `pending`. Returns false when the row is absent or a
    /// concurrent transition won.
    async fn transition_from_pending(
        &self,
        id: &str,
        status: CreditStatus,
        admin_id: &str,
        approved_at: Option<DateTime<Utc>>,
        rejection_reason: Option<&str>,
    ) -> Result<bool>;

    async fn reference_exists(&self, reference_number: &str) -> Result<bool>;

    async fn create_repayment(&self, repayment: &NewRepayment) -> Result<Repayment>;

    async fn list_for_user_with_repayments(
        &self,
        user_id: &str,
    ) -> Result<Vec<(CreditRequest, Vec<Repayment>)>>;

    async fn count_by_status_for_user(&self, user_id: &str) -> Result<CreditStatusCounts>;
}

pub struct MySqlCreditRepository {
    pool: MySqlPool,
}

impl MySqlCreditRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn repayments_for(&self, request_id: &str) -> Result<Vec<Repayment>> {
        let rows = sqlx::query_as::<_, Repayment>(
            r#"
            SELECT id, credit_request_id, amount, reference_number, payment_date
            FROM repayments
            WHERE credit_request_id = ?
            ORDER BY payment_date ASC
            "#,
        )
        .bind(request_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

const REQUEST_COLUMNS: &str = "id, user_id, amount, interest_rate, duration_months, purpose, \
     status, approved_by, approved_at, rejection_reason, created_at";

#[async_trait]
impl CreditRepository for MySqlCreditRepository {
    async fn find_request(&self, id: &str) -> Result<Option<CreditRequest>> {
        let request = sqlx::query_as::<_, CreditRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM credit_requests WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    async fn find_request_with_repayments(
        &self,
        id: &str,
    ) -> Result<Option<(CreditRequest, Vec<Repayment>)>> {
        let Some(request) = self.find_request(id).await? else {
            return Ok(None);
        };

        let repayments = self.repayments_for(id).await?;

        Ok(Some((request, repayments)))
    }

    async fn find_detail(
        &self,
        id: &str,
    ) -> Result<Option<(CreditRequest, UserSummary, Vec<Repayment>)>> {
        let Some(request) = self.find_request(id).await? else {
            return Ok(None);
        };

        let user = sqlx::query_as::<_, UserSummary>(
            "SELECT id, email, first_name, last_name, phone_number FROM users WHERE id = ?",
        )
        .bind(&request.user_id)
        .fetch_one(&self.pool)
        .await?;

        let repayments = self.repayments_for(id).await?;

        Ok(Some((request, user, repayments)))
    }

    async fn list_requests(
        &self,
        status: Option<&str>,
        sort_by: &str,
        descending: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CreditRequest>> {
        let mut qb: QueryBuilder<sqlx::MySql> = QueryBuilder::new(format!(
            "SELECT {REQUEST_COLUMNS} FROM credit_requests WHERE 1 = 1"
        ));
        if let Some(status) = status {
            qb.push(" AND status = ");
            qb.push_bind(status.to_string());
        }
        qb.push(format!(
            " ORDER BY {} {}",
            sort_column(sort_by),
            if descending { "DESC" } else { "ASC" }
        ));
        qb.push(" LIMIT ");
        qb.push_bind(limit);
        qb.push(" OFFSET ");
        qb.push_bind(offset);

        let requests = qb
            .build_query_as::<CreditRequest>()
            .fetch_all(&self.pool)
            .await?;

        Ok(requests)
    }

    async fn count_requests(&self, status: Option<&str>) -> Result<i64> {
        let mut qb: QueryBuilder<sqlx::MySql> =
            QueryBuilder::new("SELECT COUNT(*) FROM credit_requests WHERE 1 = 1");
        if let Some(status) = status {
            qb.push(" AND status = ");
            qb.push_bind(status.to_string());
        }

        let count: (i64,) = qb.build_query_as().fetch_one(&self.pool).await?;

        Ok(count.0)
    }

    async fn transition_from_pending(
        &self,
        id: &str,
        status: CreditStatus,
        admin_id: &str,
        approved_at: Option<DateTime<Utc>>,
        rejection_reason: Option<&str>,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE credit_requests
            SET status = ?, approved_by = ?, approved_at = ?, rejection_reason = ?
            WHERE id = ? AND status = 'pending'
            "#,
        )
        .bind(status)
        .bind(admin_id)
        .bind(approved_at)
        .bind(rejection_reason)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn reference_exists(&self, reference_number: &str) -> Result<bool> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM repayments WHERE reference_number = ?")
                .bind(reference_number)
                .fetch_one(&self.pool)
                .await?;

        Ok(count.0 > 0)
    }

    async fn create_repayment(&self, repayment: &NewRepayment) -> Result<Repayment> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO repayments (id, credit_request_id, amount, reference_number, payment_date)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&repayment.credit_request_id)
        .bind(repayment.amount)
        .bind(&repayment.reference_number)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Repayment {
            id,
            credit_request_id: repayment.credit_request_id.clone(),
            amount: repayment.amount,
            reference_number: repayment.reference_number.clone(),
            payment_date: now,
        })
    }

    async fn list_for_user_with_repayments(
        &self,
        user_id: &str,
    ) -> Result<Vec<(CreditRequest, Vec<Repayment>)>> {
        let requests = sqlx::query_as::<_, CreditRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM credit_requests WHERE user_id = ? ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(requests.len());
        for request in requests {
            let repayments = self.repayments_for(&request.id).await?;
            out.push((request, repayments));
        }

        Ok(out)
    }

    async fn count_by_status_for_user(&self, user_id: &str) -> Result<CreditStatusCounts> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT status, COUNT(*) FROM credit_requests WHERE user_id = ? GROUP BY status",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut counts = CreditStatusCounts::default();
        for (status, count) in rows {
            match status.as_str() {
                "pending" => counts.pending = count,
                "approved" => counts.approved = count,
                "rejected" => counts.rejected = count,
                "disbursed" => counts.disbursed = count,
                "repaid" => counts.repaid = count,
                _ => {}
            }
        }

        Ok(counts)
    }
}
