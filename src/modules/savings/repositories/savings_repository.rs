use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::MySqlPool;

use crate::core::Result;

#[async_trait]
pub trait SavingsRepository: Send + Sync {
    async fn sum_all_balances(&self) -> Result<Decimal>;

    async fn count_all_accounts(&self) -> Result<i64>;

    /// `kind` is one of `deposit` / `withdrawal`
    async fn count_transactions_by_kind(&self, kind: &str) -> Result<i64>;
}

pub struct MySqlSavingsRepository {
    pool: MySqlPool,
}

impl MySqlSavingsRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SavingsRepository for MySqlSavingsRepository {
    async fn sum_all_balances(&self) -> Result<Decimal> {
        let row: (Option<Decimal>,) =
            sqlx::query_as("SELECT SUM(balance) FROM savings_accounts")
                .fetch_one(&self.pool)
                .await?;

        Ok(row.0.unwrap_or(Decimal::ZERO))
    }

    async fn count_all_accounts(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM savings_accounts")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.0)
    }

    async fn count_transactions_by_kind(&self, kind: &str) -> Result<i64> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM savings_transactions WHERE kind = ?")
                .bind(kind)
                .fetch_one(&self.pool)
                .await?;

        Ok(row.0)
    }
}
