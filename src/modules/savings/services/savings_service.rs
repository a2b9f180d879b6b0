use std::sync::Arc;

use crate::core::Result;
use crate::modules::savings::models::SavingsAnalytics;
use crate::modules::savings::repositories::SavingsRepository;

/// Read-only savings analytics
pub struct SavingsService {
    repo: Arc<dyn SavingsRepository>,
}

impl SavingsService {
    pub fn new(repo: Arc<dyn SavingsRepository>) -> Self {
        Self { repo }
    }

    pub async fn analytics(&self) -> Result<SavingsAnalytics> {
        let total_balance = self.repo.sum_all_balances().await?;
        let total_accounts = self.repo.count_all_accounts().await?;
        let deposits_count = self.repo.count_transactions_by_kind("deposit").await?;
        let withdrawals_count = self.repo.count_transactions_by_kind("withdrawal").await?;

        Ok(SavingsAnalytics {
            total_balance,
            total_accounts,
            deposits_count,
            withdrawals_count,
        })
    }
}
