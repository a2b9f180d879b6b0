use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::Result;
use crate::modules::auth::repositories::TokenRepository;
use crate::modules::credit::repositories::CreditRepository;
use crate::modules::savings::repositories::SavingsRepository;
use crate::modules::users::repositories::{UserListFilter, UserRepository};

/// Dashboard overview counters
#[derive(Debug, Serialize)]
pub struct AnalyticsOverview {
    pub users: UsersOverview,
    pub credits: CreditsOverview,
    pub savings: SavingsOverview,
    pub sessions: SessionsOverview,
    pub logins: LoginsOverview,
}

#[derive(Debug, Serialize)]
pub struct UsersOverview {
    pub total: i64,
    pub active: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditsOverview {
    pub total: i64,
    pub by_status: CreditStatusBreakdown,
}

#[derive(Debug, Serialize)]
pub struct CreditStatusBreakdown {
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
    pub repaid: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsOverview {
    pub total_balance: Decimal,
}

#[derive(Debug, Serialize)]
pub struct SessionsOverview {
    pub active: i64,
}

#[derive(Debug, Serialize)]
pub struct LoginsOverview {
    #[serde(rename = "last24h")]
    pub last_24h: i64,
}

/// Composes the per-module repositories into the dashboard overview
pub struct AnalyticsService {
    users: Arc<dyn UserRepository>,
    credit: Arc<dyn CreditRepository>,
    savings: Arc<dyn SavingsRepository>,
    tokens: Arc<dyn TokenRepository>,
}

impl AnalyticsService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        credit: Arc<dyn CreditRepository>,
        savings: Arc<dyn SavingsRepository>,
        tokens: Arc<dyn TokenRepository>,
    ) -> Self {
        Self {
            users,
            credit,
            savings,
            tokens,
        }
    }

    pub async fn overview(&self) -> Result<AnalyticsOverview> {
        let all_users = UserListFilter::default();
        let active_users = UserListFilter {
            status: Some("active".to_string()),
            ..Default::default()
        };

        let total_users = self.users.count(&all_users).await?;
        let active = self.users.count(&active_users).await?;

        let total_credits = self.credit.count_requests(None).await?;
        let pending = self.credit.count_requests(Some("pending")).await?;
        let approved = self.credit.count_requests(Some("approved")).await?;
        let rejected = self.credit.count_requests(Some("rejected")).await?;
        let repaid = self.credit.count_requests(Some("repaid")).await?;

        let total_balance = self.savings.sum_all_balances().await?;

        let active_sessions = self.tokens.count_active().await?;
        let last_24h = self
            .tokens
            .count_created_since(Utc::now() - Duration::hours(24))
            .await?;

        Ok(AnalyticsOverview {
            users: UsersOverview {
                total: total_users,
                active,
            },
            credits: CreditsOverview {
                total: total_credits,
                by_status: CreditStatusBreakdown {
                    pending,
                    approved,
                    rejected,
                    repaid,
                },
            },
            savings: SavingsOverview { total_balance },
            sessions: SessionsOverview {
                active: active_sessions,
            },
            logins: LoginsOverview { last_24h },
        })
    }
}
