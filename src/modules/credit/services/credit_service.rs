use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;

use crate::core::error::AppError;
use crate::core::response::page_offset;
use crate::modules::credit::models::{
    remaining_balance, CreditRequest, CreditRequestDetail, CreditRequestResponse, CreditStatus,
    NewRepayment, Repayment,
};
use crate::modules::credit::repositories::CreditRepository;
use crate::modules::credit::services::reference::{self, MAX_REFERENCE_ATTEMPTS};
use crate::modules::notifications::models::NotificationIntent;
use crate::modules::notifications::repositories::NotificationRepository;

/// Owns the credit-request lifecycle: the single pending → approved /
/// rejected transition, and repayments against approved requests.
pub struct CreditService {
    repo: Arc<dyn CreditRepository>,
    outbox: Arc<dyn NotificationRepository>,
}

impl CreditService {
    pub fn new(repo: Arc<dyn CreditRepository>, outbox: Arc<dyn NotificationRepository>) -> Self {
        Self { repo, outbox }
    }

    /// Approve a pending request.
    ///
    /// The write is conditional on the row still being `pending`, so a
    /// concurrent approve/reject race has exactly one winner; the loser
    /// observes the lost race as an invalid state.
    pub async fn approve(
        &self,
        request_id: &str,
        admin_id: &str,
    ) -> Result<CreditRequestResponse, AppError> {
        let request = self.require_pending(request_id).await?;

        let transitioned = self
            .repo
            .transition_from_pending(
                request_id,
                CreditStatus::Approved,
                admin_id,
                Some(Utc::now()),
                None,
            )
            .await?;
        if !transitioned {
            return Err(AppError::invalid_state(
                "Only pending requests can be approved",
            ));
        }

        self.enqueue_notification(NotificationIntent::in_app(
            request.user_id.clone(),
            "Credit request approved",
            format!(
                "Your credit request of {} has been approved.",
                request.amount
            ),
        ))
        .await;

        let updated = self
            .repo
            .find_request(request_id)
            .await?
            .ok_or_else(|| AppError::not_found("Credit request not found"))?;

        Ok(updated.into())
    }

    /// Reject a pending request with a reason.
    ///
    /// The reason is validated non-empty at the controller boundary; the
    /// service still refuses a blank one.
    pub async fn reject(
        &self,
        request_id: &str,
        admin_id: &str,
        reason: &str,
    ) -> Result<CreditRequestResponse, AppError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::validation("Rejection reason is required"));
        }

        let request = self.require_pending(request_id).await?;

        let transitioned = self
            .repo
            .transition_from_pending(
                request_id,
                CreditStatus::Rejected,
                admin_id,
                None,
                Some(reason),
            )
            .await?;
        if !transitioned {
            return Err(AppError::invalid_state(
                "Only pending requests can be rejected",
            ));
        }

        self.enqueue_notification(NotificationIntent::in_app(
            request.user_id.clone(),
            "Credit request rejected",
            format!(
                "Your credit request of {} has been rejected. Reason: {reason}",
                request.amount
            ),
        ))
        .await;

        let updated = self
            .repo
            .find_request(request_id)
            .await?
            .ok_or_else(|| AppError::not_found("Credit request not found"))?;

        Ok(updated.into())
    }

    /// Record a repayment against the caller's approved request.
    ///
    /// A request owned by someone else reads as absent; the caller cannot
    /// distinguish "not yours" from "does not exist". Paying the exact
    /// remaining balance is allowed and closes it; the `repaid` status
    /// transition itself is owned by a separate process.
    pub async fn repay(
        &self,
        request_id: &str,
        user_id: &str,
        amount: Decimal,
    ) -> Result<Repayment, AppError> {
        if amount <= Decimal::ZERO {
            return Err(AppError::invalid_amount(
                "Payment amount must be greater than 0",
            ));
        }

        let (request, repayments) = self
            .repo
            .find_request_with_repayments(request_id)
            .await?
            .filter(|(request, _)| request.user_id == user_id)
            .ok_or_else(|| AppError::not_found("Credit request not found"))?;

        if request.status != CreditStatus::Approved {
            return Err(AppError::invalid_state(
                "Credit request must be approved before making repayments",
            ));
        }

        let repaid: Decimal = repayments.iter().map(|r| r.amount).sum();
        let remaining = remaining_balance(request.amount, request.interest_rate, repaid);

        if amount > remaining {
            return Err(AppError::invalid_amount(format!(
                "Payment amount exceeds remaining balance. Remaining: {:.2}",
                remaining.round_dp(2)
            )));
        }

        let reference_number = self.allocate_reference().await?;

        let repayment = self
            .repo
            .create_repayment(&NewRepayment {
                credit_request_id: request.id.clone(),
                amount,
                reference_number,
            })
            .await?;

        Ok(repayment)
    }

    /// Paginated admin listing with optional status filter
    pub async fn list_requests(
        &self,
        page: i64,
        limit: i64,
        status: Option<&str>,
        sort_by: &str,
        descending: bool,
    ) -> Result<(Vec<CreditRequestResponse>, i64), AppError> {
        let offset = page_offset(page, limit);
        let requests = self
            .repo
            .list_requests(status, sort_by, descending, limit, offset)
            .await?;
        let total = self.repo.count_requests(status).await?;

        Ok((requests.into_iter().map(Into::into).collect(), total))
    }

    /// Detail view joining the owning user and all repayments
    pub async fn request_details(&self, request_id: &str) -> Result<CreditRequestDetail, AppError> {
        let (request, user, repayments) = self
            .repo
            .find_detail(request_id)
            .await?
            .ok_or_else(|| AppError::not_found("Credit request not found"))?;

        let repaid: Decimal = repayments.iter().map(|r| r.amount).sum();
        let total_owed = request.total_owed();

        Ok(CreditRequestDetail {
            total_owed,
            remaining_balance: total_owed - repaid,
            request: request.into(),
            user,
            repayments,
        })
    }

    async fn require_pending(&self, request_id: &str) -> Result<CreditRequest, AppError> {
        let request = self
            .repo
            .find_request(request_id)
            .await?
            .ok_or_else(|| AppError::not_found("Credit request not found"))?;

        if request.status != CreditStatus::Pending {
            return Err(AppError::invalid_state(format!(
                "Only pending requests can be transitioned (current status: {})",
                request.status
            )));
        }

        Ok(request)
    }

    /// Bounded collision-avoidance loop. The UNIQUE index on
    /// `reference_number` is the real guarantee.
    async fn allocate_reference(&self) -> Result<String, AppError> {
        for _ in 0..MAX_REFERENCE_ATTEMPTS {
            let candidate = reference::candidate();
            if !self.repo.reference_exists(&candidate).await? {
                return Ok(candidate);
            }
        }

        Err(AppError::ReferenceExhausted(MAX_REFERENCE_ATTEMPTS))
    }

    /// Enqueue failures are logged and swallowed; a notification must
    /// never fail or roll back the transition it describes.
    async fn enqueue_notification(&self, intent: NotificationIntent) {
        if let Err(e) = self.outbox.enqueue(&intent).await {
            tracing::warn!(
                user_id = %intent.user_id,
                title = %intent.title,
                error = %e,
                "failed to enqueue notification"
            );
        }
    }
}
