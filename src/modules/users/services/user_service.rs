use std::str::FromStr;
use std::sync::Arc;

use crate::core::error::AppError;
use crate::core::response::page_offset;
use crate::modules::auth::repositories::TokenRepository;
use crate::modules::auth::services::token_service;
use crate::modules::credit::repositories::CreditRepository;
use crate::modules::notifications::models::NotificationIntent;
use crate::modules::notifications::repositories::NotificationRepository;
use crate::modules::users::models::{
    ChangePasswordRequest, CreditRequestWithRepayments, UpdateProfileRequest, UserDetailResponse,
    UserProfile, UserStatus,
};
use crate::modules::users::repositories::{UserListFilter, UserRepository};

/// Profile self-service plus the admin user directory
pub struct UserService {
    users: Arc<dyn UserRepository>,
    credit: Arc<dyn CreditRepository>,
    tokens: Arc<dyn TokenRepository>,
    outbox: Arc<dyn NotificationRepository>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        credit: Arc<dyn CreditRepository>,
        tokens: Arc<dyn TokenRepository>,
        outbox: Arc<dyn NotificationRepository>,
    ) -> Self {
        Self {
            users,
            credit,
            tokens,
            outbox,
        }
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<UserProfile, AppError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        Ok(user.into())
    }

    /// Update the caller's own profile. A phone number already held by a
    /// different account is a conflict.
    pub async fn update_profile(
        &self,
        user_id: &str,
        update: UpdateProfileRequest,
    ) -> Result<UserProfile, AppError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        if let Some(phone) = update
            .phone_number
            .as_deref()
            .filter(|p| *p != user.phone_number)
        {
            if self.users.find_by_phone(phone).await?.is_some() {
                return Err(AppError::conflict("Phone number is already in use"));
            }
        }

        self.users
            .update_profile(
                user_id,
                update.first_name.as_deref(),
                update.last_name.as_deref(),
                update.phone_number.as_deref(),
            )
            .await?;

        self.get_profile(user_id).await
    }

    pub async fn change_password(
        &self,
        user_id: &str,
        change: ChangePasswordRequest,
    ) -> Result<(), AppError> {
        if change.new_password.len() < 8 {
            return Err(AppError::validation(
                "New password must be at least 8 characters",
            ));
        }

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        if !token_service::verify_password(&change.current_password, &user.password_hash)? {
            return Err(AppError::unauthorized("Current password is incorrect"));
        }

        let new_hash = token_service::hash_password(&change.new_password)?;
        self.users.update_password(user_id, &new_hash).await?;

        // Best effort; the password change already succeeded
        if let Err(e) = self
            .outbox
            .enqueue(&NotificationIntent::in_app(
                user_id,
                "Password changed",
                "Your account password was changed successfully.",
            ))
            .await
        {
            tracing::warn!(user_id, error = %e, "failed to enqueue password-change notification");
        }

        Ok(())
    }

    pub async fn list_users(
        &self,
        filter: UserListFilter,
        page: i64,
        limit: i64,
        sort_by: &str,
        descending: bool,
    ) -> Result<(Vec<UserProfile>, i64), AppError> {
        let offset = page_offset(page, limit);
        let users = self
            .users
            .list(&filter, sort_by, descending, limit, offset)
            .await?;
        let total = self.users.count(&filter).await?;

        Ok((users.into_iter().map(Into::into).collect(), total))
    }

    /// Admin detail: profile, savings account, credit history with
    /// repayments, per-status credit counts and session activity.
    pub async fn user_details(&self, user_id: &str) -> Result<UserDetailResponse, AppError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let savings_account = self.users.savings_account_for(user_id).await?;
        let credit_requests = self
            .credit
            .list_for_user_with_repayments(user_id)
            .await?
            .into_iter()
            .map(|(request, repayments)| CreditRequestWithRepayments {
                request: request.into(),
                repayments,
            })
            .collect();
        let credit_summary = self.credit.count_by_status_for_user(user_id).await?;
        let active_sessions = self.tokens.count_active_for_user(user_id).await?;
        let last_login = self.tokens.last_login(user_id).await?;

        Ok(UserDetailResponse {
            profile: user.into(),
            savings_account,
            credit_requests,
            credit_summary,
            active_sessions,
            last_login,
        })
    }

    pub async fn update_status(&self, user_id: &str, status: &str) -> Result<UserProfile, AppError> {
        let status = UserStatus::from_str(status)
            .map_err(|_| AppError::validation(format!("Invalid status '{status}'")))?;

        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        self.users.update_status(user_id, status).await?;

        self.get_profile(user_id).await
    }

    /// Soft delete: the row stays, the status flips
    pub async fn soft_delete(&self, user_id: &str) -> Result<(), AppError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        self.users
            .update_status(user_id, UserStatus::Deleted)
            .await?;

        Ok(())
    }
}
