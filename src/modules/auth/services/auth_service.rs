use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::config::JwtConfig;
use crate::core::error::AppError;
use crate::modules::auth::models::{
    NewRefreshToken, SessionContext, SessionResponse,
};
use crate::modules::auth::repositories::TokenRepository;
use crate::modules::auth::services::token_service;
use crate::modules::users::models::{User, UserRole, UserStatus};
use crate::modules::users::repositories::UserRepository;

/// Admin session lifecycle: login, refresh rotation, logout
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn TokenRepository>,
    jwt: JwtConfig,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn TokenRepository>,
        jwt: JwtConfig,
    ) -> Self {
        Self { users, tokens, jwt }
    }

    /// Authenticate an admin and open a session.
    ///
    /// Unknown email and wrong password return the same error.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        ctx: SessionContext,
    ) -> Result<SessionResponse, AppError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid email or password"))?;

        if !token_service::verify_password(password, &user.password_hash)? {
            return Err(AppError::unauthorized("Invalid email or password"));
        }

        self.require_active_admin(&user)?;

        self.open_session(user, ctx).await
    }

    /// Rotate a refresh token: the presented token is revoked and a new
    /// pair is issued. A revoked or expired token is rejected outright.
    pub async fn refresh(
        &self,
        refresh_token: &str,
        ctx: SessionContext,
    ) -> Result<SessionResponse, AppError> {
        let hash = token_service::hash_refresh_token(refresh_token);
        let record = self
            .tokens
            .find_by_hash(&hash)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid refresh token"))?;

        if !record.is_usable(Utc::now()) {
            return Err(AppError::unauthorized("Refresh token expired or revoked"));
        }

        let user = self
            .users
            .find_by_id(&record.user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid refresh token"))?;

        self.require_active_admin(&user)?;

        self.tokens.revoke(&record.id).await?;

        self.open_session(user, ctx).await
    }

    /// Revoke the presented refresh token. Revoking an already-revoked or
    /// unknown token is a no-op.
    pub async fn logout(&self, refresh_token: &str) -> Result<(), AppError> {
        let hash = token_service::hash_refresh_token(refresh_token);
        if let Some(record) = self.tokens.find_by_hash(&hash).await? {
            self.tokens.revoke(&record.id).await?;
        }

        Ok(())
    }

    fn require_active_admin(&self, user: &User) -> Result<(), AppError> {
        if user.role != UserRole::Admin {
            return Err(AppError::unauthorized("Admin role required"));
        }
        if user.status != UserStatus::Active {
            return Err(AppError::unauthorized("Account is not active"));
        }
        Ok(())
    }

    async fn open_session(
        &self,
        user: User,
        ctx: SessionContext,
    ) -> Result<SessionResponse, AppError> {
        let access_token = token_service::generate_access_token(
            &user.id,
            &user.role.to_string(),
            &self.jwt.secret,
            self.jwt.access_ttl_seconds,
        )?;

        let refresh_token = token_service::new_refresh_token();
        self.tokens
            .create(&NewRefreshToken {
                user_id: user.id.clone(),
                token_hash: token_service::hash_refresh_token(&refresh_token),
                device_info: ctx.device_info,
                ip_address: ctx.ip_address,
                expires_at: Utc::now() + Duration::days(self.jwt.refresh_ttl_days),
            })
            .await?;

        Ok(SessionResponse {
            access_token,
            refresh_token,
            user: user.into(),
        })
    }
}
