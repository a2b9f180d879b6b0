use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;
use uuid::Uuid;

use crate::core::Result;
use crate::modules::auth::models::{NewRefreshToken, RefreshTokenRecord};

/// Refresh-token session storage
#[async_trait]
pub trait TokenRepository: Send + Sync {
    async fn create(&self, token: &NewRefreshToken) -> Result<RefreshTokenRecord>;

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>>;

    async fn revoke(&self, id: &str) -> Result<()>;

    /// Active (unrevoked, unexpired) sessions for a user
    async fn count_active_for_user(&self, user_id: &str) -> Result<i64>;

    /// Creation time of the newest session row, i.e. the last login
    async fn last_login(&self, user_id: &str) -> Result<Option<DateTime<Utc>>>;

    /// Sessions created in the given window, platform-wide
    async fn count_created_since(&self, since: DateTime<Utc>) -> Result<i64>;

    async fn count_active(&self) -> Result<i64>;
}

pub struct MySqlTokenRepository {
    pool: MySqlPool,
}

impl MySqlTokenRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

const TOKEN_COLUMNS: &str =
    "id, user_id, token_hash, device_info, ip_address, created_at, expires_at, revoked_at";

#[async_trait]
impl TokenRepository for MySqlTokenRepository {
    async fn create(&self, token: &NewRefreshToken) -> Result<RefreshTokenRecord> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO refresh_tokens
                (id, user_id, token_hash, device_info, ip_address, created_at, expires_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&token.user_id)
        .bind(&token.token_hash)
        .bind(&token.device_info)
        .bind(&token.ip_address)
        .bind(now)
        .bind(token.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(RefreshTokenRecord {
            id,
            user_id: token.user_id.clone(),
            token_hash: token.token_hash.clone(),
            device_info: token.device_info.clone(),
            ip_address: token.ip_address.clone(),
            created_at: now,
            expires_at: token.expires_at,
            revoked_at: None,
        })
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>> {
        let record = sqlx::query_as::<_, RefreshTokenRecord>(&format!(
            "SELECT {TOKEN_COLUMNS} FROM refresh_tokens WHERE token_hash = ?"
        ))
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn revoke(&self, id: &str) -> Result<()> {
        sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = NOW() WHERE id = ? AND revoked_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn count_active_for_user(&self, user_id: &str) -> Result<i64> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM refresh_tokens
            WHERE user_id = ? AND revoked_at IS NULL AND expires_at > NOW()
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    async fn last_login(&self, user_id: &str) -> Result<Option<DateTime<Utc>>> {
        let row: Option<(DateTime<Utc>,)> = sqlx::query_as(
            r#"
            SELECT created_at FROM refresh_tokens
            WHERE user_id = ?
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(created_at,)| created_at))
    }

    async fn count_created_since(&self, since: DateTime<Utc>) -> Result<i64> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM refresh_tokens WHERE created_at > ?")
                .bind(since)
                .fetch_one(&self.pool)
                .await?;

        Ok(count.0)
    }

    async fn count_active(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM refresh_tokens WHERE revoked_at IS NULL AND expires_at > NOW()",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }
}
