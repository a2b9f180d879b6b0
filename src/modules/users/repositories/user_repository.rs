use async_trait::async_trait;
use sqlx::{MySqlPool, QueryBuilder};

use crate::core::Result;
use crate::modules::savings::models::SavingsAccount;
use crate::modules::users::models::{User, UserStatus};

/// Listing filters for the admin user table
#[derive(Debug, Default, Clone)]
pub struct UserListFilter {
    pub role: Option<String>,
    pub status: Option<String>,
    /// Case-insensitive substring match on email
    pub email: Option<String>,
}

/// Sortable columns exposed to the API. Anything else falls back to
/// creation time; sort keys are interpolated into ORDER BY and must never
/// come from user input unvalidated.
pub fn sort_column(key: &str) -> &'static str {
    match key {
        "email" => "email",
        "firstName" | "first_name" => "first_name",
        "lastName" | "last_name" => "last_name",
        "role" => "role",
        "status" => "status",
        _ => "created_at",
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<User>>;

    async fn list(
        &self,
        filter: &UserListFilter,
        sort_by: &str,
        descending: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>>;

    async fn count(&self, filter: &UserListFilter) -> Result<i64>;

    async fn update_profile(
        &self,
        id: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
        phone_number: Option<&str>,
    ) -> Result<()>;

    async fn update_password(&self, id: &str, password_hash: &str) -> Result<()>;

    async fn update_status(&self, id: &str, status: UserStatus) -> Result<()>;

    async fn savings_account_for(&self, user_id: &str) -> Result<Option<SavingsAccount>>;
}

pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, phone_number, \
     role, status, created_at, updated_at";

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE phone_number = ?"
        ))
        .bind(phone_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn list(
        &self,
        filter: &UserListFilter,
        sort_by: &str,
        descending: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>> {
        let mut qb: QueryBuilder<sqlx::MySql> =
            QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users WHERE 1 = 1"));
        push_filters(&mut qb, filter);

        qb.push(format!(
            " ORDER BY {} {}",
            sort_column(sort_by),
            if descending { "DESC" } else { "ASC" }
        ));
        qb.push(" LIMIT ");
        qb.push_bind(limit);
        qb.push(" OFFSET ");
        qb.push_bind(offset);

        let users = qb.build_query_as::<User>().fetch_all(&self.pool).await?;

        Ok(users)
    }

    async fn count(&self, filter: &UserListFilter) -> Result<i64> {
        let mut qb: QueryBuilder<sqlx::MySql> =
            QueryBuilder::new("SELECT COUNT(*) FROM users WHERE 1 = 1");
        push_filters(&mut qb, filter);

        let count: (i64,) = qb.build_query_as().fetch_one(&self.pool).await?;

        Ok(count.0)
    }

    async fn update_profile(
        &self,
        id: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
        phone_number: Option<&str>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET first_name = COALESCE(?, first_name),
                last_name = COALESCE(?, last_name),
                phone_number = COALESCE(?, phone_number)
            WHERE id = ?
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .bind(phone_number)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_password(&self, id: &str, password_hash: &str) -> Result<()> {
        sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn update_status(&self, id: &str, status: UserStatus) -> Result<()> {
        sqlx::query("UPDATE users SET status = ? WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn savings_account_for(&self, user_id: &str) -> Result<Option<SavingsAccount>> {
        let account = sqlx::query_as::<_, SavingsAccount>(
            r#"
            SELECT id, user_id, balance, created_at, updated_at
            FROM savings_accounts
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, sqlx::MySql>, filter: &UserListFilter) {
    if let Some(role) = &filter.role {
        qb.push(" AND role = ");
        qb.push_bind(role.clone());
    }
    if let Some(status) = &filter.status {
        qb.push(" AND status = ");
        qb.push_bind(status.clone());
    }
    if let Some(email) = &filter.email {
        qb.push(" AND LOWER(email) LIKE ");
        qb.push_bind(format!("%{}%", email.to_lowercase()));
    }
}
