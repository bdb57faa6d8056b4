use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::password::MIN_PASSWORD_LENGTH;
use crate::database::manager::DatabaseError;
use crate::database::models::{Account, Role};
use crate::error::ApiError;
use crate::services::validation::{is_valid_email, Violations};

/// Account fields accepted from clients; absent fields are left unchanged on update
#[derive(Debug, Default, Clone, Deserialize)]
pub struct AccountInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

impl AccountInput {
    pub fn validate_new(&self) -> Result<(), ApiError> {
        let mut v = Violations::new();
        v.require(self.name.as_deref(), "Please add a name");
        if let Some(email) = v.require(self.email.as_deref(), "Please add an email") {
            v.check(is_valid_email(email), "Please add a valid email");
        }
        if let Some(password) = v.require(self.password.as_deref(), "Please add a password") {
            v.check(password.chars().count() >= MIN_PASSWORD_LENGTH, "Password must be at least 6 characters");
        }
        v.into_result()
    }

    pub fn validate_update(&self) -> Result<(), ApiError> {
        let mut v = Violations::new();
        if self.name.is_some() {
            v.require(self.name.as_deref(), "Please add a name");
        }
        if let Some(email) = &self.email {
            v.check(is_valid_email(email.trim()), "Please add a valid email");
        }
        if let Some(password) = &self.password {
            v.check(password.chars().count() >= MIN_PASSWORD_LENGTH, "Password must be at least 6 characters");
        }
        v.into_result()
    }

    /// Self-registration may only pick `user` or `publisher`
    pub fn validate_self_service_role(&self) -> Result<(), ApiError> {
        match self.role {
            Some(Role::Admin) => Err(ApiError::validation(vec![
                "Please choose a role of user or publisher".to_string(),
            ])),
            _ => Ok(()),
        }
    }
}

pub struct AccountService {
    pool: PgPool,
}

impl AccountService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert an account. `password_hash` must already be hashed.
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        role: Role,
        password_hash: &str,
    ) -> Result<Account, DatabaseError> {
        let account = sqlx::query_as::<_, Account>(
            "INSERT INTO accounts (name, email, role, password)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(name.trim())
        .bind(email.trim())
        .bind(role.as_str())
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(account_id = %account.id, role = %account.role, "account created");
        Ok(account)
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<Account>, DatabaseError> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DatabaseError> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE email = $1")
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    /// Account holding an unexpired reset token with this hash
    pub async fn find_by_reset_token(&self, hashed: &str) -> Result<Option<Account>, DatabaseError> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT * FROM accounts
             WHERE reset_password_token = $1 AND reset_password_expire > now()",
        )
        .bind(hashed)
        .fetch_optional(&self.pool)
        .await?;
        Ok(account)
    }

    /// Partial update; `password_hash` must already be hashed when present
    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
        role: Option<Role>,
        password_hash: Option<&str>,
    ) -> Result<Account, DatabaseError> {
        let account = sqlx::query_as::<_, Account>(
            "UPDATE accounts SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                role = COALESCE($4, role),
                password = COALESCE($5, password)
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(name.map(str::trim))
        .bind(email.map(str::trim))
        .bind(role.map(|r| r.as_str()))
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await?;

        account.ok_or_else(|| DatabaseError::NotFound(format!("No user with the id of {}", id)))
    }

    /// Replace the password and invalidate any outstanding reset token
    pub async fn set_password(&self, id: Uuid, password_hash: &str) -> Result<Account, DatabaseError> {
        let account = sqlx::query_as::<_, Account>(
            "UPDATE accounts SET
                password = $2,
                reset_password_token = NULL,
                reset_password_expire = NULL
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await?;

        account.ok_or_else(|| DatabaseError::NotFound(format!("No user with the id of {}", id)))
    }

    /// Store (or with `None`, clear) the hashed reset token and its expiry
    pub async fn store_reset_token(
        &self,
        id: Uuid,
        token: Option<(&str, DateTime<Utc>)>,
    ) -> Result<(), DatabaseError> {
        let (hashed, expires) = match token {
            Some((hashed, expires)) => (Some(hashed), Some(expires)),
            None => (None, None),
        };
        sqlx::query(
            "UPDATE accounts SET reset_password_token = $2, reset_password_expire = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(hashed)
        .bind(expires)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
