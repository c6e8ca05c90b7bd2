use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{ResetCode, User};

const USER_COLUMNS: &str = "id, email, password_hash, name, account_type, balance, \
                            demo_balance, bonus_balance, is_verified, kyc_approved, created_at";

/// Credential store.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> anyhow::Result<()>;
}

/// Reset-code store. Holds at most one code per email.
#[async_trait]
pub trait ResetCodeStore: Send + Sync {
    /// Stores `code` for `email`, replacing any previous code.
    async fn replace(&self, email: &str, code: &str, expires_at: OffsetDateTime)
        -> anyhow::Result<()>;
    async fn find(&self, email: &str, code: &str) -> anyhow::Result<Option<ResetCode>>;
    async fn delete(&self, email: &str) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .context("find user by email")?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find user by id")?;
        Ok(user)
    }

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> anyhow::Result<()> {
        sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.db)
            .await
            .context("update password hash")?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct PgResetCodeStore {
    db: PgPool,
}

impl PgResetCodeStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ResetCodeStore for PgResetCodeStore {
    async fn replace(
        &self,
        email: &str,
        code: &str,
        expires_at: OffsetDateTime,
    ) -> anyhow::Result<()> {
        // single statement; the primary key on email keeps one code per address
        sqlx::query(
            r#"
            INSERT INTO password_reset_codes (email, code, expires_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (email)
            DO UPDATE SET code = EXCLUDED.code,
                          expires_at = EXCLUDED.expires_at,
                          created_at = now()
            "#,
        )
        .bind(email)
        .bind(code)
        .bind(expires_at)
        .execute(&self.db)
        .await
        .context("upsert reset code")?;
        Ok(())
    }

    async fn find(&self, email: &str, code: &str) -> anyhow::Result<Option<ResetCode>> {
        let row = sqlx::query_as::<_, ResetCode>(
            r#"
            SELECT email, code, expires_at
              FROM password_reset_codes
             WHERE email = $1 AND code = $2
            "#,
        )
        .bind(email)
        .bind(code)
        .fetch_optional(&self.db)
        .await
        .context("find reset code")?;
        Ok(row)
    }

    async fn delete(&self, email: &str) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM password_reset_codes WHERE email = $1")
            .bind(email)
            .execute(&self.db)
            .await
            .context("delete reset code")?;
        Ok(())
    }
}
