use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    dto::Pagination,
    repo_types::{Deposit, Withdrawal},
};

/// Read access to a user's transaction history.
#[async_trait]
pub trait WalletStore: Send + Sync {
    /// One page of withdrawals, newest first, and the user's total count.
    async fn list_withdrawals(
        &self,
        user_id: Uuid,
        page: &Pagination,
    ) -> anyhow::Result<(Vec<Withdrawal>, i64)>;

    async fn list_deposits(
        &self,
        user_id: Uuid,
        page: &Pagination,
    ) -> anyhow::Result<(Vec<Deposit>, i64)>;
}

#[derive(Clone)]
pub struct PgWalletStore {
    db: PgPool,
}

impl PgWalletStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WalletStore for PgWalletStore {
    async fn list_withdrawals(
        &self,
        user_id: Uuid,
        page: &Pagination,
    ) -> anyhow::Result<(Vec<Withdrawal>, i64)> {
        let rows = sqlx::query_as::<_, Withdrawal>(
            r#"
            SELECT id, amount, method, status, created_at
              FROM withdrawals
             WHERE user_id = $1
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.db)
        .await
        .context("list withdrawals")?;

        let (total,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM withdrawals WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.db)
                .await
                .context("count withdrawals")?;

        Ok((rows, total))
    }

    async fn list_deposits(
        &self,
        user_id: Uuid,
        page: &Pagination,
    ) -> anyhow::Result<(Vec<Deposit>, i64)> {
        let rows = sqlx::query_as::<_, Deposit>(
            r#"
            SELECT id, amount, gateway_id, status, created_at
              FROM deposits
             WHERE user_id = $1
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.db)
        .await
        .context("list deposits")?;

        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM deposits WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.db)
            .await
            .context("count deposits")?;

        Ok((rows, total))
    }
}
