use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;

use crate::auth::repo::{PgResetCodeStore, PgUserStore, ResetCodeStore, UserStore};
use crate::config::AppConfig;
use crate::payments::gateway::{HttpGateway, PaymentGateway};
use crate::wallet::repo::{PgWalletStore, WalletStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub reset_codes: Arc<dyn ResetCodeStore>,
    pub wallet: Arc<dyn WalletStore>,
    pub gateway: Arc<dyn PaymentGateway>,
}

impl AppState {
    /// Connects to Postgres and wires the production stores.
    pub async fn init(config: AppConfig) -> anyhow::Result<(Self, PgPool)> {
        let config = Arc::new(config);

        let db = sqlx::postgres::PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        let gateway = Arc::new(HttpGateway::new(&config.gateway)?) as Arc<dyn PaymentGateway>;

        let state = Self {
            users: Arc::new(PgUserStore::new(db.clone())),
            reset_codes: Arc::new(PgResetCodeStore::new(db.clone())),
            wallet: Arc::new(PgWalletStore::new(db.clone())),
            gateway,
            config,
        };
        Ok((state, db))
    }
}
