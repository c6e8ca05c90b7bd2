use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use tracing::{debug, error, instrument};
use url::Url;

use crate::config::GatewayConfig;

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("invalid gateway url: {0}")]
    Url(String),
    #[error("gateway authentication failed: {0}")]
    Auth(String),
    #[error("gateway request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("gateway returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected gateway response: {0}")]
    Decode(String),
}

/// External payment provider.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Raw transaction details for a deposit, as reported by the provider.
    async fn deposit_status(&self, deposit_id: &str) -> Result<Value, GatewayError>;
}

/// Logs in and forwards each query. Tokens are not cached and failures are
/// not retried.
pub struct HttpGateway {
    client: Client,
    base_url: Url,
    email: String,
    password: SecretString,
}

impl HttpGateway {
    pub fn new(cfg: &GatewayConfig) -> anyhow::Result<Self> {
        let client = Client::builder().user_agent(APP_USER_AGENT).build()?;
        Ok(Self {
            client,
            base_url: cfg.base_url.clone(),
            email: cfg.email.clone(),
            password: cfg.password.clone(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::Url(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    #[instrument(skip(self))]
    async fn authenticate(&self) -> Result<String, GatewayError> {
        let url = self.endpoint(&["login"])?;
        let response = self
            .client
            .post(url)
            .json(&json!({
                "email": self.email,
                "password": self.password.expose_secret(),
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, "gateway login rejected");
            return Err(GatewayError::Auth(format!("{status}: {body}")));
        }

        let body: Value = response.json().await?;
        body.get("token")
            .or_else(|| body.get("access_token"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| GatewayError::Decode("login response has no token".into()))
    }
}

#[async_trait]
impl PaymentGateway for HttpGateway {
    #[instrument(skip(self))]
    async fn deposit_status(&self, deposit_id: &str) -> Result<Value, GatewayError> {
        let token = self.authenticate().await?;
        let url = self.endpoint(&["transactions", deposit_id])?;
        debug!(%url, "querying gateway");

        let response = self.client.get(url).bearer_auth(token).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}
