use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, instrument};
use url::Url;

use super::session::{Session, TokenStorage};
use crate::auth::dto::PublicUser;
use crate::payments::gateway::APP_USER_AGENT;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("{message}")]
    Api { status: StatusCode, message: String },
    #[error("session storage: {0}")]
    Storage(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct LoginBody {
    token: String,
    user: PublicUser,
}

/// HTTP client bound to one session. Authenticated calls carry the stored
/// bearer token.
pub struct ApiClient<S: TokenStorage> {
    http: Client,
    base_url: Url,
    session: Session<S>,
}

impl<S: TokenStorage> ApiClient<S> {
    pub fn new(base_url: &str, session: Session<S>) -> Result<Self, ClientError> {
        let mut base_url: Url = base_url.parse()?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http = Client::builder().user_agent(APP_USER_AGENT).build()?;
        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let url = self.base_url.join(path.trim_start_matches('/'))?;
        let req = self.http.request(method, url);
        Ok(match self.session.token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        })
    }

    async fn send(req: RequestBuilder) -> Result<Value, ClientError> {
        let response = req.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        let body: Value = response.json().await.unwrap_or(Value::Null);
        let message = body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed"))
            .to_string();
        Err(ClientError::Api { status, message })
    }

    /// Logs in and begins the session.
    #[instrument(skip(self, password))]
    pub async fn login(&mut self, email: &str, password: &str) -> Result<PublicUser, ClientError> {
        let req = self
            .request(Method::POST, "api/v1/auth/login")?
            .json(&json!({ "email": email, "password": password }));
        let body: LoginBody = serde_json::from_value(Self::send(req).await?)?;
        self.session.begin(&body.token, &body.user)?;
        debug!(user_id = %body.user.id, "session started");
        Ok(body.user)
    }

    pub fn logout(&mut self) {
        self.session.logout();
    }

    pub async fn me(&self) -> Result<PublicUser, ClientError> {
        let body = Self::send(self.request(Method::GET, "api/v1/me")?).await?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn withdrawals(&self, limit: i64, offset: i64) -> Result<Value, ClientError> {
        let req = self
            .request(Method::GET, "api/v1/wallet/withdrawals")?
            .query(&[("limit", limit), ("offset", offset)]);
        Self::send(req).await
    }

    pub async fn deposit_status(&self, deposit_id: &str) -> Result<Value, ClientError> {
        let req = self
            .request(Method::GET, "api/v1/deposits/status")?
            .query(&[("id", deposit_id)]);
        Self::send(req).await
    }
}
