use anyhow::Context;
use secrecy::{ExposeSecret, SecretString};

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: SecretString,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Credentials for the external payment provider.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: url::Url,
    pub email: String,
    pub password: SecretString,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub gateway: GatewayConfig,
}

/// Seven days.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60 * 24 * 7;
/// One year.
pub const MAX_TOKEN_TTL_MINUTES: i64 = 60 * 24 * 365;

fn required(name: &str) -> anyhow::Result<String> {
    let value = std::env::var(name).with_context(|| format!("{name} must be set"))?;
    anyhow::ensure!(!value.trim().is_empty(), "{name} must not be empty");
    Ok(value)
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = required("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: SecretString::from(required("JWT_SECRET")?),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "tradedesk".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "tradedesk-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .filter(|v| (1..=MAX_TOKEN_TTL_MINUTES).contains(v))
                .unwrap_or(DEFAULT_TOKEN_TTL_MINUTES),
        };
        let gateway = GatewayConfig {
            base_url: required("PAYMENT_GATEWAY_URL")?
                .parse()
                .context("PAYMENT_GATEWAY_URL is not a valid URL")?,
            email: required("PAYMENT_GATEWAY_EMAIL")?,
            password: SecretString::from(required("PAYMENT_GATEWAY_PASSWORD")?),
        };
        Ok(Self {
            database_url,
            jwt,
            gateway,
        })
    }
}

impl JwtConfig {
    pub fn secret_bytes(&self) -> &[u8] {
        self.secret.expose_secret().as_bytes()
    }
}
