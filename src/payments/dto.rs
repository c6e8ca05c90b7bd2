use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct DepositStatusQuery {
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DepositStatusResponse {
    pub status: String,
    pub details: Value,
}

impl DepositStatusResponse {
    /// `status` mirrors the provider's own `status` field when it is a string.
    pub fn from_details(details: Value) -> Self {
        let status = details
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        Self { status, details }
    }
}
