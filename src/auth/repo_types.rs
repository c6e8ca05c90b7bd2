use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Real-money or practice account.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "account_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Real,
    Demo,
}

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 PHC string, never exposed
    pub name: String,
    pub account_type: AccountType,
    pub balance: f64,
    pub demo_balance: f64,
    pub bonus_balance: f64,
    pub is_verified: bool,
    pub kyc_approved: bool,
    pub created_at: OffsetDateTime,
}

/// One-time password reset code. At most one row per email.
#[derive(Debug, Clone, FromRow)]
pub struct ResetCode {
    pub email: String,
    pub code: String,
    pub expires_at: OffsetDateTime,
}

impl ResetCode {
    /// A code is still usable at the exact expiry instant.
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        now > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{macros::datetime, Duration};

    fn code_expiring_at(expires_at: OffsetDateTime) -> ResetCode {
        ResetCode {
            email: "a@x.com".into(),
            code: "A1B2C3".into(),
            expires_at,
        }
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let at = datetime!(2026-03-01 12:00 UTC);
        let code = code_expiring_at(at);
        assert!(!code.is_expired(at - Duration::seconds(1)));
        assert!(!code.is_expired(at));
        assert!(code.is_expired(at + Duration::nanoseconds(1)));
    }

    #[test]
    fn user_json_never_contains_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            email: "trader@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            name: "Trader".into(),
            account_type: AccountType::Demo,
            balance: 0.0,
            demo_balance: 10_000.0,
            bonus_balance: 0.0,
            is_verified: true,
            kyc_approved: false,
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"accountType\":\"demo\""));
    }
}
