use std::sync::Arc;

use axum::extract::FromRef;
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::PublicUser,
    jwt::JwtKeys,
    password::{hash_password, is_strong_enough, verify_password},
    repo::{ResetCodeStore, UserStore},
    reset_code,
};
use crate::{error::AppError, state::AppState};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Credenciais inválidas")]
    InvalidCredentials,
    #[error("Código inválido ou expirado")]
    InvalidOrExpiredCode,
    #[error("A senha deve ter pelo menos 6 caracteres")]
    WeakPassword,
    #[error("Usuário não encontrado")]
    UserNotFound,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials => AppError::Unauthorized(e.to_string()),
            AuthError::InvalidOrExpiredCode | AuthError::WeakPassword => {
                AppError::Validation(e.to_string())
            }
            AuthError::UserNotFound => AppError::NotFound(e.to_string()),
            AuthError::Store(inner) => AppError::Internal(inner),
        }
    }
}

/// Credential checks, token issuance and the reset-code lifecycle.
#[derive(Clone)]
pub struct AuthService {
    pub users: Arc<dyn UserStore>,
    pub codes: Arc<dyn ResetCodeStore>,
    pub keys: JwtKeys,
}

impl FromRef<AppState> for AuthService {
    fn from_ref(state: &AppState) -> Self {
        Self {
            users: state.users.clone(),
            codes: state.reset_codes.clone(),
            keys: JwtKeys::from_ref(state),
        }
    }
}

impl AuthService {
    pub async fn login(&self, email: &str, password: &str) -> Result<(String, PublicUser), AuthError> {
        let Some(user) = self.users.find_by_email(email).await? else {
            warn!(email = %email, "login unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash)? {
            warn!(email = %email, user_id = %user.id, "login invalid password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.keys.sign(&user)?;
        info!(user_id = %user.id, email = %user.email, "user logged in");
        Ok((token, user.into()))
    }

    pub async fn check_email(&self, email: &str) -> Result<bool, AuthError> {
        Ok(self.users.find_by_email(email).await?.is_some())
    }

    /// Issues a fresh code when the account exists. The outcome is not
    /// reported to the caller.
    pub async fn request_password_reset(
        &self,
        email: &str,
        now: OffsetDateTime,
    ) -> Result<(), AuthError> {
        if self.users.find_by_email(email).await?.is_none() {
            info!(email = %email, "password reset requested for unknown email");
            return Ok(());
        }

        let code = reset_code::generate();
        self.codes
            .replace(email, &code, now + reset_code::CODE_TTL)
            .await?;
        // delivery is not wired up; the code only reaches the logs
        info!(email = %email, code = %code, "password reset code issued");
        Ok(())
    }

    pub async fn verify_reset_code(
        &self,
        email: &str,
        code: &str,
        now: OffsetDateTime,
    ) -> Result<(), AuthError> {
        let code = reset_code::normalize(code);
        match self.codes.find(email, &code).await? {
            Some(row) if !row.is_expired(now) => Ok(()),
            Some(_) => {
                warn!(email = %email, "expired reset code");
                Err(AuthError::InvalidOrExpiredCode)
            }
            None => {
                warn!(email = %email, "unknown reset code");
                Err(AuthError::InvalidOrExpiredCode)
            }
        }
    }

    pub async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
        now: OffsetDateTime,
    ) -> Result<(), AuthError> {
        self.verify_reset_code(email, code, now).await?;
        if !is_strong_enough(new_password) {
            return Err(AuthError::WeakPassword);
        }

        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        let hash = hash_password(new_password)?;
        self.users.update_password_hash(user.id, &hash).await?;
        self.codes.delete(email).await?;

        info!(user_id = %user.id, "password reset");
        Ok(())
    }

    pub async fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !verify_password(current_password, &user.password_hash)? {
            warn!(user_id = %user_id, "change password with wrong current password");
            return Err(AuthError::InvalidCredentials);
        }
        if !is_strong_enough(new_password) {
            return Err(AuthError::WeakPassword);
        }

        let hash = hash_password(new_password)?;
        self.users.update_password_hash(user.id, &hash).await?;
        info!(user_id = %user_id, "password changed");
        Ok(())
    }

    pub async fn current_user(&self, user_id: Uuid) -> Result<PublicUser, AuthError> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(PublicUser::from)
            .ok_or(AuthError::UserNotFound)
    }
}
