use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use time::OffsetDateTime;
use tracing::instrument;

use super::{
    dto::{
        ChangePasswordRequest, EmailRequest, ExistsResponse, LoginRequest, LoginResponse,
        MessageResponse, PublicUser, ResetPasswordRequest, ValidResponse, VerifyResetCodeRequest,
    },
    jwt::AuthUser,
    services::{AuthError, AuthService},
};
use crate::{
    error::{AppError, AppResult},
    extract::ApiJson,
    state::AppState,
};

pub const RESET_REQUESTED_MESSAGE: &str =
    "Se o email estiver cadastrado, você receberá um código de recuperação";
pub const PASSWORD_RESET_MESSAGE: &str = "Senha redefinida com sucesso";
pub const PASSWORD_CHANGED_MESSAGE: &str = "Senha alterada com sucesso";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Trimmed, non-empty field value.
fn present(field: Option<String>) -> Option<String> {
    field
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn email_field(field: Option<String>, missing: &str) -> AppResult<String> {
    let email = present(field)
        .map(|e| e.to_lowercase())
        .ok_or_else(|| AppError::Validation(missing.into()))?;
    if !is_valid_email(&email) {
        return Err(AppError::Validation("Email inválido".into()));
    }
    Ok(email)
}

/// Passwords are taken verbatim; only absence is checked here.
fn password_field(field: Option<String>, missing: &str) -> AppResult<String> {
    field
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::Validation(missing.into()))
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/check-email", post(check_email))
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/verify-reset-code", post(verify_reset_code))
        .route("/auth/reset-password", post(reset_password))
        .route("/auth/login", post(login))
        .route("/auth/change-password", post(change_password))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(auth, payload))]
pub async fn check_email(
    State(auth): State<AuthService>,
    ApiJson(payload): ApiJson<EmailRequest>,
) -> AppResult<Json<ExistsResponse>> {
    let email = email_field(payload.email, "Email é obrigatório")?;
    if auth.check_email(&email).await? {
        Ok(Json(ExistsResponse { exists: true }))
    } else {
        Err(AppError::NotFound("Email não encontrado".into()))
    }
}

#[instrument(skip(auth, payload))]
pub async fn forgot_password(
    State(auth): State<AuthService>,
    ApiJson(payload): ApiJson<EmailRequest>,
) -> AppResult<Json<MessageResponse>> {
    let email = present(payload.email)
        .map(|e| e.to_lowercase())
        .ok_or_else(|| AppError::Validation("Email é obrigatório".into()))?;
    auth.request_password_reset(&email, OffsetDateTime::now_utc())
        .await?;
    Ok(Json(MessageResponse {
        message: RESET_REQUESTED_MESSAGE,
    }))
}

#[instrument(skip(auth, payload))]
pub async fn verify_reset_code(
    State(auth): State<AuthService>,
    ApiJson(payload): ApiJson<VerifyResetCodeRequest>,
) -> AppResult<Json<ValidResponse>> {
    let (Some(email), Some(code)) = (present(payload.email), present(payload.code)) else {
        return Err(AppError::Validation("Email e código são obrigatórios".into()));
    };
    auth.verify_reset_code(&email.to_lowercase(), &code, OffsetDateTime::now_utc())
        .await?;
    Ok(Json(ValidResponse { valid: true }))
}

#[instrument(skip(auth, payload))]
pub async fn reset_password(
    State(auth): State<AuthService>,
    ApiJson(payload): ApiJson<ResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    let (Some(email), Some(code)) = (present(payload.email), present(payload.code)) else {
        return Err(AppError::Validation(
            "Email, código e nova senha são obrigatórios".into(),
        ));
    };
    let new_password = password_field(
        payload.new_password,
        "Email, código e nova senha são obrigatórios",
    )?;
    auth.reset_password(
        &email.to_lowercase(),
        &code,
        &new_password,
        OffsetDateTime::now_utc(),
    )
    .await?;
    Ok(Json(MessageResponse {
        message: PASSWORD_RESET_MESSAGE,
    }))
}

#[instrument(skip(auth, payload))]
pub async fn login(
    State(auth): State<AuthService>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    const MISSING: &str = "Email e senha são obrigatórios";
    let email = email_field(payload.email, MISSING)?;
    let password = password_field(payload.password, MISSING)?;

    let (token, user) = auth.login(&email, &password).await?;
    Ok(Json(LoginResponse { token, user }))
}

#[instrument(skip_all)]
pub async fn change_password(
    State(auth): State<AuthService>,
    AuthUser(claims): AuthUser,
    ApiJson(payload): ApiJson<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    const MISSING: &str = "Senha atual e nova senha são obrigatórias";
    let current = password_field(payload.current_password, MISSING)?;
    let new_password = password_field(payload.new_password, MISSING)?;

    auth.change_password(claims.user_id, &current, &new_password)
        .await
        .map_err(|e| match e {
            AuthError::InvalidCredentials => AppError::Validation("Senha atual incorreta".into()),
            other => other.into(),
        })?;
    Ok(Json(MessageResponse {
        message: PASSWORD_CHANGED_MESSAGE,
    }))
}

#[instrument(skip_all)]
pub async fn get_me(
    State(auth): State<AuthService>,
    AuthUser(claims): AuthUser,
) -> AppResult<Json<PublicUser>> {
    Ok(Json(auth.current_user(claims.user_id).await?))
}
