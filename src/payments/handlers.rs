use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use tracing::{error, instrument};

use super::dto::{DepositStatusQuery, DepositStatusResponse};
use crate::{
    auth::jwt::AuthUser,
    error::{AppError, AppResult},
    extract::ApiQuery,
    state::AppState,
};

pub fn payment_routes() -> Router<AppState> {
    Router::new().route("/deposits/status", get(deposit_status))
}

#[instrument(skip_all)]
pub async fn deposit_status(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    ApiQuery(q): ApiQuery<DepositStatusQuery>,
) -> AppResult<Json<DepositStatusResponse>> {
    let id = q
        .id
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation("ID do depósito é obrigatório".into()))?;

    let details = state.gateway.deposit_status(&id).await.map_err(|e| {
        error!(error = %e, user_id = %claims.user_id, deposit_id = %id, "deposit status lookup failed");
        AppError::Upstream(e.to_string())
    })?;
    Ok(Json(DepositStatusResponse::from_details(details)))
}
