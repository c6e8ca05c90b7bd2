use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::dto::{DepositsResponse, Pagination, WithdrawalsResponse};
use crate::{auth::jwt::AuthUser, error::AppResult, extract::ApiQuery, state::AppState};

pub fn wallet_routes() -> Router<AppState> {
    Router::new()
        .route("/wallet/withdrawals", get(list_withdrawals))
        .route("/wallet/deposits", get(list_deposits))
}

#[instrument(skip_all)]
pub async fn list_withdrawals(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    ApiQuery(p): ApiQuery<Pagination>,
) -> AppResult<Json<WithdrawalsResponse>> {
    let (withdrawals, total) = state
        .wallet
        .list_withdrawals(claims.user_id, &p.clamped())
        .await?;
    Ok(Json(WithdrawalsResponse { withdrawals, total }))
}

#[instrument(skip_all)]
pub async fn list_deposits(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    ApiQuery(p): ApiQuery<Pagination>,
) -> AppResult<Json<DepositsResponse>> {
    let (deposits, total) = state
        .wallet
        .list_deposits(claims.user_id, &p.clamped())
        .await?;
    Ok(Json(DepositsResponse { deposits, total }))
}
