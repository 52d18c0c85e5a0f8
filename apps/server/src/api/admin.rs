//! Operator endpoints: review queues and the manual accrual trigger.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tenorvest_core::{
    investments::AccrualRunReport,
    transactions::{DepositDecision, Transaction},
    withdrawals::{WithdrawalDecision, WithdrawalRequest},
};

use crate::{error::ApiResult, main_lib::AppState};

async fn pending_withdrawals(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<WithdrawalRequest>>> {
    Ok(Json(state.withdrawal_service.list_pending_withdrawals()?))
}

async fn resolve_withdrawal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(decision): Json<WithdrawalDecision>,
) -> ApiResult<Json<WithdrawalRequest>> {
    let request = state
        .withdrawal_service
        .resolve_withdrawal(&id, decision)
        .await?;
    Ok(Json(request))
}

async fn pending_deposits(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Transaction>>> {
    Ok(Json(state.account_service.list_pending_deposits()?))
}

async fn resolve_deposit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(decision): Json<DepositDecision>,
) -> ApiResult<Json<Transaction>> {
    let deposit = state.account_service.resolve_deposit(&id, decision).await?;
    Ok(Json(deposit))
}

async fn run_accrual(State(state): State<Arc<AppState>>) -> ApiResult<Json<AccrualRunReport>> {
    Ok(Json(state.accrual_service.run_accrual().await?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/withdrawals/pending", get(pending_withdrawals))
        .route("/admin/withdrawals/{id}/resolve", post(resolve_withdrawal))
        .route("/admin/deposits/pending", get(pending_deposits))
        .route("/admin/deposits/{id}/resolve", post(resolve_deposit))
        .route("/admin/accrual/run", post(run_accrual))
}
