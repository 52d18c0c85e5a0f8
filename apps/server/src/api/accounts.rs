use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use tenorvest_core::{
    accounts::{LedgerAccount, NewLedgerAccount},
    investments::InvestmentSummary,
    transactions::{NewDeposit, Transaction},
    withdrawals::EligibilityBreakdown,
};

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WithdrawalPasswordBody {
    current_password: Option<String>,
    new_password: String,
}

async fn create_account(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewLedgerAccount>,
) -> ApiResult<(StatusCode, Json<LedgerAccount>)> {
    let account = state.account_service.create_account(body).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

async fn get_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<LedgerAccount>> {
    Ok(Json(state.account_service.get_account(&id)?))
}

async fn set_withdrawal_password(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<WithdrawalPasswordBody>,
) -> ApiResult<StatusCode> {
    state
        .account_service
        .set_withdrawal_password(&id, body.current_password, body.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_eligibility(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<EligibilityBreakdown>> {
    Ok(Json(state.withdrawal_service.compute_eligibility(&id)?))
}

async fn get_summary(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<InvestmentSummary>> {
    Ok(Json(state.investment_service.investment_summary(&id)?))
}

async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Transaction>>> {
    Ok(Json(state.account_service.list_transactions(&id)?))
}

async fn submit_deposit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<NewDeposit>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let deposit = state.account_service.submit_deposit(&id, body).await?;
    Ok((StatusCode::CREATED, Json(deposit)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/accounts", post(create_account))
        .route("/accounts/{id}", get(get_account))
        .route(
            "/accounts/{id}/withdrawal-password",
            put(set_withdrawal_password),
        )
        .route("/accounts/{id}/eligibility", get(get_eligibility))
        .route("/accounts/{id}/summary", get(get_summary))
        .route("/accounts/{id}/transactions", get(list_transactions))
        .route("/accounts/{id}/deposits", post(submit_deposit))
}
