use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tenorvest_core::withdrawals::{NewWithdrawalRequest, WithdrawalRequest};

use crate::{error::ApiResult, main_lib::AppState};

async fn list_withdrawals(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<WithdrawalRequest>>> {
    Ok(Json(state.withdrawal_service.list_withdrawals(&id)?))
}

async fn submit_withdrawal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<NewWithdrawalRequest>,
) -> ApiResult<(StatusCode, Json<WithdrawalRequest>)> {
    let request = state.withdrawal_service.submit_withdrawal(&id, body).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/accounts/{id}/withdrawals",
        get(list_withdrawals).post(submit_withdrawal),
    )
}
