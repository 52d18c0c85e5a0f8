use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tenorvest_core::investments::{ClaimReceipt, Investment, InvestmentValuation};

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OpenInvestmentBody {
    product_id: String,
}

async fn list_investments(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Investment>>> {
    Ok(Json(state.investment_service.list_investments(&id)?))
}

async fn open_investment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<OpenInvestmentBody>,
) -> ApiResult<(StatusCode, Json<Investment>)> {
    let investment = state
        .investment_service
        .open_investment(&id, &body.product_id)
        .await?;
    Ok((StatusCode::CREATED, Json(investment)))
}

async fn get_value(
    State(state): State<Arc<AppState>>,
    Path((id, investment_id)): Path<(String, String)>,
) -> ApiResult<Json<InvestmentValuation>> {
    Ok(Json(
        state
            .investment_service
            .compute_current_value(&id, &investment_id)?,
    ))
}

async fn claim_profit(
    State(state): State<Arc<AppState>>,
    Path((id, investment_id)): Path<(String, String)>,
) -> ApiResult<Json<ClaimReceipt>> {
    let receipt = state
        .investment_service
        .claim_profit(&id, &investment_id)
        .await?;
    Ok(Json(receipt))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/accounts/{id}/investments",
            get(list_investments).post(open_investment),
        )
        .route(
            "/accounts/{id}/investments/{investment_id}/value",
            get(get_value),
        )
        .route(
            "/accounts/{id}/investments/{investment_id}/claim",
            post(claim_profit),
        )
}
