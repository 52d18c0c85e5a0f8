use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tenorvest_core::investments::{InvestmentProduct, NewInvestmentProduct};

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductsQuery {
    #[serde(default)]
    active_only: bool,
}

async fn list_products(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProductsQuery>,
) -> ApiResult<Json<Vec<InvestmentProduct>>> {
    Ok(Json(
        state.investment_service.list_products(query.active_only)?,
    ))
}

async fn create_product(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewInvestmentProduct>,
) -> ApiResult<(StatusCode, Json<InvestmentProduct>)> {
    let product = state.investment_service.create_product(body).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/products", get(list_products).post(create_product))
}
