//! `/sales` handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use super::json_body;
use crate::error::{ApiError, ApiResult};
use crate::AppState;
use stockroom_core::validation::parse_id;
use stockroom_core::{CoreError, SaleLine, SaleReceipt};

#[derive(Debug, Serialize)]
pub struct SaleList {
    pub sales: Vec<SaleLine>,
}

pub async fn list_sales(State(state): State<Arc<AppState>>) -> ApiResult<Json<SaleList>> {
    let sales = state.sales.read_all().await?;
    Ok(Json(SaleList { sales }))
}

pub async fn create_sale(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<SaleReceipt>> {
    Ok(Json(state.sales.create(&json_body(body)).await?))
}

pub async fn get_sale(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<SaleLine>>> {
    let id = parse_id(&id).ok_or_else(|| ApiError::from(CoreError::SaleNotFound(id.clone())))?;
    Ok(Json(state.sales.read_by_id(id).await?))
}

pub async fn update_sale(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<SaleReceipt>> {
    let id = parse_id(&id).ok_or_else(|| ApiError::from(CoreError::UnknownSale(id.clone())))?;
    Ok(Json(state.sales.update(id, &json_body(body)).await?))
}

pub async fn delete_sale(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<SaleLine>>> {
    let id = parse_id(&id).ok_or_else(|| ApiError::from(CoreError::UnknownSale(id.clone())))?;
    Ok(Json(state.sales.destroy(id).await?))
}
