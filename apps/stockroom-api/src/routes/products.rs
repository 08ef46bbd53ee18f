//! `/products` handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use super::json_body;
use crate::error::{ApiError, ApiResult};
use crate::AppState;
use stockroom_core::validation::parse_id;
use stockroom_core::{CoreError, Product};

#[derive(Debug, Serialize)]
pub struct ProductList {
    pub products: Vec<Product>,
}

/// Non-numeric ids answer like ids that match nothing.
fn product_id(raw: &str) -> ApiResult<i64> {
    parse_id(raw).ok_or_else(|| ApiError::from(CoreError::UnknownProduct(raw.to_string())))
}

pub async fn list_products(State(state): State<Arc<AppState>>) -> ApiResult<Json<ProductList>> {
    let products = state.products.read_all().await?;
    Ok(Json(ProductList { products }))
}

pub async fn create_product(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let product = state.products.create(&json_body(body)).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    let id = product_id(&id)?;
    Ok(Json(state.products.read_by_id(id).await?))
}

pub async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Product>> {
    let id = product_id(&id)?;
    Ok(Json(state.products.update(id, &json_body(body)).await?))
}

pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    let id = product_id(&id)?;
    Ok(Json(state.products.destroy(id).await?))
}
