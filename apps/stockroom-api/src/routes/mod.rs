//! HTTP routing.
//!
//! ```text
//! /health               GET
//! /products             GET  POST
//! /products/{id}        GET  PUT  DELETE
//! /sales                GET  POST
//! /sales/{id}           GET  PUT  DELETE
//! ```
//!
//! Request bodies are taken as raw JSON values; the services own all type
//! and shape checks.

pub mod products;
pub mod sales;

use std::sync::Arc;

use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;
use tower_http::trace::TraceLayer;
use tracing::debug;
use uuid::Uuid;

use crate::AppState;

/// Builds the application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/sales", get(sales::list_sales).post(sales::create_sale))
        .route(
            "/sales/{id}",
            get(sales::get_sale)
                .put(sales::update_sale)
                .delete(sales::delete_sale),
        )
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    request_id = %Uuid::new_v4(),
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    if state.db.health_check().await {
        (StatusCode::OK, "OK")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "Database unavailable")
    }
}

/// Unwraps a JSON request body, turning a rejected one into `null`.
///
/// Broken syntax or a missing content type then fails validation with the
/// same error as any other malformed input.
fn json_body(body: Result<Json<Value>, JsonRejection>) -> Value {
    match body {
        Ok(Json(value)) => value,
        Err(rejection) => {
            debug!(error = %rejection, "Unreadable JSON body");
            Value::Null
        }
    }
}
