//! # API Error Type
//!
//! Unified error type for HTTP handlers and services.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Stockroom                              │
//! │                                                                         │
//! │  Client                      Rust Backend                               │
//! │  ──────                      ────────────                               │
//! │                                                                         │
//! │  POST /sales                                                            │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Handler → Service                                               │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Bad line-items? ─── CoreError::Validation ─────────┐           │  │
//! │  │         │                                            │           │  │
//! │  │         ▼                                            ▼           │  │
//! │  │  Not enough stock? ── CoreError::InsufficientStock ── ApiError ─►│  │
//! │  │         │                                            ▲           │  │
//! │  │         ▼                                            │           │  │
//! │  │  SQLite failure? ──── DbError ── (logged) ───────────┘           │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ◄── 404 { "err": { "code": "stock_problem",                          │
//! │                     "message": "Such amount is not permitted to sell" } }
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use stockroom_core::{CoreError, ValidationError};
use stockroom_db::DbError;

/// Error returned by every failing request.
///
/// ## Serialization
/// Wrapped in an `err` envelope on the wire:
/// ```json
/// {
///   "err": {
///     "code": "invalid_data",
///     "message": "Wrong product ID or invalid quantity"
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Malformed input or unknown id on write (422)
    InvalidData,

    /// Stock would leave its allowed range (404)
    StockProblem,

    /// Sale not found on read (404)
    NotFound,

    /// Storage failure (500)
    Internal,
}

impl ErrorCode {
    /// HTTP status for this code.
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::InvalidData => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::StockProblem => StatusCode::NOT_FOUND,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

/// Result type for handlers and services.
pub type ApiResult<T> = Result<T, ApiError>;

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::InsufficientStock { .. } | CoreError::StockLimitExceeded { .. } => {
                ErrorCode::StockProblem
            }
            CoreError::SaleNotFound(_) => ErrorCode::NotFound,
            CoreError::UnknownSale(_)
            | CoreError::UnknownProduct(_)
            | CoreError::ProductExists(_)
            | CoreError::Validation(_) => ErrorCode::InvalidData,
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        CoreError::from(err).into()
    }
}

/// Converts database errors to API errors.
///
/// Callers never see storage details; the cause is logged here.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match &err {
            DbError::PoolExhausted | DbError::ConnectionFailed(_) => {
                tracing::error!(error = %err, "Database unavailable");
            }
            _ => {
                tracing::error!(error = %err, "Database operation failed");
            }
        }
        ApiError::internal("Internal server error")
    }
}

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    err: &'a ApiError,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorEnvelope { err: &self })).into_response()
    }
}
