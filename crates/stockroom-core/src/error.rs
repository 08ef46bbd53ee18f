//! # Error Types
//!
//! Domain-specific error types for stockroom-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockroom-core errors (this file)                                     │
//! │  ├── CoreError        - Business rule failures                         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  stockroom-db errors (separate crate)                                  │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  stockroom-api errors (in app)                                         │
//! │  └── ApiError         - What HTTP callers see ({err: {code, message}}) │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → HTTP response          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Messages
//! The `Display` text of every variant is the exact message callers
//! receive, so variants carry context in fields but keep the text fixed.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Selling would drive a product's stock below zero.
    ///
    /// ## User Workflow
    /// ```text
    /// POST /sales [{ product_id: 1, quantity: 100 }]
    ///      │
    ///      ▼
    /// Check stock: available=10
    ///      │
    ///      ▼
    /// InsufficientStock { product_id: 1, available: 10, requested: 100 }
    ///      │
    ///      ▼
    /// 404 { err: { code: "stock_problem", ... } }
    /// ```
    #[error("Such amount is not permitted to sell")]
    InsufficientStock {
        product_id: i64,
        available: i64,
        requested: i64,
    },

    /// Returning a deleted sale's stock would push a product past the
    /// largest storable quantity.
    #[error("Stock limit exceeded")]
    StockLimitExceeded { product_id: i64, available: i64, returned: i64 },

    /// Read on a sale id that matches no line-item.
    #[error("Sale not found")]
    SaleNotFound(String),

    /// Delete on a sale id that matches nothing.
    #[error("Wrong sale ID format")]
    UnknownSale(String),

    /// Read, update or delete on a product id that matches nothing.
    #[error("Wrong id format")]
    UnknownProduct(String),

    /// A product with the same name is already stocked.
    #[error("Product already exists")]
    ProductExists(String),

    /// Validation error (wraps ValidationError).
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur before any store is touched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A sale's line-item list is malformed.
    ///
    /// Deliberately uniform: callers are not told which element or field
    /// failed.
    #[error("Wrong product ID or invalid quantity")]
    InvalidLineItems,

    /// A required field is missing.
    #[error("\"{field}\" is required")]
    Required { field: String },

    /// A field that must be a string is not.
    #[error("\"{field}\" must be a string")]
    NotAString { field: String },

    /// A field that must be an integer is not.
    #[error("\"{field}\" must be a number")]
    NotANumber { field: String },

    /// Field value is too short.
    #[error("\"{field}\" length must be at least {min} characters long")]
    TooShort { field: String, min: usize },

    /// Numeric value is below the allowed minimum.
    #[error("\"{field}\" must be larger than or equal to {min}")]
    TooSmall { field: String, min: i64 },

    /// Numeric value is above the allowed maximum.
    #[error("\"{field}\" must be less than or equal to {max}")]
    TooLarge { field: String, max: i64 },
}

// =============================================================================
// Unit Tests
// =============================================================================
