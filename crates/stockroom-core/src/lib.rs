//! # stockroom-core: Pure Business Logic for Stockroom
//!
//! This crate is the **heart** of Stockroom. It contains the inventory and
//! sale rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP API (axum)                              │   │
//! │  │    /products ──► ProductService    /sales ──► SaleService       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ stockroom-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   stock   │  │   error   │  │ validation│  │   │
//! │  │   │  Product  │  │  policy   │  │ CoreError │  │ line-items│  │   │
//! │  │   │  SaleLine │  │  planning │  │           │  │  products │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  stockroom-db (Database Layer)                  │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, SaleItem, SaleLine, ...)
//! - [`stock`] - Which line-items of a sale move stock, and by how much
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation for sale line-items and products
//!
//! ## Example Usage
//!
//! ```rust
//! use serde_json::json;
//! use stockroom_core::stock::{plan_adjustments, StockPolicy};
//! use stockroom_core::validation::validate_sale_items;
//!
//! let items = validate_sale_items(&json!([
//!     { "product_id": 1, "quantity": 2 },
//!     { "product_id": 2, "quantity": 6 }
//! ]))
//! .unwrap();
//!
//! // By default only the first line-item moves stock
//! let plan = plan_adjustments(&items, StockPolicy::FirstLineItem).unwrap();
//! assert_eq!(plan.len(), 1);
//! assert_eq!(plan[0].quantity, 2);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod stock;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use stock::{StockAdjustment, StockPolicy};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minimum number of characters in a product name.
pub const MIN_PRODUCT_NAME_LEN: usize = 5;

/// Smallest quantity a sale line-item may carry.
pub const MIN_LINE_ITEM_QUANTITY: i64 = 1;

/// Largest quantity accepted as product stock or on a sale line-item.
///
/// Keeps every sum of validated quantities well inside `i64`.
pub const MAX_QUANTITY: i64 = 1_000_000_000;
