//! # Stockroom API
//!
//! JSON-over-HTTP server for product stock and sales.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Stockroom API Services                          │
//! │                                                                         │
//! │  ┌────────────────────┐            ┌────────────────────────────────┐  │
//! │  │  ProductService    │            │  SaleService                   │  │
//! │  │                    │            │                                │  │
//! │  │ • create           │            │ • create  (takes stock)        │  │
//! │  │ • read_all / by_id │            │ • read_all / read_by_id        │  │
//! │  │ • update           │            │ • update  (stock untouched)    │  │
//! │  │ • destroy          │            │ • destroy (returns stock)      │  │
//! │  └────────────────────┘            └────────────────────────────────┘  │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      Infrastructure                               │  │
//! │  │                                                                   │  │
//! │  │  ┌──────────────────────┐        ┌─────────────────────────────┐ │  │
//! │  │  │  SQLite (stockroom-db)│       │  axum Router + TraceLayer   │ │  │
//! │  │  └──────────────────────┘        └─────────────────────────────┘ │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `HTTP_HOST` - bind address (default: 0.0.0.0)
//! - `HTTP_PORT` - HTTP port (default: 3000)
//! - `DATABASE_PATH` - SQLite file (default: stockroom.db)
//! - `DB_MAX_CONNECTIONS` - pool size (default: 5)
//! - `STOCK_POLICY` - `first` or `every` (default: first)

pub mod config;
pub mod error;
pub mod routes;
pub mod services;

use std::sync::Arc;

// Re-exports
pub use config::StockroomConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use routes::build_router;
pub use services::{ProductService, SaleService};

use stockroom_core::StockPolicy;
use stockroom_db::Database;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub products: ProductService,
    pub sales: SaleService,
}

impl AppState {
    /// Wires both services onto one database handle.
    pub fn new(db: Database, policy: StockPolicy) -> Arc<Self> {
        Arc::new(AppState {
            products: ProductService::new(db.clone()),
            sales: SaleService::new(db.clone(), policy),
            db,
        })
    }
}
