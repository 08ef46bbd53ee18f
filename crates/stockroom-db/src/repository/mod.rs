//! # Repository Module
//!
//! Database repository implementations for Stockroom.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Two ways into the same SQL                           │
//! │                                                                         │
//! │  Service                                                               │
//! │    │                                                                    │
//! │    ├── db.products() / db.sales()     one pooled connection per call   │
//! │    │        │                                                           │
//! │    │        ▼                                                           │
//! │    │   ProductRepository / SaleRepository                              │
//! │    │        │                                                           │
//! │    └── db.begin()                     one transaction until commit     │
//! │             │                                                           │
//! │             ▼                                                           │
//! │        StockTransaction                                                │
//! │             │                                                           │
//! │             ▼                                                           │
//! │   Shared statement functions taking `&mut SqliteConnection`            │
//! │   (product::fetch_by_id, product::take_stock, sale::insert_sale, ...)  │
//! │             │                                                           │
//! │             ▼                                                           │
//! │        SQLite Database                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Product CRUD
//! - [`sale::SaleRepository`] - Sale headers and line-items
//! - [`unit_of_work::StockTransaction`] - Stock + sale writes in one transaction

pub mod product;
pub mod sale;
pub mod unit_of_work;
