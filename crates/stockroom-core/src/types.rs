//! # Domain Types
//!
//! Core domain types used throughout Stockroom.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │   Sale header   │   │    SaleItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (integer)   │   │  id (integer)   │   │  product_id     │       │
//! │  │  name           │◄──│  date           │──►│  quantity       │       │
//! │  │  quantity       │   │                 │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  SaleLine = one sale header joined with one of its line-items          │
//! │  { id, date, product_id, quantity }                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every id is an integer generated by the store on insert. Line-items
//! reference products by id only; there is no ownership between the two.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Product
// =============================================================================

/// A product held in stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Store-generated identifier.
    pub id: i64,

    /// Display name. Unique across products.
    pub name: String,

    /// Units available for sale. Never driven below zero by a sale.
    pub quantity: i64,
}

/// Validated input for creating or overwriting a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub quantity: i64,
}

// =============================================================================
// Sale Item
// =============================================================================

/// One `{product_id, quantity}` entry of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleItem {
    pub product_id: i64,
    pub quantity: i64,
}

impl SaleItem {
    pub fn new(product_id: i64, quantity: i64) -> Self {
        SaleItem {
            product_id,
            quantity,
        }
    }
}

// =============================================================================
// Sale Line
// =============================================================================

/// A sale header joined with one of its line-items.
///
/// A sale with N items reads back as N lines sharing `id` and `date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleLine {
    /// The sale id.
    pub id: i64,
    /// When the sale was recorded.
    pub date: DateTime<Utc>,
    pub product_id: i64,
    pub quantity: i64,
}

impl SaleLine {
    /// Returns the line-item part of this row.
    #[inline]
    pub fn item(&self) -> SaleItem {
        SaleItem::new(self.product_id, self.quantity)
    }
}

// =============================================================================
// Sale Receipt
// =============================================================================

/// What create and update hand back: the sale id and the items submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleReceipt {
    pub id: i64,
    #[serde(rename = "itemsSold")]
    pub items_sold: Vec<SaleItem>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_serializes_items_sold() {
        let receipt = SaleReceipt {
            id: 7,
            items_sold: vec![SaleItem::new(1, 2)],
        };
        let json = serde_json::to_value(&receipt).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["itemsSold"][0]["product_id"], 1);
        assert_eq!(json["itemsSold"][0]["quantity"], 2);
    }

    #[test]
    fn test_sale_line_item() {
        let line = SaleLine {
            id: 3,
            date: Utc::now(),
            product_id: 9,
            quantity: 4,
        };
        assert_eq!(line.item(), SaleItem::new(9, 4));
    }
}
