//! # Stock Planning
//!
//! Decides which stock movements a sale causes.
//!
//! ## Policies
//! ```text
//! items: [{ product_id: 1, quantity: 2 }, { product_id: 2, quantity: 6 }, { product_id: 1, quantity: 3 }]
//!
//! FirstLineItem  ──►  [ -2 on product 1 ]
//! EveryLineItem  ──►  [ -5 on product 1, -6 on product 2 ]
//! ```
//!
//! `FirstLineItem` is the long-standing behaviour of the service and stays
//! the default. `EveryLineItem` aggregates per product so that a product
//! listed twice is checked against its combined quantity.
//!
//! Planning is pure. The database layer applies the plan inside a single
//! transaction, so a failed check on any adjustment leaves stock untouched.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ValidationError;
use crate::types::SaleItem;
use crate::validation::ValidationResult;

// =============================================================================
// Stock Policy
// =============================================================================

/// Which line-items of a sale are reconciled against stock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockPolicy {
    /// Only the first line-item is checked and moves stock.
    #[default]
    FirstLineItem,

    /// Every line-item is checked and moves stock, summed per product.
    EveryLineItem,
}

impl fmt::Display for StockPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockPolicy::FirstLineItem => write!(f, "first"),
            StockPolicy::EveryLineItem => write!(f, "every"),
        }
    }
}

/// Raised when a policy name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown stock policy '{0}' (expected 'first' or 'every')")]
pub struct UnknownStockPolicy(pub String);

impl FromStr for StockPolicy {
    type Err = UnknownStockPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" | "first_line_item" => Ok(StockPolicy::FirstLineItem),
            "every" | "every_line_item" => Ok(StockPolicy::EveryLineItem),
            other => Err(UnknownStockPolicy(other.to_string())),
        }
    }
}

// =============================================================================
// Stock Adjustment
// =============================================================================

/// A single stock movement: `quantity` units leave (or return to) a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockAdjustment {
    pub product_id: i64,
    pub quantity: i64,
}

/// Builds the stock movements a sale of `items` causes under `policy`.
///
/// The same plan is used in reverse when a sale is deleted, so whatever a
/// sale took is exactly what its deletion returns.
///
/// Adjustments keep the order in which each product first appears. A
/// combined quantity that does not fit in an `i64` is rejected as
/// [`ValidationError::InvalidLineItems`].
pub fn plan_adjustments(
    items: &[SaleItem],
    policy: StockPolicy,
) -> ValidationResult<Vec<StockAdjustment>> {
    match policy {
        StockPolicy::FirstLineItem => Ok(items
            .first()
            .map(|item| StockAdjustment {
                product_id: item.product_id,
                quantity: item.quantity,
            })
            .into_iter()
            .collect()),
        StockPolicy::EveryLineItem => {
            let mut plan: Vec<StockAdjustment> = Vec::with_capacity(items.len());
            for item in items {
                match plan.iter_mut().find(|adj| adj.product_id == item.product_id) {
                    Some(existing) => {
                        existing.quantity = existing
                            .quantity
                            .checked_add(item.quantity)
                            .ok_or(ValidationError::InvalidLineItems)?;
                    }
                    None => plan.push(StockAdjustment {
                        product_id: item.product_id,
                        quantity: item.quantity,
                    }),
                }
            }
            Ok(plan)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
