//! # Validation Module
//!
//! Input validation for Stockroom requests.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler                                                 │
//! │  └── Unreadable or non-JSON bodies are passed on as null               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Works on the raw serde_json::Value                                │
//! │  ├── Wrong types become ValidationError, not parse rejections          │
//! │  └── Produces typed SaleItem / NewProduct values                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── Foreign key sales_products.sale_id → sales.id                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use serde_json::json;
//! use stockroom_core::validation::validate_sale_items;
//!
//! assert!(validate_sale_items(&json!([{ "product_id": 1, "quantity": 2 }])).is_ok());
//! assert!(validate_sale_items(&json!([{ "product_id": 1, "quantity": 0 }])).is_err());
//! ```

use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::types::{NewProduct, SaleItem};
use crate::{MAX_QUANTITY, MIN_LINE_ITEM_QUANTITY, MIN_PRODUCT_NAME_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const LINE_ITEM_FIELDS: [&str; 2] = ["product_id", "quantity"];

// =============================================================================
// Sale Line-Items
// =============================================================================

/// Validates the line-item list of a sale.
///
/// ## Rules
/// - Must be a non-empty JSON array
/// - Every element is an object with exactly `product_id` and `quantity`
/// - `product_id` is an integer
/// - `quantity` is an integer, at least 1 and at most [`MAX_QUANTITY`]
///
/// Any violation yields [`ValidationError::InvalidLineItems`]; the caller
/// is never told which field failed.
///
/// ## Example
/// ```rust
/// use serde_json::json;
/// use stockroom_core::validation::validate_sale_items;
///
/// let items = validate_sale_items(&json!([
///     { "product_id": 1, "quantity": 2 },
///     { "product_id": 1, "quantity": 6 }
/// ]))
/// .unwrap();
/// assert_eq!(items.len(), 2);
///
/// assert!(validate_sale_items(&json!([])).is_err());
/// assert!(validate_sale_items(&json!([{ "product_id": 1, "quantity": "String" }])).is_err());
/// ```
pub fn validate_sale_items(value: &Value) -> ValidationResult<Vec<SaleItem>> {
    let elements = value
        .as_array()
        .filter(|elements| !elements.is_empty())
        .ok_or(ValidationError::InvalidLineItems)?;

    elements
        .iter()
        .map(|element| line_item(element).ok_or(ValidationError::InvalidLineItems))
        .collect()
}

fn line_item(element: &Value) -> Option<SaleItem> {
    let fields = element.as_object()?;

    if fields.keys().any(|key| !LINE_ITEM_FIELDS.contains(&key.as_str())) {
        return None;
    }

    let product_id = fields.get("product_id")?.as_i64()?;
    let quantity = fields.get("quantity")?.as_i64()?;

    if !(MIN_LINE_ITEM_QUANTITY..=MAX_QUANTITY).contains(&quantity) {
        return None;
    }

    Some(SaleItem::new(product_id, quantity))
}

// =============================================================================
// Products
// =============================================================================

/// Validates a product body (`{name, quantity}`).
///
/// ## Rules
/// - `name`: string, at least [`MIN_PRODUCT_NAME_LEN`] characters
/// - `quantity`: integer, zero up to [`MAX_QUANTITY`]
///
/// Fields are checked in that order and the first failure is reported.
pub fn validate_new_product(value: &Value) -> ValidationResult<NewProduct> {
    let empty = Map::new();
    let fields = value.as_object().unwrap_or(&empty);

    let name = validate_product_name(fields.get("name"))?;
    let quantity = validate_stock_quantity(fields.get("quantity"))?;

    Ok(NewProduct { name, quantity })
}

/// Validates a product name.
pub fn validate_product_name(value: Option<&Value>) -> ValidationResult<String> {
    let name = match value {
        None | Some(Value::Null) => {
            return Err(ValidationError::Required {
                field: "name".to_string(),
            })
        }
        Some(Value::String(name)) => name,
        Some(_) => {
            return Err(ValidationError::NotAString {
                field: "name".to_string(),
            })
        }
    };

    if name.chars().count() < MIN_PRODUCT_NAME_LEN {
        return Err(ValidationError::TooShort {
            field: "name".to_string(),
            min: MIN_PRODUCT_NAME_LEN,
        });
    }

    Ok(name.clone())
}

/// Validates a stock quantity.
pub fn validate_stock_quantity(value: Option<&Value>) -> ValidationResult<i64> {
    let quantity = match value {
        None | Some(Value::Null) => {
            return Err(ValidationError::Required {
                field: "quantity".to_string(),
            })
        }
        Some(value) => value.as_i64().ok_or_else(|| ValidationError::NotANumber {
            field: "quantity".to_string(),
        })?,
    };

    if quantity < 0 {
        return Err(ValidationError::TooSmall {
            field: "quantity".to_string(),
            min: 0,
        });
    }

    if quantity > MAX_QUANTITY {
        return Err(ValidationError::TooLarge {
            field: "quantity".to_string(),
            max: MAX_QUANTITY,
        });
    }

    Ok(quantity)
}

// =============================================================================
// Identifiers
// =============================================================================

/// Parses an id taken from a URL path segment.
///
/// Returns `None` for anything that is not a plain integer; callers treat
/// that exactly like an id that matches no record.
pub fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_sale_items() {
        let items = validate_sale_items(&json!([
            { "product_id": 1, "quantity": 2 },
            { "product_id": 2, "quantity": 6 }
        ]))
        .unwrap();
        assert_eq!(items, vec![SaleItem::new(1, 2), SaleItem::new(2, 6)]);
    }

    #[test]
    fn test_validate_sale_items_rejects_bad_quantities() {
        let invalid = [
            json!([{ "product_id": 1, "quantity": -1 }]),
            json!([{ "product_id": 1, "quantity": 0 }]),
            json!([{ "product_id": 1, "quantity": "String" }]),
            json!([{ "product_id": 1, "quantity": 1.5 }]),
            json!([{ "product_id": 1, "quantity": MAX_QUANTITY + 1 }]),
            json!([{ "product_id": 1, "quantity": i64::MAX }]),
            json!([{ "product_id": 1 }]),
        ];

        for body in &invalid {
            assert_eq!(
                validate_sale_items(body),
                Err(ValidationError::InvalidLineItems),
                "{body} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_sale_items_rejects_bad_shapes() {
        let invalid = [
            json!([]),
            json!({ "product_id": 1, "quantity": 1 }),
            json!([{ "quantity": 1 }]),
            json!([{ "product_id": "abc", "quantity": 1 }]),
            json!([{ "product_id": 1, "quantity": 1, "price": 3 }]),
            json!([{ "product_id": 1, "quantity": 1 }, 5]),
            json!(null),
        ];

        for body in &invalid {
            assert!(validate_sale_items(body).is_err(), "{body} should be rejected");
        }
    }

    #[test]
    fn test_validate_new_product() {
        let product = validate_new_product(&json!({ "name": "Escudo", "quantity": 30 })).unwrap();
        assert_eq!(product.name, "Escudo");
        assert_eq!(product.quantity, 30);

        assert_eq!(
            validate_new_product(&json!({ "name": "Esc", "quantity": 30 })),
            Err(ValidationError::TooShort {
                field: "name".to_string(),
                min: 5
            })
        );
        assert_eq!(
            validate_new_product(&json!({ "name": "Escudo", "quantity": "ten" })),
            Err(ValidationError::NotANumber {
                field: "quantity".to_string()
            })
        );
        assert_eq!(
            validate_new_product(&json!({ "name": "Escudo", "quantity": -1 })),
            Err(ValidationError::TooSmall {
                field: "quantity".to_string(),
                min: 0
            })
        );
        assert_eq!(
            validate_new_product(&json!({ "quantity": 1 })),
            Err(ValidationError::Required {
                field: "name".to_string()
            })
        );
    }

    #[test]
    fn test_stock_quantity_bounds() {
        assert_eq!(validate_stock_quantity(Some(&json!(0))), Ok(0));
        assert_eq!(
            validate_stock_quantity(Some(&json!(MAX_QUANTITY))),
            Ok(MAX_QUANTITY)
        );
        assert_eq!(
            validate_stock_quantity(Some(&json!(i64::MAX))),
            Err(ValidationError::TooLarge {
                field: "quantity".to_string(),
                max: MAX_QUANTITY
            })
        );
    }

    #[test]
    fn test_largest_line_item_is_accepted() {
        let items =
            validate_sale_items(&json!([{ "product_id": 1, "quantity": MAX_QUANTITY }])).unwrap();
        assert_eq!(items[0].quantity, MAX_QUANTITY);
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42"), Some(42));
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id(""), None);
    }
}
