//! Sale reconciliation service.
//!
//! Validates line-items, moves stock and persists sales.
//!
//! ```text
//! create(items)
//!   validate ──✗──► 422 invalid_data
//!   plan adjustments (StockPolicy)
//!   BEGIN
//!     take_stock per adjustment ──✗──► ROLLBACK, 404 stock_problem
//!     insert sale + line-items
//!   COMMIT ──► { id, itemsSold }
//!
//! destroy(id)
//!   BEGIN
//!     snapshot line-items ──(none)──► 422 invalid_data
//!     delete sale
//!     return_stock per adjustment of the snapshot ──✗──► ROLLBACK, 404 stock_problem
//!   COMMIT ──► snapshot
//! ```

use serde_json::Value;
use tracing::{info, warn};

use crate::error::ApiResult;
use stockroom_core::stock::plan_adjustments;
use stockroom_core::validation::validate_sale_items;
use stockroom_core::{CoreError, SaleItem, SaleLine, SaleReceipt, StockPolicy, ValidationError};
use stockroom_db::Database;

/// Sale service.
#[derive(Debug, Clone)]
pub struct SaleService {
    db: Database,
    policy: StockPolicy,
}

impl SaleService {
    /// Create a new sale service.
    pub fn new(db: Database, policy: StockPolicy) -> Self {
        SaleService { db, policy }
    }

    /// Records a sale and takes its stock.
    ///
    /// Either the stock moves and the sale is stored, or nothing is written.
    pub async fn create(&self, body: &Value) -> ApiResult<SaleReceipt> {
        let items = validate_sale_items(body)?;
        let plan = plan_adjustments(&items, self.policy)?;

        let mut txn = self.db.begin().await?;

        for adjustment in &plan {
            if txn.take_stock(adjustment.product_id, adjustment.quantity).await? {
                continue;
            }

            let err = match txn.product(adjustment.product_id).await? {
                Some(product) => {
                    warn!(
                        product_id = product.id,
                        available = product.quantity,
                        requested = adjustment.quantity,
                        "Sale rejected: not enough stock"
                    );
                    CoreError::InsufficientStock {
                        product_id: product.id,
                        available: product.quantity,
                        requested: adjustment.quantity,
                    }
                }
                None => {
                    warn!(product_id = adjustment.product_id, "Sale rejected: unknown product");
                    CoreError::Validation(ValidationError::InvalidLineItems)
                }
            };
            return Err(err.into());
        }

        let id = txn.insert_sale(&items).await?;
        txn.commit().await?;

        info!(sale_id = id, items = items.len(), policy = %self.policy, "Sale recorded");

        Ok(SaleReceipt {
            id,
            items_sold: items,
        })
    }

    /// Every line-item of every sale.
    pub async fn read_all(&self) -> ApiResult<Vec<SaleLine>> {
        Ok(self.db.sales().read_all().await?)
    }

    /// The line-items of one sale.
    pub async fn read_by_id(&self, id: i64) -> ApiResult<Vec<SaleLine>> {
        self.db
            .sales()
            .read_by_id(id)
            .await?
            .ok_or_else(|| CoreError::SaleNotFound(id.to_string()).into())
    }

    /// Rewrites a sale's line-item quantity. Stock is not reconciled.
    pub async fn update(&self, id: i64, body: &Value) -> ApiResult<SaleReceipt> {
        let items = validate_sale_items(body)?;
        let receipt = self.db.sales().update(id, &items).await?;

        info!(sale_id = id, "Sale updated");

        Ok(receipt)
    }

    /// Deletes a sale and returns its stock. Yields the deleted line-items.
    pub async fn destroy(&self, id: i64) -> ApiResult<Vec<SaleLine>> {
        let mut txn = self.db.begin().await?;

        let lines = txn.sale_lines(id).await?;
        if lines.is_empty() {
            return Err(CoreError::UnknownSale(id.to_string()).into());
        }

        txn.delete_sale(id).await?;

        let items: Vec<SaleItem> = lines.iter().map(SaleLine::item).collect();
        for adjustment in plan_adjustments(&items, self.policy)? {
            if txn
                .return_stock(adjustment.product_id, adjustment.quantity)
                .await?
            {
                continue;
            }

            match txn.product(adjustment.product_id).await? {
                Some(product) => {
                    warn!(
                        sale_id = id,
                        product_id = product.id,
                        available = product.quantity,
                        returned = adjustment.quantity,
                        "Sale not deleted: stock limit exceeded"
                    );
                    return Err(CoreError::StockLimitExceeded {
                        product_id: product.id,
                        available: product.quantity,
                        returned: adjustment.quantity,
                    }
                    .into());
                }
                None => warn!(
                    sale_id = id,
                    product_id = adjustment.product_id,
                    quantity = adjustment.quantity,
                    "Product no longer exists, stock not restored"
                ),
            }
        }

        txn.commit().await?;

        info!(sale_id = id, items = lines.len(), "Sale deleted");

        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use serde_json::json;
    use stockroom_core::{NewProduct, MAX_QUANTITY};
    use stockroom_db::DbConfig;

    async fn setup(policy: StockPolicy) -> (SaleService, Database) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        for (name, quantity) in [("Martelo de Thor", 10), ("Traje de encolhimento", 20)] {
            db.products()
                .create(&NewProduct {
                    name: name.to_string(),
                    quantity,
                })
                .await
                .unwrap();
        }
        (SaleService::new(db.clone(), policy), db)
    }

    async fn stock_of(db: &Database, id: i64) -> i64 {
        db.products().read_by_id(id).await.unwrap().unwrap().quantity
    }

    #[tokio::test]
    async fn test_sell_and_delete_round_trip() {
        let (service, db) = setup(StockPolicy::FirstLineItem).await;

        let receipt = service
            .create(&json!([{ "product_id": 1, "quantity": 2 }]))
            .await
            .unwrap();
        assert_eq!(receipt.items_sold, vec![SaleItem::new(1, 2)]);
        assert_eq!(stock_of(&db, 1).await, 8);

        let deleted = service.destroy(receipt.id).await.unwrap();
        assert_eq!(deleted.len(), 1);
        assert_eq!(stock_of(&db, 1).await, 10);

        let err = service.read_by_id(receipt.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Sale not found");
    }

    #[tokio::test]
    async fn test_oversell_writes_nothing() {
        let (service, db) = setup(StockPolicy::FirstLineItem).await;

        let err = service
            .create(&json!([{ "product_id": 1, "quantity": 100 }]))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::StockProblem);
        assert_eq!(err.message, "Such amount is not permitted to sell");

        assert_eq!(stock_of(&db, 1).await, 10);
        assert!(service.read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_selling_whole_stock_is_allowed() {
        let (service, db) = setup(StockPolicy::FirstLineItem).await;

        service
            .create(&json!([{ "product_id": 1, "quantity": 10 }]))
            .await
            .unwrap();
        assert_eq!(stock_of(&db, 1).await, 0);
    }

    #[tokio::test]
    async fn test_first_line_item_policy_ignores_later_items() {
        let (service, db) = setup(StockPolicy::FirstLineItem).await;

        let receipt = service
            .create(&json!([
                { "product_id": 1, "quantity": 2 },
                { "product_id": 2, "quantity": 500 }
            ]))
            .await
            .unwrap();

        assert_eq!(stock_of(&db, 1).await, 8);
        assert_eq!(stock_of(&db, 2).await, 20);
        assert_eq!(service.read_by_id(receipt.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_every_line_item_policy() {
        let (service, db) = setup(StockPolicy::EveryLineItem).await;

        let receipt = service
            .create(&json!([
                { "product_id": 1, "quantity": 2 },
                { "product_id": 2, "quantity": 5 },
                { "product_id": 1, "quantity": 3 }
            ]))
            .await
            .unwrap();
        assert_eq!(stock_of(&db, 1).await, 5);
        assert_eq!(stock_of(&db, 2).await, 15);

        // Combined quantity is checked, and a failure rolls back earlier takes
        let err = service
            .create(&json!([
                { "product_id": 2, "quantity": 1 },
                { "product_id": 1, "quantity": 3 },
                { "product_id": 1, "quantity": 3 }
            ]))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::StockProblem);
        assert_eq!(stock_of(&db, 2).await, 15);

        service.destroy(receipt.id).await.unwrap();
        assert_eq!(stock_of(&db, 1).await, 10);
        assert_eq!(stock_of(&db, 2).await, 20);
    }

    #[tokio::test]
    async fn test_unknown_product_is_invalid_data() {
        let (service, _db) = setup(StockPolicy::FirstLineItem).await;

        let err = service
            .create(&json!([{ "product_id": 99, "quantity": 1 }]))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidData);
        assert!(service.read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_items_are_rejected() {
        let (service, db) = setup(StockPolicy::FirstLineItem).await;

        for body in [
            json!([]),
            json!([{ "product_id": 1, "quantity": 0 }]),
            json!([{ "product_id": 1, "quantity": -1 }]),
            json!([{ "product_id": 1, "quantity": "String" }]),
            json!([{ "quantity": 1 }]),
        ] {
            let err = service.create(&body).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidData);
            assert_eq!(err.message, "Wrong product ID or invalid quantity");

            let err = service.update(1, &body).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidData);
        }

        assert_eq!(stock_of(&db, 1).await, 10);
    }

    #[tokio::test]
    async fn test_update_does_not_touch_stock() {
        let (service, db) = setup(StockPolicy::FirstLineItem).await;

        let receipt = service
            .create(&json!([{ "product_id": 1, "quantity": 2 }]))
            .await
            .unwrap();

        let updated = service
            .update(receipt.id, &json!([{ "product_id": 1, "quantity": 5 }]))
            .await
            .unwrap();
        assert_eq!(updated.items_sold, vec![SaleItem::new(1, 5)]);

        let lines = service.read_by_id(receipt.id).await.unwrap();
        assert_eq!(lines[0].quantity, 5);
        assert_eq!(stock_of(&db, 1).await, 8);
    }

    #[tokio::test]
    async fn test_destroy_unknown_sale() {
        let (service, _db) = setup(StockPolicy::FirstLineItem).await;

        let err = service.destroy(42).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidData);
        assert_eq!(err.message, "Wrong sale ID format");
    }

    #[tokio::test]
    async fn test_destroy_after_product_removed() {
        let (service, db) = setup(StockPolicy::FirstLineItem).await;

        let receipt = service
            .create(&json!([{ "product_id": 1, "quantity": 2 }]))
            .await
            .unwrap();
        db.products().destroy(1).await.unwrap();

        let deleted = service.destroy(receipt.id).await.unwrap();
        assert_eq!(deleted[0].product_id, 1);
        assert!(db.products().read_by_id(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_overflowing_quantities_never_add_stock() {
        let (service, db) = setup(StockPolicy::EveryLineItem).await;

        let err = service
            .create(&json!([
                { "product_id": 1, "quantity": i64::MAX },
                { "product_id": 1, "quantity": i64::MAX }
            ]))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidData);

        let err = service
            .create(&json!([
                { "product_id": 1, "quantity": MAX_QUANTITY },
                { "product_id": 1, "quantity": MAX_QUANTITY }
            ]))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::StockProblem);

        assert_eq!(stock_of(&db, 1).await, 10);
        assert!(service.read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_destroy_refuses_to_overflow_stock() {
        let (service, db) = setup(StockPolicy::FirstLineItem).await;
        let full = db
            .products()
            .create(&NewProduct {
                name: "Joia do Infinito".to_string(),
                quantity: i64::MAX,
            })
            .await
            .unwrap();

        let receipt = service
            .create(&json!([{ "product_id": full.id, "quantity": 1 }]))
            .await
            .unwrap();
        service
            .update(receipt.id, &json!([{ "product_id": full.id, "quantity": 5 }]))
            .await
            .unwrap();

        let err = service.destroy(receipt.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::StockProblem);
        assert_eq!(err.message, "Stock limit exceeded");

        // Rolled back: the sale survives and stock is still an integer
        assert_eq!(service.read_by_id(receipt.id).await.unwrap().len(), 1);
        assert_eq!(stock_of(&db, full.id).await, i64::MAX - 1);
        assert_eq!(db.products().read_all().await.unwrap().len(), 3);
    }
}
