//! # Stock Transaction
//!
//! A unit of work that moves stock and records (or removes) a sale
//! atomically.
//!
//! ## Sale Creation
//! ```text
//! db.begin()
//!   │
//!   ├── take_stock(product, n)   ──► false? drop txn → nothing written
//!   ├── take_stock(...)              (one per planned adjustment)
//!   ├── insert_sale(items)
//!   │
//!   └── commit()                 ──► stock and sale become visible together
//! ```
//!
//! Dropping a `StockTransaction` without committing rolls everything back.

use std::fmt;

use sqlx::{Sqlite, Transaction};

use crate::error::{DbError, DbResult};
use crate::repository::{product, sale};
use stockroom_core::{Product, SaleItem, SaleLine};

/// An open SQLite transaction over products and sales.
pub struct StockTransaction {
    tx: Transaction<'static, Sqlite>,
}

impl fmt::Debug for StockTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StockTransaction").finish_non_exhaustive()
    }
}

impl StockTransaction {
    pub(crate) fn new(tx: Transaction<'static, Sqlite>) -> Self {
        StockTransaction { tx }
    }

    /// Reads a product as seen inside this transaction.
    pub async fn product(&mut self, id: i64) -> DbResult<Option<Product>> {
        product::fetch_by_id(&mut self.tx, id).await
    }

    /// Removes `quantity` units from a product if enough are stocked.
    ///
    /// Returns false when the product is unknown or short on stock; the
    /// transaction stays usable either way.
    pub async fn take_stock(&mut self, product_id: i64, quantity: i64) -> DbResult<bool> {
        product::take_stock(&mut self.tx, product_id, quantity).await
    }

    /// Adds `quantity` units back to a product. False if it no longer exists.
    pub async fn return_stock(&mut self, product_id: i64, quantity: i64) -> DbResult<bool> {
        product::return_stock(&mut self.tx, product_id, quantity).await
    }

    /// Inserts a sale header and its line-items, returning the sale id.
    pub async fn insert_sale(&mut self, items: &[SaleItem]) -> DbResult<i64> {
        sale::insert_sale(&mut self.tx, items).await
    }

    /// Reads a sale's line-items as seen inside this transaction.
    pub async fn sale_lines(&mut self, id: i64) -> DbResult<Vec<SaleLine>> {
        sale::fetch_lines(&mut self.tx, id).await
    }

    /// Deletes a sale header and, by cascade, its line-items.
    pub async fn delete_sale(&mut self, id: i64) -> DbResult<bool> {
        sale::delete_sale(&mut self.tx, id).await
    }

    /// Makes every write of this transaction durable.
    pub async fn commit(self) -> DbResult<()> {
        self.tx
            .commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::{Database, DbConfig};
    use stockroom_core::{NewProduct, SaleItem};

    async fn stocked(quantity: i64) -> (Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db
            .products()
            .create(&NewProduct {
                name: "Martelo de Thor".to_string(),
                quantity,
            })
            .await
            .unwrap();
        (db, product.id)
    }

    #[tokio::test]
    async fn test_commit_persists_stock_and_sale() {
        let (db, product_id) = stocked(10).await;

        let mut txn = db.begin().await.unwrap();
        assert!(txn.take_stock(product_id, 2).await.unwrap());
        let sale_id = txn.insert_sale(&[SaleItem::new(product_id, 2)]).await.unwrap();
        assert_eq!(txn.product(product_id).await.unwrap().unwrap().quantity, 8);
        txn.commit().await.unwrap();

        let product = db.products().read_by_id(product_id).await.unwrap().unwrap();
        assert_eq!(product.quantity, 8);
        assert!(db.sales().read_by_id(sale_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_drop_rolls_back() {
        let (db, product_id) = stocked(10).await;

        {
            let mut txn = db.begin().await.unwrap();
            assert!(txn.take_stock(product_id, 4).await.unwrap());
            txn.insert_sale(&[SaleItem::new(product_id, 4)]).await.unwrap();
            // dropped without commit
        }

        let product = db.products().read_by_id(product_id).await.unwrap().unwrap();
        assert_eq!(product.quantity, 10);
        assert!(db.sales().read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_oversell_leaves_stock_untouched() {
        let (db, product_id) = stocked(10).await;

        let mut txn = db.begin().await.unwrap();
        assert!(!txn.take_stock(product_id, 100).await.unwrap());
        assert_eq!(txn.product(product_id).await.unwrap().unwrap().quantity, 10);
        drop(txn);

        let product = db.products().read_by_id(product_id).await.unwrap().unwrap();
        assert_eq!(product.quantity, 10);
    }

    #[tokio::test]
    async fn test_delete_and_restock() {
        let (db, product_id) = stocked(8).await;
        let receipt = db
            .sales()
            .create(&[SaleItem::new(product_id, 2)])
            .await
            .unwrap();

        let mut txn = db.begin().await.unwrap();
        let lines = txn.sale_lines(receipt.id).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert!(txn.delete_sale(receipt.id).await.unwrap());
        assert!(txn.return_stock(product_id, lines[0].quantity).await.unwrap());
        txn.commit().await.unwrap();

        let product = db.products().read_by_id(product_id).await.unwrap().unwrap();
        assert_eq!(product.quantity, 10);
        assert!(db.sales().read_by_id(receipt.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_writer_waits_for_unit_of_work() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(DbConfig::new(dir.path().join("stockroom.db")))
            .await
            .unwrap();
        let product = db
            .products()
            .create(&NewProduct {
                name: "Martelo de Thor".to_string(),
                quantity: 8,
            })
            .await
            .unwrap();
        let receipt = db
            .sales()
            .create(&[SaleItem::new(product.id, 2)])
            .await
            .unwrap();

        let mut txn = db.begin().await.unwrap();
        let lines = txn.sale_lines(receipt.id).await.unwrap();

        let products = db.products();
        let writer = tokio::spawn(async move {
            products
                .create(&NewProduct {
                    name: "Traje de encolhimento".to_string(),
                    quantity: 20,
                })
                .await
        });
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(txn.delete_sale(receipt.id).await.unwrap());
        assert!(txn.return_stock(product.id, lines[0].quantity).await.unwrap());
        txn.commit().await.unwrap();

        writer.await.unwrap().unwrap();
        assert_eq!(db.products().read_all().await.unwrap().len(), 2);
        assert_eq!(
            db.products().read_by_id(product.id).await.unwrap().unwrap().quantity,
            10
        );
        db.close().await;
    }

    #[tokio::test]
    async fn test_debug_hides_connection() {
        let (db, _) = stocked(1).await;
        let txn = db.begin().await.unwrap();
        assert_eq!(format!("{txn:?}"), "StockTransaction { .. }");
    }
}
