//! # Sale Repository
//!
//! Database operations for sales and their line-items.
//!
//! ## Storage Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Storage                                      │
//! │                                                                         │
//! │  sales                     sales_products                              │
//! │  ┌────┬──────────────┐     ┌─────────┬────────────┬──────────┐         │
//! │  │ id │ date         │◄────│ sale_id │ product_id │ quantity │         │
//! │  ├────┼──────────────┤     ├─────────┼────────────┼──────────┤         │
//! │  │ 1  │ 2026-10-16…  │     │ 1       │ 1          │ 2        │         │
//! │  └────┴──────────────┘     │ 1       │ 2          │ 6        │         │
//! │                            └─────────┴────────────┴──────────┘         │
//! │                                                                         │
//! │  Reads join the two tables: one SaleLine per line-item.                │
//! │  Deleting the header removes its line-items (ON DELETE CASCADE).       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The repository methods run each statement on its own; the header and
//! line-item inserts of [`SaleRepository::create`] are not atomic. Use
//! [`crate::Database::begin`] when stock moves together with the sale.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use stockroom_core::{SaleItem, SaleLine, SaleReceipt};

const SELECT_SALE_LINES: &str = r#"
    SELECT
        s.id AS id,
        s.date AS date,
        sp.product_id AS product_id,
        sp.quantity AS quantity
    FROM sales AS s
    INNER JOIN sales_products AS sp ON sp.sale_id = s.id
"#;

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Records a sale: the header first, then its line-items.
    pub async fn create(&self, items: &[SaleItem]) -> DbResult<SaleReceipt> {
        let mut conn = self.pool.acquire().await?;
        let id = insert_sale(&mut conn, items).await?;

        Ok(SaleReceipt {
            id,
            items_sold: items.to_vec(),
        })
    }

    /// Every line-item of every sale, ordered by sale id.
    pub async fn read_all(&self) -> DbResult<Vec<SaleLine>> {
        let query = format!("{SELECT_SALE_LINES} ORDER BY s.id, sp.rowid");

        let lines = sqlx::query_as::<_, SaleLine>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(lines)
    }

    /// The line-items of one sale.
    ///
    /// `None` when no line-item carries this sale id.
    pub async fn read_by_id(&self, id: i64) -> DbResult<Option<Vec<SaleLine>>> {
        let mut conn = self.pool.acquire().await?;
        let lines = fetch_lines(&mut conn, id).await?;

        Ok((!lines.is_empty()).then_some(lines))
    }

    /// Overwrites the quantity of the line-item(s) matching the first
    /// submitted item's product. Other submitted items are not applied.
    ///
    /// Echoes the full submitted list whether or not a row matched.
    pub async fn update(&self, id: i64, items: &[SaleItem]) -> DbResult<SaleReceipt> {
        if let Some(first) = items.first() {
            let result = sqlx::query(
                "UPDATE sales_products SET quantity = ?3 WHERE sale_id = ?1 AND product_id = ?2",
            )
            .bind(id)
            .bind(first.product_id)
            .bind(first.quantity)
            .execute(&self.pool)
            .await?;

            debug!(
                sale_id = id,
                product_id = first.product_id,
                rows = result.rows_affected(),
                "Updated sale line-item"
            );
        }

        Ok(SaleReceipt {
            id,
            items_sold: items.to_vec(),
        })
    }

    /// Deletes a sale, returning its line-items as they were.
    ///
    /// `None` when nothing matched.
    pub async fn destroy(&self, id: i64) -> DbResult<Option<Vec<SaleLine>>> {
        let mut conn = self.pool.acquire().await?;

        let lines = fetch_lines(&mut conn, id).await?;
        if lines.is_empty() {
            return Ok(None);
        }

        delete_sale(&mut conn, id).await?;

        Ok(Some(lines))
    }
}

// =============================================================================
// Connection-level statements (shared with StockTransaction)
// =============================================================================

/// Inserts a sale header and its line-items. Returns the new sale id.
pub(crate) async fn insert_sale(conn: &mut SqliteConnection, items: &[SaleItem]) -> DbResult<i64> {
    let header = sqlx::query("INSERT INTO sales (date) VALUES (?1)")
        .bind(Utc::now())
        .execute(&mut *conn)
        .await?;
    let sale_id = header.last_insert_rowid();

    for item in items {
        sqlx::query("INSERT INTO sales_products (sale_id, product_id, quantity) VALUES (?1, ?2, ?3)")
            .bind(sale_id)
            .bind(item.product_id)
            .bind(item.quantity)
            .execute(&mut *conn)
            .await?;
    }

    debug!(sale_id, items = items.len(), "Inserted sale");

    Ok(sale_id)
}

pub(crate) async fn fetch_lines(conn: &mut SqliteConnection, id: i64) -> DbResult<Vec<SaleLine>> {
    let query = format!("{SELECT_SALE_LINES} WHERE s.id = ?1 ORDER BY sp.rowid");

    let lines = sqlx::query_as::<_, SaleLine>(&query)
        .bind(id)
        .fetch_all(&mut *conn)
        .await?;

    Ok(lines)
}

/// Deletes a sale header; line-items follow by cascade.
///
/// Returns false when no header had this id.
pub(crate) async fn delete_sale(conn: &mut SqliteConnection, id: i64) -> DbResult<bool> {
    let result = sqlx::query("DELETE FROM sales WHERE id = ?1")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    debug!(sale_id = id, rows = result.rows_affected(), "Deleted sale");

    Ok(result.rows_affected() == 1)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};
    use stockroom_core::SaleItem;

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_read_by_id() {
        let db = db().await;
        let sales = db.sales();

        let items = vec![SaleItem::new(1, 2), SaleItem::new(2, 6)];
        let receipt = sales.create(&items).await.unwrap();
        assert_eq!(receipt.items_sold, items);

        let lines = sales.read_by_id(receipt.id).await.unwrap().unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|line| line.id == receipt.id));
        assert_eq!(lines[0].date, lines[1].date);
        assert_eq!(
            lines.iter().map(|line| line.item()).collect::<Vec<_>>(),
            items
        );

        // Repeatable
        assert_eq!(sales.read_by_id(receipt.id).await.unwrap().unwrap(), lines);
    }

    #[tokio::test]
    async fn test_read_all_orders_by_sale_id() {
        let db = db().await;
        let sales = db.sales();

        let first = sales.create(&[SaleItem::new(1, 1)]).await.unwrap();
        let second = sales
            .create(&[SaleItem::new(2, 2), SaleItem::new(3, 3)])
            .await
            .unwrap();

        let lines = sales.read_all().await.unwrap();
        let ids: Vec<i64> = lines.iter().map(|line| line.id).collect();
        assert_eq!(ids, vec![first.id, second.id, second.id]);
        assert_eq!(lines[2].product_id, 3);
    }

    #[tokio::test]
    async fn test_same_product_twice_in_one_sale() {
        let db = db().await;
        let sales = db.sales();

        let receipt = sales
            .create(&[SaleItem::new(1, 2), SaleItem::new(1, 6)])
            .await
            .unwrap();

        let lines = sales.read_by_id(receipt.id).await.unwrap().unwrap();
        assert_eq!(lines.len(), 2);
    }

    #[tokio::test]
    async fn test_update_applies_first_item_only() {
        let db = db().await;
        let sales = db.sales();

        let receipt = sales
            .create(&[SaleItem::new(1, 2), SaleItem::new(2, 6)])
            .await
            .unwrap();

        let submitted = vec![SaleItem::new(1, 5), SaleItem::new(2, 9)];
        let echoed = sales.update(receipt.id, &submitted).await.unwrap();
        assert_eq!(echoed.id, receipt.id);
        assert_eq!(echoed.items_sold, submitted);

        let lines = sales.read_by_id(receipt.id).await.unwrap().unwrap();
        assert_eq!(lines[0].quantity, 5);
        assert_eq!(lines[1].quantity, 6);
    }

    #[tokio::test]
    async fn test_update_unknown_sale_echoes_input() {
        let db = db().await;

        let submitted = vec![SaleItem::new(1, 5)];
        let echoed = db.sales().update(42, &submitted).await.unwrap();
        assert_eq!(echoed.id, 42);
        assert_eq!(echoed.items_sold, submitted);
    }

    #[tokio::test]
    async fn test_destroy_returns_snapshot_and_cascades() {
        let db = db().await;
        let sales = db.sales();

        let receipt = sales.create(&[SaleItem::new(1, 2)]).await.unwrap();

        let deleted = sales.destroy(receipt.id).await.unwrap().unwrap();
        assert_eq!(deleted.len(), 1);
        assert_eq!(deleted[0].item(), SaleItem::new(1, 2));

        assert!(sales.read_by_id(receipt.id).await.unwrap().is_none());
        assert!(sales.destroy(receipt.id).await.unwrap().is_none());

        let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales_products")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[tokio::test]
    async fn test_read_missing_sale() {
        let db = db().await;
        assert!(db.sales().read_by_id(7).await.unwrap().is_none());
        assert!(db.sales().read_all().await.unwrap().is_empty());
    }
}
