//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Stock Updates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Conditional stock take                              │
//! │                                                                         │
//! │  UPDATE products SET quantity = quantity - n                           │
//! │  WHERE id = ? AND quantity >= n                                        │
//! │                                                                         │
//! │  rows_affected = 1  →  stock taken                                     │
//! │  rows_affected = 0  →  unknown product OR not enough stock             │
//! │                                                                         │
//! │  Check and write happen in one statement, so two concurrent sales      │
//! │  can never both pass the check on the same units.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use stockroom_core::{NewProduct, Product};

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a product and returns it with its generated id.
    pub async fn create(&self, product: &NewProduct) -> DbResult<Product> {
        debug!(name = %product.name, quantity = product.quantity, "Creating product");

        let result = sqlx::query("INSERT INTO products (name, quantity) VALUES (?1, ?2)")
            .bind(&product.name)
            .bind(product.quantity)
            .execute(&self.pool)
            .await?;

        Ok(Product {
            id: result.last_insert_rowid(),
            name: product.name.clone(),
            quantity: product.quantity,
        })
    }

    /// Lists every product in insertion order.
    pub async fn read_all(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, quantity FROM products ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Gets a product by id.
    pub async fn read_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let mut conn = self.pool.acquire().await?;
        fetch_by_id(&mut conn, id).await
    }

    /// Gets a product by exact name.
    pub async fn read_by_name(&self, name: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, quantity FROM products WHERE name = ?1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Overwrites name and quantity of a product.
    ///
    /// Returns the submitted record whether or not a row matched.
    pub async fn update(&self, id: i64, product: &NewProduct) -> DbResult<Product> {
        let result = sqlx::query("UPDATE products SET name = ?2, quantity = ?3 WHERE id = ?1")
            .bind(id)
            .bind(&product.name)
            .bind(product.quantity)
            .execute(&self.pool)
            .await?;

        debug!(id, rows = result.rows_affected(), "Updated product");

        Ok(Product {
            id,
            name: product.name.clone(),
            quantity: product.quantity,
        })
    }

    /// Deletes a product, returning what it looked like just before.
    ///
    /// `None` when no product had that id.
    pub async fn destroy(&self, id: i64) -> DbResult<Option<Product>> {
        let mut conn = self.pool.acquire().await?;

        let Some(product) = fetch_by_id(&mut conn, id).await? else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        debug!(id, name = %product.name, "Deleted product");

        Ok(Some(product))
    }
}

// =============================================================================
// Connection-level statements (shared with StockTransaction)
// =============================================================================

pub(crate) async fn fetch_by_id(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
        "SELECT id, name, quantity FROM products WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(product)
}

/// Removes `quantity` units from a product if at least that many are stocked.
///
/// Returns false (and changes nothing) otherwise, or when `quantity` is not
/// positive.
pub(crate) async fn take_stock(conn: &mut SqliteConnection, id: i64, quantity: i64) -> DbResult<bool> {
    debug!(id, quantity, "Taking stock");

    let result = sqlx::query(
        "UPDATE products SET quantity = quantity - ?2 WHERE id = ?1 AND ?2 > 0 AND quantity >= ?2",
    )
    .bind(id)
    .bind(quantity)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Adds `quantity` units back to a product.
///
/// Returns false (and changes nothing) if the product no longer exists, if
/// `quantity` is not positive, or if the new stock would not fit in an
/// INTEGER column. SQLite silently widens an overflowing sum to REAL.
pub(crate) async fn return_stock(conn: &mut SqliteConnection, id: i64, quantity: i64) -> DbResult<bool> {
    debug!(id, quantity, "Returning stock");

    let result = sqlx::query(
        "UPDATE products SET quantity = quantity + ?2 \
         WHERE id = ?1 AND ?2 > 0 AND quantity <= 9223372036854775807 - ?2",
    )
    .bind(id)
    .bind(quantity)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() == 1)
}

// =============================================================================
// Unit Tests
// =============================================================================
