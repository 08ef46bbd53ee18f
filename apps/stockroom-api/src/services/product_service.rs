//! Product service.
//!
//! Validates product bodies and enforces unique names in front of the
//! product repository. Every failure is `invalid_data`.

use serde_json::Value;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use stockroom_core::validation::validate_new_product;
use stockroom_core::{CoreError, NewProduct, Product};
use stockroom_db::{Database, DbError};

const NAME_FIELD: &str = "products.name";

/// Product service.
#[derive(Debug, Clone)]
pub struct ProductService {
    db: Database,
}

impl ProductService {
    /// Create a new product service.
    pub fn new(db: Database) -> Self {
        ProductService { db }
    }

    /// Stocks a new product. Names must be unique.
    pub async fn create(&self, body: &Value) -> ApiResult<Product> {
        let product = validate_new_product(body)?;

        if self.db.products().read_by_name(&product.name).await?.is_some() {
            return Err(CoreError::ProductExists(product.name).into());
        }

        let created = self
            .db
            .products()
            .create(&product)
            .await
            .map_err(|e| duplicate_name(e, &product))?;

        info!(product_id = created.id, name = %created.name, "Product created");

        Ok(created)
    }

    /// Every product, in insertion order.
    pub async fn read_all(&self) -> ApiResult<Vec<Product>> {
        Ok(self.db.products().read_all().await?)
    }

    pub async fn read_by_id(&self, id: i64) -> ApiResult<Product> {
        self.db
            .products()
            .read_by_id(id)
            .await?
            .ok_or_else(|| CoreError::UnknownProduct(id.to_string()).into())
    }

    /// Overwrites name and stock of an existing product.
    pub async fn update(&self, id: i64, body: &Value) -> ApiResult<Product> {
        let product = validate_new_product(body)?;

        // existence check only; the write is unconditional
        self.read_by_id(id).await?;

        let updated = self
            .db
            .products()
            .update(id, &product)
            .await
            .map_err(|e| duplicate_name(e, &product))?;

        info!(product_id = id, quantity = updated.quantity, "Product updated");

        Ok(updated)
    }

    /// Removes a product and returns it as it was.
    pub async fn destroy(&self, id: i64) -> ApiResult<Product> {
        let deleted = self
            .db
            .products()
            .destroy(id)
            .await?
            .ok_or_else(|| ApiError::from(CoreError::UnknownProduct(id.to_string())))?;

        info!(product_id = id, name = %deleted.name, "Product deleted");

        Ok(deleted)
    }
}

/// A name clash that slipped past the lookup (concurrent create, or a
/// rename onto an existing name) still reads as "already exists".
fn duplicate_name(err: DbError, product: &NewProduct) -> ApiError {
    if err.is_duplicate_of(NAME_FIELD) {
        CoreError::ProductExists(product.name.clone()).into()
    } else {
        err.into()
    }
}
