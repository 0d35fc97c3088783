//! Product repository.
//!
//! Image files are managed by [`crate::services::ImageStore`]; this module
//! only stores their paths.

use sqlx::PgPool;
use tracing::{debug, instrument};

use apola_core::ProductId;

use super::{RepositoryError, map_write_error};
use crate::models::{Product, ProductInput, ProductListing};

/// Columns selected for a full product row.
const PRODUCT_COLUMNS: &str = "id, category_id, title, price, quantity, image, weight, \
                               description, created_at, updated_at";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all products with their category names, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<ProductListing>, RepositoryError> {
        let products = sqlx::query_as::<_, ProductListing>(
            r"
            SELECT p.id, p.category_id, c.name AS category_name, p.title, p.price,
                   p.quantity, p.image, p.weight, p.created_at
            FROM products p
            JOIN categories c ON c.id = p.category_id
            ORDER BY p.created_at DESC, p.id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Insert a product whose image has already been stored at `image`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the category disappeared.
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create(&self, input: &ProductInput, image: &str) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r"
            INSERT INTO products (category_id, title, price, quantity, image, weight, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(input.category_id)
        .bind(&input.title)
        .bind(input.price)
        .bind(input.quantity)
        .bind(image)
        .bind(input.weight)
        .bind(&input.description)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_write_error(e, "product"))?;

        debug!(id = %product.id, "Created product");
        Ok(product)
    }

    /// Update a product, replacing its image path when `image` is given.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such product exists.
    /// Returns `RepositoryError::Conflict` if the category disappeared.
    /// Returns `RepositoryError::Database` if the update fails.
    #[instrument(skip(self, input, image), fields(title = %input.title))]
    pub async fn update(
        &self,
        id: ProductId,
        input: &ProductInput,
        image: Option<&str>,
    ) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r"
            UPDATE products
            SET category_id = $2,
                title = $3,
                price = $4,
                quantity = $5,
                image = COALESCE($6, image),
                weight = $7,
                description = $8,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(input.category_id)
        .bind(&input.title)
        .bind(input.price)
        .bind(input.quantity)
        .bind(image)
        .bind(input.weight)
        .bind(&input.description)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_write_error(e, "product"))?
        .ok_or(RepositoryError::NotFound)?;

        debug!("Updated product");
        Ok(product)
    }

    /// Delete a product, returning the image path it held.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such product exists.
    /// Returns `RepositoryError::Database` if the delete fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ProductId) -> Result<String, RepositoryError> {
        let (image,): (String,) =
            sqlx::query_as("DELETE FROM products WHERE id = $1 RETURNING image")
                .bind(id)
                .fetch_optional(self.pool)
                .await?
                .ok_or(RepositoryError::NotFound)?;

        debug!("Deleted product");
        Ok(image)
    }

    /// Number of products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Total units in stock across all products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn total_stock(&self) -> Result<i64, RepositoryError> {
        let (total,): (i64,) =
            sqlx::query_as("SELECT COALESCE(SUM(quantity), 0)::BIGINT FROM products")
                .fetch_one(self.pool)
                .await?;
        Ok(total)
    }
}
