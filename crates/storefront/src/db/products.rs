//! Product queries for storefront pages.

use sqlx::PgPool;

use apola_core::ProductId;

use super::RepositoryError;
use crate::models::{ProductCard, ProductDetail};

/// Repository for product reads.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The `limit` most recently created products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn latest(&self, limit: i64) -> Result<Vec<ProductCard>, RepositoryError> {
        let products = sqlx::query_as::<_, ProductCard>(
            r"
            SELECT p.id, p.title, p.price, p.image, c.name AS category_name, p.created_at
            FROM products p
            JOIN categories c ON c.id = p.category_id
            ORDER BY p.created_at DESC, p.id DESC
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// A single product with its category name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<ProductDetail>, RepositoryError> {
        let product = sqlx::query_as::<_, ProductDetail>(
            r"
            SELECT p.id, p.title, p.price, p.quantity, p.weight, p.description, p.image,
                   c.name AS category_name
            FROM products p
            JOIN categories c ON c.id = p.category_id
            WHERE p.id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }
}
