//! Shop profile repository.
//!
//! The `shops` table holds at most one row (`id = 1`); saving the profile is
//! an upsert on that row.

use sqlx::PgPool;
use tracing::{debug, instrument};

use super::{RepositoryError, map_write_error};
use crate::models::{Shop, ShopInput};

/// Repository for the shop profile.
pub struct ShopRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ShopRepository<'a> {
    /// Create a new shop repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the shop profile, if it has been saved.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self) -> Result<Option<Shop>, RepositoryError> {
        let shop = sqlx::query_as::<_, Shop>(
            r"
            SELECT name, province_id, city_id, details, created_at, updated_at
            FROM shops
            WHERE id = 1
            ",
        )
        .fetch_optional(self.pool)
        .await?;

        Ok(shop)
    }

    /// Create the shop profile or overwrite it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the province or city is unknown.
    /// Returns `RepositoryError::Database` if the write fails.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn upsert(&self, input: &ShopInput) -> Result<Shop, RepositoryError> {
        let shop = sqlx::query_as::<_, Shop>(
            r"
            INSERT INTO shops (id, name, province_id, city_id, details)
            VALUES (1, $1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name,
                province_id = EXCLUDED.province_id,
                city_id = EXCLUDED.city_id,
                details = EXCLUDED.details,
                updated_at = NOW()
            RETURNING name, province_id, city_id, details, created_at, updated_at
            ",
        )
        .bind(&input.name)
        .bind(input.province_id)
        .bind(input.city_id)
        .bind(&input.details)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_write_error(e, "shop address"))?;

        debug!("Saved shop profile");
        Ok(shop)
    }
}
