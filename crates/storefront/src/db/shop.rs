//! Shop profile query.

use sqlx::PgPool;

use super::RepositoryError;
use crate::models::ShopAddress;

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

    /// The shop's address, or `None` before the profile is saved.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn address(&self) -> Result<Option<ShopAddress>, RepositoryError> {
        let address = sqlx::query_as::<_, ShopAddress>(
            r"
            SELECT s.name, s.details, c.city_type, c.name AS city_name, c.postal_code,
                   p.name AS province_name
            FROM shops s
            JOIN rajaongkir_cities c ON c.id = s.city_id
            JOIN rajaongkir_provinces p ON p.id = s.province_id
            WHERE s.id = 1
            ",
        )
        .fetch_optional(self.pool)
        .await?;

        Ok(address)
    }
}
