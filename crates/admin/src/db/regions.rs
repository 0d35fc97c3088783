//! Province and city reference data.

use sqlx::PgPool;
use tracing::instrument;

use apola_core::ProvinceId;

use super::RepositoryError;
use crate::models::{City, Province};

/// Repository for region reference data.
pub struct RegionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RegionRepository<'a> {
    /// Create a new region repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All provinces by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn provinces(&self) -> Result<Vec<Province>, RepositoryError> {
        let provinces = sqlx::query_as::<_, Province>(
            "SELECT id, name FROM rajaongkir_provinces ORDER BY name ASC, id ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(provinces)
    }

    /// Cities of a province by name. Empty for an unknown province.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn cities_in(&self, province_id: ProvinceId) -> Result<Vec<City>, RepositoryError> {
        let cities = sqlx::query_as::<_, City>(
            r"
            SELECT id, province_id, city_type, name, postal_code
            FROM rajaongkir_cities
            WHERE province_id = $1
            ORDER BY name ASC, id ASC
            ",
        )
        .bind(province_id)
        .fetch_all(self.pool)
        .await?;

        Ok(cities)
    }

    /// Insert or rename a province.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    #[instrument(skip(self, province), fields(id = %province.id))]
    pub async fn upsert_province(&self, province: &Province) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO rajaongkir_provinces (id, name)
            VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name
            ",
        )
        .bind(province.id)
        .bind(&province.name)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Insert or update a city.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails, including when
    /// the city's province does not exist.
    #[instrument(skip(self, city), fields(id = %city.id))]
    pub async fn upsert_city(&self, city: &City) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO rajaongkir_cities (id, province_id, city_type, name, postal_code)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
            SET province_id = EXCLUDED.province_id,
                city_type = EXCLUDED.city_type,
                name = EXCLUDED.name,
                postal_code = EXCLUDED.postal_code
            ",
        )
        .bind(city.id)
        .bind(city.province_id)
        .bind(&city.city_type)
        .bind(&city.name)
        .bind(&city.postal_code)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Number of provinces and cities loaded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<(i64, i64), RepositoryError> {
        let counts: (i64, i64) = sqlx::query_as(
            r"
            SELECT (SELECT COUNT(*) FROM rajaongkir_provinces),
                   (SELECT COUNT(*) FROM rajaongkir_cities)
            ",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(counts)
    }
}
