//! Cached province and city lists.
//!
//! The reference data only changes when `apola-cli seed regions` runs, so
//! lists are cached for an hour. A reseed shows up in a running server once
//! the entries expire or the server restarts.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;
use tracing::{debug, instrument};

use apola_core::ProvinceId;

use crate::db::{RegionRepository, RepositoryError};
use crate::models::{City, Province};

/// How long region lists stay cached.
const REGION_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
enum CacheKey {
    Provinces,
    Cities(ProvinceId),
}

#[derive(Debug, Clone)]
enum CacheValue {
    Provinces(Arc<Vec<Province>>),
    Cities(Arc<Vec<City>>),
}

/// Read-through cache over [`RegionRepository`].
#[derive(Clone)]
pub struct RegionCache {
    cache: Cache<CacheKey, CacheValue>,
}

impl Default for RegionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        let cache = Cache::builder()
            .max_capacity(100)
            .time_to_live(REGION_TTL)
            .build();
        Self { cache }
    }

    /// All provinces, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the provinces could not be loaded.
    #[instrument(skip(self, pool))]
    pub async fn provinces(&self, pool: &PgPool) -> Result<Arc<Vec<Province>>, RepositoryError> {
        if let Some(CacheValue::Provinces(provinces)) = self.cache.get(&CacheKey::Provinces).await {
            debug!("Cache hit for provinces");
            return Ok(provinces);
        }

        let provinces = Arc::new(RegionRepository::new(pool).provinces().await?);
        self.cache
            .insert(CacheKey::Provinces, CacheValue::Provinces(Arc::clone(&provinces)))
            .await;
        Ok(provinces)
    }

    /// Cities of `province_id`, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the cities could not be loaded.
    #[instrument(skip(self, pool))]
    pub async fn cities(
        &self,
        pool: &PgPool,
        province_id: ProvinceId,
    ) -> Result<Arc<Vec<City>>, RepositoryError> {
        let key = CacheKey::Cities(province_id);
        if let Some(CacheValue::Cities(cities)) = self.cache.get(&key).await {
            debug!("Cache hit for cities");
            return Ok(cities);
        }

        let cities = Arc::new(RegionRepository::new(pool).cities_in(province_id).await?);
        self.cache
            .insert(key, CacheValue::Cities(Arc::clone(&cities)))
            .await;
        Ok(cities)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use sqlx::postgres::PgPoolOptions;

    use super::*;

    #[tokio::test]
    async fn test_failed_loads_are_not_cached() {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy("postgres://apola@127.0.0.1:1/apola")
            .unwrap();
        let regions = RegionCache::new();

        assert!(regions.provinces(&pool).await.is_err());
        assert!(regions.cities(&pool, ProvinceId::new(9)).await.is_err());

        regions.cache.run_pending_tasks().await;
        assert_eq!(regions.cache.entry_count(), 0);
    }
}
