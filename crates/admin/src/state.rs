//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AdminConfig;
use crate::services::{ImageStore, RegionCache};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: PgPool,
    images: ImageStore,
    regions: RegionCache,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: AdminConfig, pool: PgPool) -> Self {
        let images = ImageStore::new(config.storage_root.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                images,
                regions: RegionCache::new(),
            }),
        }
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the product image store.
    #[must_use]
    pub fn images(&self) -> &ImageStore {
        &self.inner.images
    }

    /// Get a reference to the province/city cache.
    #[must_use]
    pub fn regions(&self) -> &RegionCache {
        &self.inner.regions
    }
}

#[cfg(test)]
impl AppState {
    /// State backed by a pool that never connects, for handlers that do not
    /// reach the database.
    #[allow(clippy::unwrap_used)]
    pub(crate) fn for_tests() -> Self {
        use std::path::PathBuf;

        use secrecy::SecretString;

        let config = AdminConfig {
            database_url: SecretString::from("postgres://localhost/apola_test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3001,
            base_url: "http://localhost:3001".to_string(),
            storage_root: PathBuf::from("target/test-storage"),
            max_upload_bytes: 1024,
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        };
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/apola_test")
            .unwrap();

        Self::new(config, pool)
    }
}
