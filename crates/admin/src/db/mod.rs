//! Database operations for the Apola `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `categories` - Product categories
//! - `products` - Catalogue (image paths point into file storage)
//! - `shops` - Shop profile, singleton row
//! - `rajaongkir_provinces` / `rajaongkir_cities` - Reference address data
//! - `admin.session` - Tower-sessions storage
//!
//! # Migrations
//!
//! Migrations are stored in `crates/cli/migrations/` and run via:
//! ```bash
//! cargo run -p apola-cli -- migrate
//! ```

pub mod categories;
pub mod products;
pub mod regions;
pub mod shop;

use std::time::Duration;

use apola_core::Lookup;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use categories::CategoryRepository;
pub use products::ProductRepository;
pub use regions::RegionRepository;
pub use shop::ShopRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (unique value, referenced row).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Map a write failure, turning constraint violations into `Conflict`.
pub(crate) fn map_write_error(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.is_unique_violation() {
            return RepositoryError::Conflict(format!("{what} already exists"));
        }
        if db_err.is_foreign_key_violation() {
            return RepositoryError::Conflict(format!("{what} is referenced by other records"));
        }
    }
    RepositoryError::Database(e)
}

/// Check whether the row referenced by an `exists` validation rule is present.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn lookup_exists(pool: &PgPool, lookup: Lookup, id: i32) -> Result<bool, RepositoryError> {
    let sql = match lookup {
        Lookup::Category => "SELECT EXISTS (SELECT 1 FROM categories WHERE id = $1)",
        Lookup::Province => "SELECT EXISTS (SELECT 1 FROM rajaongkir_provinces WHERE id = $1)",
        Lookup::City => "SELECT EXISTS (SELECT 1 FROM rajaongkir_cities WHERE id = $1)",
    };

    let (exists,): (bool,) = sqlx::query_as(sql).bind(id).fetch_one(pool).await?;
    Ok(exists)
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
