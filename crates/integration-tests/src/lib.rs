//! Integration tests for Apola.
//!
//! The tests in `tests/` talk to running servers over HTTP and are marked
//! `#[ignore]`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo run -p apola-cli -- migrate
//! cargo run -p apola-cli -- seed regions crates/cli/data/regions.yaml
//! cargo run -p apola-admin &
//! cargo run -p apola-storefront &
//! cargo test -p apola-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `ADMIN_URL` - Admin panel (default: `http://localhost:3001`)
//! - `STOREFRONT_URL` - Storefront (default: `http://localhost:3000`)
//! - `ADMIN_DATABASE_URL` - Database for fixtures (falls back to `DATABASE_URL`)

#![allow(clippy::missing_panics_doc)]

use reqwest::Client;
use reqwest::redirect::Policy;
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;

/// Base URL of the admin panel.
#[must_use]
pub fn admin_url() -> String {
    std::env::var("ADMIN_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// Base URL of the storefront.
#[must_use]
pub fn storefront_url() -> String {
    std::env::var("STOREFRONT_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// HTTP client that keeps cookies and does not follow redirects.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// Connect to the database used by the servers.
pub async fn pool() -> PgPool {
    let url = std::env::var("ADMIN_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .expect("ADMIN_DATABASE_URL or DATABASE_URL must be set");

    PgPool::connect(url.expose_secret())
        .await
        .expect("Failed to connect to database")
}

/// A category with a unique name, removed again by [`delete_category`].
pub async fn create_category(pool: &PgPool) -> i32 {
    let name = format!("Uji {}", uuid::Uuid::new_v4().simple());
    let (id,): (i32,) = sqlx::query_as("INSERT INTO categories (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .expect("Failed to create category");
    id
}

/// Remove a category and any products in it.
pub async fn delete_category(pool: &PgPool, id: i32) {
    let _ = sqlx::query("DELETE FROM products WHERE category_id = $1")
        .bind(id)
        .execute(pool)
        .await;
    let _ = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await;
}

/// Some seeded `(province_id, city_id)` pair.
pub async fn seeded_city(pool: &PgPool) -> (i32, i32) {
    sqlx::query_as("SELECT province_id, id FROM rajaongkir_cities ORDER BY id LIMIT 1")
        .fetch_one(pool)
        .await
        .expect("No cities seeded; run `apola-cli seed regions` first")
}
