//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Landing page (latest products)
//! GET  /products/{id}          - Product detail
//! GET  /health                 - Health check
//! GET  /health/ready           - Readiness check (database)
//! GET  /storage/...            - Uploaded images
//! ```

pub mod home;
pub mod products;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/products/{id}", get(products::show))
}
