//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! # Dashboard
//! GET  /                          - Catalogue counts and shop profile status
//!
//! # Products
//! GET  /products                  - Product listing
//! GET  /products/create           - New product form
//! POST /products                  - Store product (multipart)
//! GET  /products/{id}/edit        - Edit product form
//! POST /products/{id}             - Update product (multipart)
//! POST /products/{id}/delete      - Delete product and its image
//!
//! # Categories
//! GET  /categories                - Category listing with product counts
//! POST /categories                - Create category
//! POST /categories/{id}/delete    - Delete category (refused while in use)
//!
//! # Settings
//! GET  /settings                  - Shop profile form
//! POST /settings                  - Save shop profile (HTMX)
//! GET  /settings/cities           - City options for a province (HTMX)
//! ```

pub mod categories;
pub mod dashboard;
pub mod products;
pub mod settings;

use askama::Template;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderMap,
    response::Html,
    routing::{get, post},
};

use crate::state::AppState;

/// Build the admin router.
///
/// `max_upload_bytes` bounds the product form bodies.
pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    let product_routes = Router::new()
        .route("/products", get(products::index).post(products::store))
        .route("/products/create", get(products::create))
        .route("/products/{id}", post(products::update))
        .route("/products/{id}/edit", get(products::edit))
        .route("/products/{id}/delete", post(products::destroy))
        .layer(DefaultBodyLimit::max(max_upload_bytes));

    Router::new()
        .route("/", get(dashboard::dashboard))
        .merge(product_routes)
        .route("/categories", get(categories::index).post(categories::store))
        .route("/categories/{id}/delete", post(categories::destroy))
        .route("/settings", get(settings::show).post(settings::submit))
        .route("/settings/cities", get(settings::cities))
}

/// Render a template, falling back to a plain error body.
pub(crate) fn render(template: &impl Template) -> Html<String> {
    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    }))
}

/// Whether the request was issued by HTMX.
pub(crate) fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("HX-Request")
        .is_some_and(|v| v.as_bytes() == b"true")
}
