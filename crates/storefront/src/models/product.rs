//! Product read models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use apola_core::ProductId;

/// A product as listed in the landing page grid.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductCard {
    pub id: ProductId,
    pub title: String,
    pub price: Decimal,
    /// Storage path of the image.
    pub image: String,
    pub category_name: String,
    pub created_at: DateTime<Utc>,
}

/// A product with everything shown on its detail page.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductDetail {
    pub id: ProductId,
    pub title: String,
    pub price: Decimal,
    pub quantity: i32,
    /// Shipping weight in grams.
    pub weight: Decimal,
    pub description: String,
    pub image: String,
    pub category_name: String,
}
