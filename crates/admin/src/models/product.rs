//! Product domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use apola_core::{CategoryId, ProductId};

/// A product in the catalogue.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub category_id: CategoryId,
    pub title: String,
    /// Price in rupiah.
    pub price: Decimal,
    /// Units in stock.
    pub quantity: i32,
    /// Storage path of the product image (`public/images/...`).
    pub image: String,
    /// Shipping weight in grams.
    pub weight: Decimal,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A product joined with its category name, for listings.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductListing {
    pub id: ProductId,
    pub category_id: CategoryId,
    pub category_name: String,
    pub title: String,
    pub price: Decimal,
    pub quantity: i32,
    pub image: String,
    pub weight: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Validated product fields, as written on create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInput {
    pub category_id: CategoryId,
    pub title: String,
    pub price: Decimal,
    pub quantity: i32,
    pub weight: Decimal,
    pub description: String,
}
