//! Category domain models.

use chrono::{DateTime, Utc};
use serde::Serialize;

use apola_core::CategoryId;

/// A product category.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A category with the number of products filed under it.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CategoryWithCount {
    pub id: CategoryId,
    pub name: String,
    pub product_count: i64,
}
