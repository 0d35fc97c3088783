//! Shop profile models.

use chrono::{DateTime, Utc};
use serde::Serialize;

use apola_core::{CityId, ProvinceId};

/// The shop profile (a single row).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Shop {
    pub name: String,
    pub province_id: ProvinceId,
    pub city_id: CityId,
    /// Street address and other details.
    pub details: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated shop profile fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopInput {
    pub name: String,
    pub province_id: ProvinceId,
    pub city_id: CityId,
    pub details: String,
}
