//! Dashboard route handler.

use askama::Template;
use axum::{extract::State, response::Html};
use tracing::instrument;

use apola_core::format_number_id;
use rust_decimal::Decimal;

use crate::{
    db::{CategoryRepository, ProductRepository, ShopRepository},
    error::AppError,
    filters,
    models::Shop,
    state::AppState,
};

use super::render;

/// Dashboard metrics.
#[derive(Debug, Clone)]
pub struct DashboardMetrics {
    pub products: String,
    pub categories: String,
    pub stock: String,
}

impl DashboardMetrics {
    fn new(products: i64, categories: i64, stock: i64) -> Self {
        Self {
            products: format_number_id(Decimal::from(products)),
            categories: format_number_id(Decimal::from(categories)),
            stock: format_number_id(Decimal::from(stock)),
        }
    }
}

/// Dashboard template.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub current_path: String,
    pub metrics: DashboardMetrics,
    /// Saved shop name, `None` until the profile is filled in.
    pub shop_name: Option<String>,
}

fn shop_name(shop: Option<Shop>) -> Option<String> {
    shop.map(|s| s.name).filter(|name| !name.is_empty())
}

/// Dashboard page handler.
#[instrument(skip(state))]
pub async fn dashboard(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let pool = state.pool();
    let products = ProductRepository::new(pool);
    let categories = CategoryRepository::new(pool);
    let shops = ShopRepository::new(pool);

    let (product_count, stock, category_count, shop) = tokio::try_join!(
        products.count(),
        products.total_stock(),
        categories.count(),
        shops.get(),
    )?;

    let template = DashboardTemplate {
        current_path: "/".to_string(),
        metrics: DashboardMetrics::new(product_count, category_count, stock),
        shop_name: shop_name(shop),
    };

    Ok(render(&template))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_use_indonesian_grouping() {
        let metrics = DashboardMetrics::new(1_250, 12, 48_000);
        assert_eq!(metrics.products, "1.250");
        assert_eq!(metrics.categories, "12");
        assert_eq!(metrics.stock, "48.000");
    }
}
