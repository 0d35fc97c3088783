//! Product detail route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use rust_decimal::Decimal;
use tracing::instrument;

use apola_core::{ProductId, Rupiah, format_number_id, storage::public_url};

use crate::db::{ProductRepository, ShopRepository};
use crate::error::AppError;
use crate::filters;
use crate::models::{ProductDetail, ShopAddress};
use crate::state::AppState;

/// Product detail display data for templates.
#[derive(Debug, Clone)]
pub struct ProductDetailView {
    pub id: ProductId,
    pub title: String,
    pub category: String,
    pub price: String,
    /// Weight with unit, e.g. `1.200 gram`.
    pub weight: String,
    pub in_stock: bool,
    pub stock: String,
    pub description: String,
    pub image_url: String,
}

impl From<ProductDetail> for ProductDetailView {
    fn from(product: ProductDetail) -> Self {
        Self {
            id: product.id,
            price: Rupiah::new(product.price).to_string(),
            weight: format!("{} gram", format_number_id(product.weight)),
            in_stock: product.quantity > 0,
            stock: format_number_id(Decimal::from(product.quantity)),
            image_url: public_url(&product.image),
            title: product.title,
            category: product.category_name,
            description: product.description,
        }
    }
}

/// Where the order ships from.
#[derive(Debug, Clone)]
pub struct ShipsFromView {
    pub name: String,
    pub locality: String,
}

impl From<ShopAddress> for ShipsFromView {
    fn from(address: ShopAddress) -> Self {
        Self {
            locality: address.locality(),
            name: address.name,
        }
    }
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductDetailView,
    pub ships_from: Option<ShipsFromView>,
}

/// Display a product detail page.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<ProductShowTemplate, AppError> {
    let pool = state.pool();

    let product = ProductRepository::new(pool)
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    // The page still renders without the shop address.
    let ships_from = ShopRepository::new(pool)
        .address()
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to fetch shop address: {e}");
            None
        })
        .map(ShipsFromView::from);

    Ok(ProductShowTemplate {
        product: ProductDetailView::from(product),
        ships_from,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn detail(quantity: i32) -> ProductDetail {
        ProductDetail {
            id: ProductId::new(3),
            title: "Celana Chino Slim Fit".to_string(),
            price: Decimal::new(249_500, 0),
            quantity,
            weight: Decimal::new(1200, 0),
            description: "Bahan katun stretch.".to_string(),
            image: "public/images/chino.png".to_string(),
            category_name: "Bawahan".to_string(),
        }
    }

    #[test]
    fn test_detail_view_formats_values() {
        let view = ProductDetailView::from(detail(1500));

        assert_eq!(view.price, "Rp. 249.500");
        assert_eq!(view.weight, "1.200 gram");
        assert_eq!(view.stock, "1.500");
        assert!(view.in_stock);
        assert_eq!(view.image_url, "/storage/images/chino.png");
        assert_eq!(view.category, "Bawahan");
    }

    #[test]
    fn test_detail_view_out_of_stock() {
        assert!(!ProductDetailView::from(detail(0)).in_stock);
    }

    #[test]
    fn test_show_template_without_shop_address() {
        let html = ProductShowTemplate {
            product: ProductDetailView::from(detail(0)),
            ships_from: None,
        }
        .render()
        .unwrap();

        assert!(html.contains("Celana Chino Slim Fit"));
        assert!(html.contains("Stok habis"));
        assert!(!html.contains("Dikirim dari"));
    }
}
