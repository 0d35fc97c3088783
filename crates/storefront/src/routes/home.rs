//! Landing page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use apola_core::{ProductId, Rupiah, storage::public_url, text::limit};

use crate::db::ProductRepository;
use crate::filters;
use crate::models::ProductCard;
use crate::state::AppState;

/// Number of products in the landing page grid.
pub const LATEST_PRODUCTS: i64 = 6;

const CATEGORY_LIMIT: usize = 13;
const TITLE_LIMIT: usize = 50;

/// Product card display data for templates.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: ProductId,
    pub title: String,
    /// Full title for the image alt text.
    pub alt: String,
    pub category: String,
    pub price: String,
    pub image_url: String,
}

impl From<&ProductCard> for ProductView {
    fn from(product: &ProductCard) -> Self {
        Self {
            id: product.id,
            title: limit(&product.title, TITLE_LIMIT, "..."),
            alt: product.title.clone(),
            category: limit(&product.category_name, CATEGORY_LIMIT, "..."),
            price: Rupiah::new(product.price).to_string(),
            image_url: public_url(&product.image),
        }
    }
}

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub products: Vec<ProductView>,
}

/// Display the landing page.
///
/// A failed query is logged and the grid rendered empty.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let products = ProductRepository::new(state.pool())
        .latest(LATEST_PRODUCTS)
        .await
        .map_or_else(
            |e| {
                tracing::error!("Failed to fetch latest products: {e}");
                Vec::new()
            },
            |products| products.iter().map(ProductView::from).collect(),
        );

    HomeTemplate { products }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use super::*;

    fn card(title: &str, category: &str) -> ProductCard {
        ProductCard {
            id: ProductId::new(7),
            title: title.to_string(),
            price: Decimal::new(125_000_000, 2),
            image: "public/images/3f2b.jpg".to_string(),
            category_name: category.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_product_view_formats_card() {
        let view = ProductView::from(&card("Kaos Polos", "Atasan"));

        assert_eq!(view.id, ProductId::new(7));
        assert_eq!(view.title, "Kaos Polos");
        assert_eq!(view.category, "Atasan");
        assert_eq!(view.price, "Rp. 1.250.000");
        assert_eq!(view.image_url, "/storage/images/3f2b.jpg");
    }

    #[test]
    fn test_product_view_truncates_long_names() {
        let title = "Kemeja Flanel Kotak Lengan Panjang Bahan Katun Premium Pria";
        let view = ProductView::from(&card(title, "Pakaian Wanita Muslim"));

        assert_eq!(view.category, "Pakaian Wanit...");
        assert_eq!(view.title.chars().count(), TITLE_LIMIT + 3);
        assert!(view.title.ends_with("..."));
        assert_eq!(view.alt, title);
    }

    #[test]
    fn test_home_template_renders_empty_grid() {
        let html = HomeTemplate { products: Vec::new() }.render().unwrap();
        assert!(html.contains("Koleksi Kami"));
        assert!(!html.contains("Beli Sekarang</a>"));
    }

    #[test]
    fn test_home_template_links_products() {
        let html = HomeTemplate {
            products: vec![ProductView::from(&card("Kaos Polos", "Atasan"))],
        }
        .render()
        .unwrap();

        assert!(html.contains("href=\"/products/7\""));
        assert!(html.contains("Rp. 1.250.000"));
        assert!(html.contains("/storage/images/3f2b.jpg"));
    }
}
