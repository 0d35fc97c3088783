//! Integration tests for product management.
//!
//! These tests require:
//! - A migrated database (`apola-cli migrate`)
//! - The admin server running (cargo run -p apola-admin)

use apola_integration_tests::{admin_url, client, create_category, delete_category, pool};
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};

/// A 1x1 transparent PNG.
const PIXEL_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

fn product_form(category_id: &str, title: &str, price: &str) -> Form {
    Form::new()
        .text("category_id", category_id.to_string())
        .text("title", title.to_string())
        .text("price", price.to_string())
        .text("quantity", "12")
        .text("weight", "250")
        .text("description", "Kaos katun combed 30s, nyaman dipakai harian.")
}

fn with_image(form: Form) -> Form {
    let part = Part::bytes(PIXEL_PNG)
        .file_name("kaos.png")
        .mime_str("image/png")
        .expect("valid mime");
    form.part("image", part)
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_empty_submission_is_rejected() {
    let resp = client()
        .post(format!("{}/products", admin_url()))
        .multipart(Form::new().text("title", ""))
        .send()
        .await
        .expect("Failed to submit product");

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("The category id field is required."));
    assert!(body.contains("The title field is required."));
    assert!(body.contains("The price field is required."));
    assert!(body.contains("The image field is required."));
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_non_numeric_price_and_unknown_category() {
    let form = with_image(product_form("2147483647", "Kaos Polos Hitam", "mahal"));
    let resp = client()
        .post(format!("{}/products", admin_url()))
        .multipart(form)
        .send()
        .await
        .expect("Failed to submit product");

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("The price field must be a number."));
    assert!(body.contains("The selected category id is invalid."));
    assert!(body.contains("Kaos Polos Hitam"));
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_html_upload_and_oversized_price_are_rejected() {
    let page = Part::bytes(b"<script>alert(1)</script>".as_slice())
        .file_name("kaos.html")
        .mime_str("text/html")
        .expect("valid mime");
    let form = product_form("2147483647", "Kaos Polos Hitam", "10000000000000").part("image", page);
    let resp = client()
        .post(format!("{}/products", admin_url()))
        .multipart(form)
        .send()
        .await
        .expect("Failed to submit product");

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("The image field must be an image."));
    assert!(
        body.contains("The price field must not have more than 12 digits before the decimal point.")
    );
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_valid_submission_persists_and_redirects() {
    let pool = pool().await;
    let category_id = create_category(&pool).await;
    let title = format!("Kaos Uji {category_id}");

    let form = with_image(product_form(&category_id.to_string(), &title, "125000"));
    let resp = client()
        .post(format!("{}/products", admin_url()))
        .multipart(form)
        .send()
        .await
        .expect("Failed to submit product");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers()
            .get("location")
            .and_then(|v| v.to_str().ok()),
        Some("/products")
    );

    let (image,): (String,) =
        sqlx::query_as("SELECT image FROM products WHERE category_id = $1 AND title = $2")
            .bind(category_id)
            .bind(&title)
            .fetch_one(&pool)
            .await
            .expect("Product was not saved");
    assert!(image.starts_with("public/images/"));
    assert!(image.ends_with(".png"));

    delete_category(&pool, category_id).await;
}
