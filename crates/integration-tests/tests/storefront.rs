//! Integration tests for the public storefront.
//!
//! Requires the storefront running (cargo run -p apola-storefront).

use apola_integration_tests::{client, storefront_url};
use reqwest::StatusCode;

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_health() {
    let resp = client()
        .get(format!("{}/health", storefront_url()))
        .send()
        .await
        .expect("Failed to reach storefront");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.expect("Failed to read body"), "ok");
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_readiness() {
    let resp = client()
        .get(format!("{}/health/ready", storefront_url()))
        .send()
        .await
        .expect("Failed to reach storefront");

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_home_lists_collection() {
    let resp = client()
        .get(storefront_url())
        .send()
        .await
        .expect("Failed to reach storefront");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("Selamat Datang"));
    assert!(body.contains("| Koleksi Kami"));
    assert!(body.contains("Lihat apa yang bisa kamu temukan disini"));
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_missing_product_is_not_found() {
    let resp = client()
        .get(format!("{}/products/{}", storefront_url(), i32::MAX))
        .send()
        .await
        .expect("Failed to reach storefront");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
