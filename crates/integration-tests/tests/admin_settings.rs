//! Integration tests for the shop settings form.
//!
//! These tests require:
//! - A migrated and seeded database (`apola-cli migrate`, `apola-cli seed regions`)
//! - The admin server running (cargo run -p apola-admin)

use apola_integration_tests::{admin_url, client, pool, seeded_city};
use reqwest::StatusCode;

const DETAILS: &str = "Jl. Asia Afrika No. 8, Braga, Sumur Bandung";

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_empty_submission_lists_required_fields() {
    let resp = client()
        .post(format!("{}/settings", admin_url()))
        .form(&[("name", ""), ("province_id", ""), ("city_id", ""), ("details", "")])
        .send()
        .await
        .expect("Failed to submit settings");

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp.headers().get("HX-Trigger").is_none());

    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("The name field is required."));
    assert!(body.contains("The province id field is required."));
    assert!(body.contains("The city id field is required."));
    assert!(body.contains("The details field is required."));
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_htmx_failure_returns_fragment() {
    let resp = client()
        .post(format!("{}/settings", admin_url()))
        .header("HX-Request", "true")
        .form(&[
            ("name", "Toko"),
            ("province_id", "-1"),
            ("city_id", "-1"),
            ("details", "Jl. Merdeka"),
        ])
        .send()
        .await
        .expect("Failed to submit settings");

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get("HX-Trigger").is_none());

    let body = resp.text().await.expect("Failed to read body");
    assert!(!body.contains("<html"));
    assert!(body.contains("The name field must be at least 5 characters."));
    assert!(body.contains("The selected province id is invalid."));
    assert!(body.contains("The details field must be at least 20 characters."));
}

#[tokio::test]
#[ignore = "Requires running admin server and seeded regions"]
async fn test_valid_submission_fires_address_update() {
    let pool = pool().await;
    let (province_id, city_id) = seeded_city(&pool).await;

    let resp = client()
        .post(format!("{}/settings", admin_url()))
        .header("HX-Request", "true")
        .form(&[
            ("name", "Apola Store".to_string()),
            ("province_id", province_id.to_string()),
            ("city_id", city_id.to_string()),
            ("details", DETAILS.to_string()),
        ])
        .send()
        .await
        .expect("Failed to submit settings");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get("HX-Trigger")
            .and_then(|v| v.to_str().ok()),
        Some("address-update")
    );

    let (name, details): (String, String) =
        sqlx::query_as("SELECT name, details FROM shops WHERE id = 1")
            .fetch_one(&pool)
            .await
            .expect("Shop profile was not saved");
    assert_eq!(name, "Apola Store");
    assert_eq!(details, DETAILS);
}

#[tokio::test]
#[ignore = "Requires running admin server and seeded regions"]
async fn test_city_options_for_province() {
    let pool = pool().await;
    let (province_id, city_id) = seeded_city(&pool).await;

    let resp = client()
        .get(format!(
            "{}/settings/cities?province_id={province_id}",
            admin_url()
        ))
        .send()
        .await
        .expect("Failed to load cities");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("Pick one"));
    assert!(body.contains(&format!("value=\"{city_id}\"")));
}
