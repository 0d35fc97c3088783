//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use rust_decimal::Decimal;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Format a decimal amount as rupiah: `Rp. 1.250.000`.
///
/// Usage in templates: `{{ product.price|rupiah }}`
#[askama::filter_fn]
pub fn rupiah(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let text = value.to_string();
    Ok(text
        .parse::<Decimal>()
        .map_or_else(|_| format!("Rp. {text}"), |amount| apola_core::Rupiah::new(amount).to_string()))
}

/// Format a number with Indonesian thousands separators: `12.500`.
#[askama::filter_fn]
pub fn number_id(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let text = value.to_string();
    Ok(text
        .parse::<Decimal>()
        .map_or(text, apola_core::format_number_id))
}

/// Public URL of a stored file path.
///
/// Usage in templates: `{{ product.image|storage_url }}`
#[askama::filter_fn]
pub fn storage_url(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(apola_core::storage::public_url(&value.to_string()))
}
