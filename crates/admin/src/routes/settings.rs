//! Shop settings route handlers.
//!
//! The shop profile form is an HTMX fragment. Changing the province reloads
//! the city options from `/settings/cities`, which also points the address
//! bar at `/settings?province_id=<id>` through `HX-Replace-Url`; saving swaps
//! the fragment and fires the `address-update` event through `HX-Trigger`.

use std::collections::HashMap;

use askama::Template;
use axum::{
    Form,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use apola_core::{Lookup, ProvinceId, Rule, Ruleset, ValidationErrors};

use crate::{
    db::{self, RepositoryError, ShopRepository},
    error::AppError,
    filters,
    models::{City, Shop, ShopInput},
    state::AppState,
};

use super::{is_htmx, render};

/// Event fired on the client after the profile is saved.
pub const ADDRESS_UPDATE_EVENT: &str = "address-update";

/// Response header HTMX reads to replace the browser URL.
const HX_REPLACE_URL: &str = "HX-Replace-Url";

/// Validation rules for the shop profile.
#[must_use]
pub fn settings_rules() -> Ruleset {
    Ruleset::new()
        .field("name", &[Rule::Required, Rule::Min(5)])
        .field("province_id", &[Rule::Required, Rule::Exists(Lookup::Province)])
        .field("city_id", &[Rule::Required, Rule::Exists(Lookup::City)])
        .field("details", &[Rule::Required, Rule::Min(20)])
}

// =============================================================================
// Views
// =============================================================================

/// Values shown in the shop profile inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShopFormView {
    pub name: String,
    pub province_id: String,
    pub city_id: String,
    pub details: String,
}

impl ShopFormView {
    fn from_input(input: &HashMap<String, String>) -> Self {
        let value = |field: &str| input.get(field).cloned().unwrap_or_default();
        Self {
            name: value("name"),
            province_id: value("province_id"),
            city_id: value("city_id"),
            details: value("details"),
        }
    }

    fn from_shop(shop: Option<&Shop>) -> Self {
        shop.map_or_else(Self::default, |shop| Self {
            name: shop.name.clone(),
            province_id: shop.province_id.to_string(),
            city_id: shop.city_id.to_string(),
            details: shop.details.clone(),
        })
    }

    fn to_input(&self) -> Option<ShopInput> {
        Some(ShopInput {
            name: self.name.trim().to_owned(),
            province_id: self.province_id.parse().ok()?,
            city_id: self.city_id.parse().ok()?,
            details: self.details.trim().to_owned(),
        })
    }
}

/// An option in a select input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    fn new(value: impl ToString, label: String, current: &str) -> Self {
        let value = value.to_string();
        Self {
            selected: value == current.trim(),
            value,
            label,
        }
    }
}

fn city_options(cities: &[City], current: &str) -> Vec<SelectOption> {
    cities
        .iter()
        .map(|c| SelectOption::new(c.id, c.display_name(), current))
        .collect()
}

/// Settings page template.
#[derive(Template)]
#[template(path = "settings/index.html")]
pub struct SettingsPageTemplate {
    pub current_path: String,
    pub form: ShopFormView,
    pub errors: ValidationErrors,
    pub provinces: Vec<SelectOption>,
    pub cities: Vec<SelectOption>,
    pub saved: bool,
}

/// Shop profile form fragment.
#[derive(Template)]
#[template(path = "settings/_form.html")]
pub struct SettingsFormTemplate {
    pub form: ShopFormView,
    pub errors: ValidationErrors,
    pub provinces: Vec<SelectOption>,
    pub cities: Vec<SelectOption>,
    pub saved: bool,
}

/// City `<option>` list fragment.
#[derive(Template)]
#[template(path = "settings/_city_options.html")]
pub struct CityOptionsTemplate {
    pub cities: Vec<SelectOption>,
}

impl From<SettingsFormTemplate> for SettingsPageTemplate {
    fn from(fragment: SettingsFormTemplate) -> Self {
        Self {
            current_path: "/settings".to_string(),
            form: fragment.form,
            errors: fragment.errors,
            provinces: fragment.provinces,
            cities: fragment.cities,
            saved: fragment.saved,
        }
    }
}

/// Build the form fragment with province and city options for `form`.
async fn form_fragment(
    state: &AppState,
    form: ShopFormView,
    errors: ValidationErrors,
    saved: bool,
) -> Result<SettingsFormTemplate, AppError> {
    let regions = state.regions();

    let provinces = regions
        .provinces(state.pool())
        .await?
        .iter()
        .map(|p| SelectOption::new(p.id, p.name.clone(), &form.province_id))
        .collect();

    let cities = match form.province_id.parse::<ProvinceId>() {
        Ok(province_id) => city_options(
            &regions.cities(state.pool(), province_id).await?,
            &form.city_id,
        ),
        Err(_) => Vec::new(),
    };

    Ok(SettingsFormTemplate {
        form,
        errors,
        provinces,
        cities,
        saved,
    })
}

// =============================================================================
// Handlers
// =============================================================================

/// Query parameters for the settings page and city options.
#[derive(Debug, Default, Deserialize)]
pub struct ProvinceQuery {
    pub province_id: Option<String>,
    pub city_id: Option<String>,
}

/// Settings page handler.
///
/// A `province_id` query parameter overrides the stored province.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Query(query): Query<ProvinceQuery>,
) -> Result<Html<String>, AppError> {
    let shop = ShopRepository::new(state.pool()).get().await?;
    let mut form = ShopFormView::from_shop(shop.as_ref());

    if let Some(province_id) = query.province_id.filter(|p| !p.trim().is_empty()) {
        form.province_id = province_id;
    }

    let fragment = form_fragment(&state, form, ValidationErrors::default(), false).await?;
    Ok(render(&SettingsPageTemplate::from(fragment)))
}

/// City options handler for the province select.
///
/// Unknown or missing provinces yield only the placeholder option. A valid
/// or cleared province also replaces the browser URL with the settings page
/// for that province, so a reload keeps the selection.
#[instrument(skip(state))]
pub async fn cities(
    State(state): State<AppState>,
    Query(query): Query<ProvinceQuery>,
) -> Result<Response, AppError> {
    let current = query.city_id.unwrap_or_default();
    let requested = query.province_id.as_deref().map(str::trim);
    let province_id = requested.and_then(|p| p.parse::<ProvinceId>().ok());

    let cities = match province_id {
        Some(province_id) => city_options(
            &state.regions().cities(state.pool(), province_id).await?,
            &current,
        ),
        None => Vec::new(),
    };
    let body = render(&CityOptionsTemplate { cities });

    match (requested, province_id) {
        (Some(_), Some(_)) | (Some(""), None) => {
            Ok(([(HX_REPLACE_URL, settings_url(province_id))], body).into_response())
        }
        _ => Ok(body.into_response()),
    }
}

/// Settings page address for a chosen province.
fn settings_url(province_id: Option<ProvinceId>) -> String {
    province_id.map_or_else(
        || "/settings".to_string(),
        |id| format!("/settings?province_id={id}"),
    )
}

/// Save shop profile handler.
///
/// HTMX requests get the form fragment back (HTTP 200 so it is swapped in);
/// plain posts get the whole page, with HTTP 422 when validation fails.
#[instrument(skip(state, headers, input))]
pub async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(input): Form<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let pool = state.pool();
    let verdict = settings_rules()
        .validate(&input)
        .finish(|lookup, id| db::lookup_exists(pool, lookup, id))
        .await?;

    let form = ShopFormView::from_input(&input);

    let errors = match verdict {
        Ok(()) => {
            let shop_input = form
                .to_input()
                .ok_or_else(|| AppError::BadRequest("malformed shop form".to_string()))?;

            match ShopRepository::new(pool).upsert(&shop_input).await {
                Ok(shop) => {
                    tracing::info!(name = %shop.name, city_id = %shop.city_id, "Shop profile saved");
                    None
                }
                Err(RepositoryError::Conflict(_)) => Some(stale_region(&shop_input)),
                Err(e) => return Err(e.into()),
            }
        }
        Err(errors) => Some(errors),
    };

    let saved = errors.is_none();
    let fragment = form_fragment(&state, form, errors.unwrap_or_default(), saved).await?;

    let status = if saved || is_htmx(&headers) {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };

    let body = if is_htmx(&headers) {
        render(&fragment)
    } else {
        render(&SettingsPageTemplate::from(fragment))
    };

    if saved {
        Ok((status, [("HX-Trigger", ADDRESS_UPDATE_EVENT)], body).into_response())
    } else {
        Ok((status, body).into_response())
    }
}

/// Messages for a province or city removed between validation and the write.
fn stale_region(input: &ShopInput) -> ValidationErrors {
    tracing::warn!(
        province_id = %input.province_id,
        city_id = %input.city_id,
        "Region disappeared while saving shop profile"
    );
    let mut errors = ValidationErrors::default();
    errors.add("city_id", "The selected city id is invalid.");
    errors
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use apola_core::{CityId, FormInput};

    use super::*;

    fn input(values: &[(&str, &str)]) -> HashMap<String, String> {
        values
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_required_fields() {
        let validation = settings_rules().validate(&input(&[]));
        let errors = validation.errors();

        assert_eq!(errors.first("name"), Some("The name field is required."));
        assert_eq!(
            errors.first("province_id"),
            Some("The province id field is required.")
        );
        assert_eq!(errors.first("city_id"), Some("The city id field is required."));
        assert_eq!(errors.first("details"), Some("The details field is required."));
    }

    #[test]
    fn test_minimum_lengths() {
        let validation = settings_rules().validate(&input(&[
            ("name", "Toko"),
            ("province_id", "9"),
            ("city_id", "23"),
            ("details", "Jl. Merdeka 1"),
        ]));
        let errors = validation.errors();

        assert_eq!(
            errors.first("name"),
            Some("The name field must be at least 5 characters.")
        );
        assert_eq!(
            errors.first("details"),
            Some("The details field must be at least 20 characters.")
        );
        assert_eq!(validation.pending().len(), 2);
    }

    #[test]
    fn test_placeholder_option_is_rejected() {
        let validation =
            settings_rules().validate(&input(&[("province_id", ""), ("city_id", "Pick one")]));
        let errors = validation.errors();

        assert_eq!(
            errors.first("province_id"),
            Some("The province id field is required.")
        );
        assert_eq!(errors.first("city_id"), Some("The selected city id is invalid."));
    }

    #[test]
    fn test_form_view_to_input() {
        let form = ShopFormView::from_input(&input(&[
            ("name", " Apola Store "),
            ("province_id", "9"),
            ("city_id", "23"),
            ("details", "Jl. Asia Afrika No. 8, Bandung"),
        ]));
        let shop = form.to_input().unwrap();

        assert_eq!(shop.name, "Apola Store");
        assert_eq!(shop.province_id, ProvinceId::new(9));
        assert_eq!(shop.city_id, CityId::new(23));
    }

    #[test]
    fn test_settings_url_carries_province() {
        assert_eq!(
            settings_url(Some(ProvinceId::new(9))),
            "/settings?province_id=9"
        );
        assert_eq!(settings_url(None), "/settings");
    }

    #[test]
    fn test_select_option_marks_current() {
        let option = SelectOption::new(23, "Kota Bandung".to_string(), " 23 ");
        assert!(option.selected);
        assert!(!SelectOption::new(24, "Kota Cimahi".to_string(), "23").selected);
    }

    #[test]
    fn test_form_input_reads_hash_map() {
        let values = input(&[("name", "Apola")]);
        assert_eq!(FormInput::value(&values, "name"), Some("Apola"));
    }
}
