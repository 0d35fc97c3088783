//! Product management route handlers.
//!
//! Create and edit share one multipart form. A failed submission re-renders
//! the form with the submitted values and HTTP 422; nothing is written to
//! disk until the form validates.

use std::collections::HashMap;

use askama::Template;
use axum::{
    extract::{Multipart, Path, State, multipart::MultipartError},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use apola_core::{
    CategoryId, FormInput, Lookup, ProductId, Rule, Ruleset, ValidationErrors, parse_decimal,
    storage::public_url,
};

use crate::{
    db::{self, CategoryRepository, ProductRepository, RepositoryError},
    error::AppError,
    filters,
    middleware::{set_flash, take_flash},
    models::{Flash, Product, ProductInput, ProductListing},
    services::Upload,
    state::AppState,
};

use super::render;

/// Text fields read from the product form.
const TEXT_FIELDS: [&str; 6] = [
    "category_id",
    "title",
    "price",
    "quantity",
    "weight",
    "description",
];

/// Content type assumed for a file part that names none.
const UNKNOWN_CONTENT_TYPE: &str = "application/octet-stream";

/// Validation rules for the product form.
///
/// The image is only required when creating; on edit a missing upload keeps
/// the stored image. Price and weight are bounded by their `NUMERIC(14,2)`
/// and `NUMERIC(10,2)` columns.
#[must_use]
pub fn product_rules(require_image: bool) -> Ruleset {
    let image_rules: &[Rule] = if require_image {
        &[Rule::Required, Rule::Image]
    } else {
        &[Rule::Image]
    };

    Ruleset::new()
        .field("category_id", &[Rule::Required, Rule::Exists(Lookup::Category)])
        .field("title", &[Rule::Required, Rule::Min(5)])
        .field(
            "price",
            &[Rule::Required, Rule::Numeric, Rule::Decimal { precision: 14, scale: 2 }],
        )
        .field("quantity", &[Rule::Required, Rule::Numeric, Rule::Integer])
        .field("image", image_rules)
        .field(
            "weight",
            &[Rule::Required, Rule::Numeric, Rule::Decimal { precision: 10, scale: 2 }],
        )
        .field("description", &[Rule::Required, Rule::Min(10)])
}

// =============================================================================
// Form Input
// =============================================================================

/// A submitted product form.
#[derive(Debug, Default)]
pub struct ProductForm {
    values: HashMap<String, String>,
    image: Option<Upload>,
}

impl ProductForm {
    /// Read the form from a multipart body.
    ///
    /// An empty file part (no file chosen) counts as no upload.
    ///
    /// # Errors
    ///
    /// Returns `MultipartError` if the body is malformed or over the limit.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, MultipartError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            if name == "image" {
                let file_name = field.file_name().map(str::to_owned);
                let content_type = field.content_type().map(str::to_owned);
                let bytes = field.bytes().await?;
                if !bytes.is_empty() {
                    form.image = Some(Upload {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            } else if TEXT_FIELDS.contains(&name.as_str()) {
                let text = field.text().await?;
                form.values.insert(name, text);
            }
        }

        Ok(form)
    }

    /// The uploaded image, if one was chosen.
    #[must_use]
    pub const fn image(&self) -> Option<&Upload> {
        self.image.as_ref()
    }

    fn trimmed(&self, field: &str) -> &str {
        self.values.get(field).map_or("", |v| v.trim())
    }

    /// Convert a validated form into typed fields.
    ///
    /// Returns `None` if a field does not parse, which validation rules out.
    #[must_use]
    pub fn to_input(&self) -> Option<ProductInput> {
        Some(ProductInput {
            category_id: self.trimmed("category_id").parse::<CategoryId>().ok()?,
            title: self.trimmed("title").to_owned(),
            price: parse_decimal(self.trimmed("price"))?,
            quantity: self.trimmed("quantity").parse().ok()?,
            weight: parse_decimal(self.trimmed("weight"))?,
            description: self.trimmed("description").to_owned(),
        })
    }
}

impl FormInput for ProductForm {
    fn value(&self, field: &str) -> Option<&str> {
        if field == "image" {
            return self
                .image
                .as_ref()
                .map(|upload| upload.content_type.as_deref().unwrap_or(UNKNOWN_CONTENT_TYPE));
        }
        self.values.get(field).map(String::as_str)
    }
}

// =============================================================================
// Views
// =============================================================================

/// Values shown in the product form inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFormView {
    pub category_id: String,
    pub title: String,
    pub price: String,
    pub quantity: String,
    pub weight: String,
    pub description: String,
}

impl From<&ProductForm> for ProductFormView {
    fn from(form: &ProductForm) -> Self {
        let value = |field: &str| form.values.get(field).cloned().unwrap_or_default();
        Self {
            category_id: value("category_id"),
            title: value("title"),
            price: value("price"),
            quantity: value("quantity"),
            weight: value("weight"),
            description: value("description"),
        }
    }
}

impl From<&Product> for ProductFormView {
    fn from(product: &Product) -> Self {
        Self {
            category_id: product.category_id.to_string(),
            title: product.title.clone(),
            price: product.price.normalize().to_string(),
            quantity: product.quantity.to_string(),
            weight: product.weight.normalize().to_string(),
            description: product.description.clone(),
        }
    }
}

/// Category option in the form select.
#[derive(Debug, Clone)]
pub struct CategoryOption {
    pub id: String,
    pub name: String,
    pub selected: bool,
}

/// Product row in the listing.
#[derive(Debug, Clone)]
pub struct ProductRowView {
    pub id: ProductId,
    pub title: String,
    pub category_name: String,
    pub price: String,
    pub quantity: i32,
    pub weight: String,
    pub image_url: String,
}

impl From<&ProductListing> for ProductRowView {
    fn from(product: &ProductListing) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            category_name: product.category_name.clone(),
            price: apola_core::Rupiah::new(product.price).to_string(),
            quantity: product.quantity,
            weight: apola_core::format_number_id(product.weight),
            image_url: public_url(&product.image),
        }
    }
}

/// Product listing template.
#[derive(Template)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub current_path: String,
    pub flash: Option<Flash>,
    pub products: Vec<ProductRowView>,
}

/// Product create/edit form template.
#[derive(Template)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub current_path: String,
    pub heading: String,
    pub action: String,
    pub form: ProductFormView,
    pub errors: ValidationErrors,
    pub categories: Vec<CategoryOption>,
    pub image_url: Option<String>,
    pub image_required: bool,
}

/// Which form is being shown.
enum FormMode {
    Create,
    Edit { id: ProductId, image: String },
}

impl FormMode {
    fn heading(&self) -> &'static str {
        match self {
            Self::Create => "Produk Baru",
            Self::Edit { .. } => "Ubah Produk",
        }
    }

    fn action(&self) -> String {
        match self {
            Self::Create => "/products".to_string(),
            Self::Edit { id, .. } => format!("/products/{id}"),
        }
    }
}

/// Build the form template for `mode`.
async fn form_template(
    state: &AppState,
    mode: FormMode,
    form: ProductFormView,
    errors: ValidationErrors,
) -> Result<ProductFormTemplate, AppError> {
    let categories = CategoryRepository::new(state.pool())
        .list()
        .await?
        .into_iter()
        .map(|c| {
            let id = c.id.to_string();
            CategoryOption {
                selected: id == form.category_id.trim(),
                id,
                name: c.name,
            }
        })
        .collect();

    let image_url = match &mode {
        FormMode::Create => None,
        FormMode::Edit { image, .. } => Some(public_url(image)),
    };

    Ok(ProductFormTemplate {
        current_path: "/products".to_string(),
        heading: mode.heading().to_string(),
        action: mode.action(),
        form,
        errors,
        categories,
        image_url,
        image_required: matches!(mode, FormMode::Create),
    })
}

/// Re-render the form with messages and HTTP 422.
async fn invalid(
    state: &AppState,
    mode: FormMode,
    form: &ProductForm,
    errors: ValidationErrors,
) -> Result<Response, AppError> {
    let template = form_template(state, mode, ProductFormView::from(form), errors).await?;
    Ok((StatusCode::UNPROCESSABLE_ENTITY, render(&template)).into_response())
}

/// Run every rule, including the category lookup.
async fn validate(
    state: &AppState,
    form: &ProductForm,
    require_image: bool,
) -> Result<Result<ProductInput, ValidationErrors>, AppError> {
    let pool = state.pool();
    let verdict = product_rules(require_image)
        .validate(form)
        .finish(|lookup, id| db::lookup_exists(pool, lookup, id))
        .await?;

    match verdict {
        Ok(()) => form
            .to_input()
            .map(Ok)
            .ok_or_else(|| AppError::BadRequest("malformed product form".to_string())),
        Err(errors) => Ok(Err(errors)),
    }
}

/// Messages for a category removed between validation and the write.
fn stale_category() -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    errors.add("category_id", "The selected category id is invalid.");
    errors
}

// =============================================================================
// Handlers
// =============================================================================

/// Product listing handler.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let products = ProductRepository::new(state.pool())
        .list()
        .await?
        .iter()
        .map(ProductRowView::from)
        .collect();

    let template = ProductsIndexTemplate {
        current_path: "/products".to_string(),
        flash: take_flash(&session).await,
        products,
    };

    Ok(render(&template))
}

/// New product form handler.
#[instrument(skip(state))]
pub async fn create(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let template = form_template(
        &state,
        FormMode::Create,
        ProductFormView::default(),
        ValidationErrors::default(),
    )
    .await?;

    Ok(render(&template))
}

/// Store product handler.
#[instrument(skip(state, session, multipart))]
pub async fn store(
    State(state): State<AppState>,
    session: Session,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let form = ProductForm::from_multipart(multipart).await?;

    let input = match validate(&state, &form, true).await? {
        Ok(input) => input,
        Err(errors) => return invalid(&state, FormMode::Create, &form, errors).await,
    };
    let Some(upload) = form.image() else {
        return Err(AppError::BadRequest("missing product image".to_string()));
    };

    let image = state.images().store(upload).await?;

    let product = match ProductRepository::new(state.pool())
        .create(&input, &image)
        .await
    {
        Ok(product) => product,
        Err(e) => {
            state.images().delete_quietly(&image).await;
            return match e {
                RepositoryError::Conflict(_) => {
                    invalid(&state, FormMode::Create, &form, stale_category()).await
                }
                e => Err(e.into()),
            };
        }
    };

    tracing::info!(product_id = %product.id, title = %product.title, "Product created");
    set_flash(&session, Flash::success("Produk berhasil disimpan.")).await?;

    Ok(Redirect::to("/products").into_response())
}

/// Edit product form handler.
#[instrument(skip(state))]
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Html<String>, AppError> {
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let template = form_template(
        &state,
        FormMode::Edit {
            id,
            image: product.image.clone(),
        },
        ProductFormView::from(&product),
        ValidationErrors::default(),
    )
    .await?;

    Ok(render(&template))
}

/// Update product handler.
///
/// A new upload replaces the image; the old file is removed only after the
/// row points at the new one.
#[instrument(skip(state, session, multipart))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ProductId>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let repo = ProductRepository::new(state.pool());
    let existing = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let form = ProductForm::from_multipart(multipart).await?;
    let mode = || FormMode::Edit {
        id,
        image: existing.image.clone(),
    };

    let input = match validate(&state, &form, false).await? {
        Ok(input) => input,
        Err(errors) => return invalid(&state, mode(), &form, errors).await,
    };

    let new_image = match form.image() {
        Some(upload) => Some(state.images().store(upload).await?),
        None => None,
    };

    let product = match repo.update(id, &input, new_image.as_deref()).await {
        Ok(product) => product,
        Err(e) => {
            if let Some(image) = &new_image {
                state.images().delete_quietly(image).await;
            }
            return match e {
                RepositoryError::Conflict(_) => {
                    invalid(&state, mode(), &form, stale_category()).await
                }
                e => Err(e.into()),
            };
        }
    };

    if new_image.is_some() && product.image != existing.image {
        state.images().delete_quietly(&existing.image).await;
    }

    tracing::info!(product_id = %product.id, "Product updated");
    set_flash(&session, Flash::success("Produk berhasil diperbarui.")).await?;

    Ok(Redirect::to("/products").into_response())
}

/// Delete product handler.
#[instrument(skip(state, session))]
pub async fn destroy(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ProductId>,
) -> Result<Redirect, AppError> {
    let image = ProductRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound(format!("product {id}")),
            e => e.into(),
        })?;

    state.images().delete_quietly(&image).await;

    tracing::info!(product_id = %id, "Product deleted");
    set_flash(&session, Flash::success("Produk berhasil dihapus.")).await?;

    Ok(Redirect::to("/products"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::{Request, header::CONTENT_TYPE};
    use rust_decimal::Decimal;

    use super::*;

    fn form(values: &[(&str, &str)], image: bool) -> ProductForm {
        ProductForm {
            values: values
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            image: image.then(|| Upload {
                file_name: Some("kemeja.jpg".to_string()),
                content_type: Some("image/jpeg".to_string()),
                bytes: vec![0xFF, 0xD8, 0xFF],
            }),
        }
    }

    fn complete() -> ProductForm {
        form(
            &[
                ("category_id", "3"),
                ("title", " Kemeja Flanel "),
                ("price", "150000"),
                ("quantity", "12"),
                ("weight", "250.5"),
                ("description", "Kemeja flanel bahan katun lembut"),
            ],
            true,
        )
    }

    #[test]
    fn test_empty_submission_requires_every_field() {
        let validation = product_rules(true).validate(&form(&[], false));
        let errors = validation.errors();

        for field in [
            "category_id",
            "title",
            "price",
            "quantity",
            "image",
            "weight",
            "description",
        ] {
            assert_eq!(
                errors.first(field),
                Some(format!("The {} field is required.", field.replace('_', " ")).as_str())
            );
        }
        assert!(validation.pending().is_empty());
    }

    #[test]
    fn test_image_optional_on_edit() {
        let mut edit = complete();
        edit.image = None;
        let validation = product_rules(false).validate(&edit);
        assert!(validation.errors().is_empty());
    }

    #[test]
    fn test_numeric_fields_reject_text() {
        let mut bad = complete();
        bad.values.insert("price".to_string(), "seratus".to_string());
        bad.values.insert("weight".to_string(), "1,5".to_string());
        let validation = product_rules(true).validate(&bad);
        let errors = validation.errors();

        assert_eq!(errors.first("price"), Some("The price field must be a number."));
        assert_eq!(errors.first("weight"), Some("The weight field must be a number."));
        assert!(!errors.has("title"));
    }

    #[test]
    fn test_price_and_weight_fit_their_columns() {
        let mut edge = complete();
        edge.values.insert("price".to_string(), "999999999999.99".to_string());
        edge.values.insert("weight".to_string(), "99999999.99".to_string());
        assert!(product_rules(true).validate(&edge).errors().is_empty());

        let mut over = complete();
        over.values.insert("price".to_string(), "10000000000000".to_string());
        over.values.insert("weight".to_string(), "1.005".to_string());
        let validation = product_rules(true).validate(&over);
        let errors = validation.errors();

        assert_eq!(
            errors.get("price"),
            ["The price field must not have more than 12 digits before the decimal point."
                .to_string()]
        );
        assert_eq!(
            errors.get("weight"),
            ["The weight field must not have more than 2 decimal places.".to_string()]
        );
    }

    #[test]
    fn test_out_of_range_price_is_not_called_text() {
        let mut huge = complete();
        huge.values.insert("price".to_string(), "1e100".to_string());
        huge.values.insert("weight".to_string(), "1".repeat(32));
        let validation = product_rules(true).validate(&huge);
        let errors = validation.errors();

        assert_eq!(
            errors.first("price"),
            Some("The price field must not have more than 12 digits before the decimal point.")
        );
        assert_eq!(
            errors.first("weight"),
            Some("The weight field must not have more than 8 digits before the decimal point.")
        );
    }

    #[test]
    fn test_image_must_be_raster_upload() {
        for content_type in [Some("text/html"), Some("image/svg+xml"), None] {
            for require_image in [true, false] {
                let mut upload = complete();
                if let Some(image) = upload.image.as_mut() {
                    image.content_type = content_type.map(str::to_string);
                }
                let validation = product_rules(require_image).validate(&upload);
                assert_eq!(
                    validation.errors().get("image"),
                    ["The image field must be an image.".to_string()],
                    "{content_type:?}"
                );
            }
        }
    }

    #[test]
    fn test_complete_form_defers_category_lookup() {
        let validation = product_rules(true).validate(&complete());
        assert!(validation.errors().is_empty());
        assert_eq!(validation.pending().len(), 1);
        assert_eq!(validation.pending()[0].lookup, Lookup::Category);
        assert_eq!(validation.pending()[0].id, 3);
    }

    #[test]
    fn test_to_input_trims_and_parses() {
        let input = complete().to_input().unwrap();
        assert_eq!(input.category_id, CategoryId::new(3));
        assert_eq!(input.title, "Kemeja Flanel");
        assert_eq!(input.price, Decimal::from(150_000));
        assert_eq!(input.quantity, 12);
        assert_eq!(input.weight, Decimal::new(2505, 1));
    }

    #[test]
    fn test_form_view_keeps_submitted_values() {
        let view = ProductFormView::from(&form(&[("title", "Kaos"), ("price", "abc")], false));
        assert_eq!(view.title, "Kaos");
        assert_eq!(view.price, "abc");
        assert_eq!(view.description, "");
    }

    #[tokio::test]
    async fn test_from_multipart_reads_fields_and_file() {
        let body = concat!(
            "--X\r\n",
            "Content-Disposition: form-data; name=\"title\"\r\n\r\n",
            "Kemeja Flanel\r\n",
            "--X\r\n",
            "Content-Disposition: form-data; name=\"unexpected\"\r\n\r\n",
            "ignored\r\n",
            "--X\r\n",
            "Content-Disposition: form-data; name=\"image\"; filename=\"a.png\"\r\n",
            "Content-Type: image/png\r\n\r\n",
            "PNGDATA\r\n",
            "--X--\r\n",
        );
        let request = Request::builder()
            .method("POST")
            .uri("/products")
            .header(CONTENT_TYPE, "multipart/form-data; boundary=X")
            .body(Body::from(body))
            .unwrap();

        let multipart = Multipart::from_request(request, &()).await.unwrap();
        let form = ProductForm::from_multipart(multipart).await.unwrap();

        assert_eq!(form.value("title"), Some("Kemeja Flanel"));
        assert_eq!(form.value("unexpected"), None);
        let image = form.image().unwrap();
        assert_eq!(image.file_name.as_deref(), Some("a.png"));
        assert_eq!(image.content_type.as_deref(), Some("image/png"));
        assert_eq!(image.bytes, b"PNGDATA");
        assert_eq!(form.value("image"), Some("image/png"));
    }

    #[tokio::test]
    async fn test_from_multipart_ignores_empty_file_part() {
        let body = concat!(
            "--X\r\n",
            "Content-Disposition: form-data; name=\"image\"; filename=\"\"\r\n",
            "Content-Type: application/octet-stream\r\n\r\n",
            "\r\n",
            "--X--\r\n",
        );
        let request = Request::builder()
            .method("POST")
            .uri("/products")
            .header(CONTENT_TYPE, "multipart/form-data; boundary=X")
            .body(Body::from(body))
            .unwrap();

        let multipart = Multipart::from_request(request, &()).await.unwrap();
        let form = ProductForm::from_multipart(multipart).await.unwrap();
        assert!(form.image().is_none());
        assert_eq!(form.value("image"), None);
    }
}
