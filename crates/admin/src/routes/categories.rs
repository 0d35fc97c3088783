//! Category management route handlers.

use askama::Template;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use apola_core::{CategoryId, Rule, Ruleset, ValidationErrors};

use crate::{
    db::{CategoryRepository, RepositoryError},
    error::AppError,
    filters,
    middleware::{set_flash, take_flash},
    models::{CategoryWithCount, Flash},
    state::AppState,
};

use super::render;

/// Category list page template.
#[derive(Template)]
#[template(path = "categories/index.html")]
pub struct CategoriesIndexTemplate {
    pub current_path: String,
    pub flash: Option<Flash>,
    pub categories: Vec<CategoryWithCount>,
    pub name: String,
    pub errors: ValidationErrors,
}

/// Form input for creating a category.
#[derive(Debug, Deserialize)]
pub struct CategoryFormInput {
    #[serde(default)]
    pub name: String,
}

fn category_rules() -> Ruleset {
    Ruleset::new().field("name", &[Rule::Required, Rule::Min(3)])
}

async fn index_template(
    state: &AppState,
    flash: Option<Flash>,
    name: String,
    errors: ValidationErrors,
) -> Result<CategoriesIndexTemplate, AppError> {
    let categories = CategoryRepository::new(state.pool())
        .list_with_counts()
        .await?;

    Ok(CategoriesIndexTemplate {
        current_path: "/categories".to_string(),
        flash,
        categories,
        name,
        errors,
    })
}

/// Category list page handler.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, AppError> {
    let flash = take_flash(&session).await;
    let template = index_template(&state, flash, String::new(), ValidationErrors::default()).await?;
    Ok(render(&template).into_response())
}

/// Create category handler.
#[instrument(skip(state, session, input))]
pub async fn store(
    State(state): State<AppState>,
    session: Session,
    Form(input): Form<CategoryFormInput>,
) -> Result<Response, AppError> {
    let form = [("name", input.name.as_str())];
    let verdict = category_rules().validate(&form[..]).into_result();

    let errors = match verdict {
        Ok(()) => {
            match CategoryRepository::new(state.pool())
                .create(input.name.trim())
                .await
            {
                Ok(category) => {
                    tracing::info!(category_id = %category.id, name = %category.name, "Category created");
                    set_flash(&session, Flash::success("Kategori berhasil ditambahkan.")).await?;
                    return Ok(Redirect::to("/categories").into_response());
                }
                Err(RepositoryError::Conflict(_)) => {
                    let mut errors = ValidationErrors::default();
                    errors.add("name", "The name has already been taken.");
                    errors
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(errors) => errors,
    };

    let template = index_template(&state, None, input.name, errors).await?;
    Ok((StatusCode::UNPROCESSABLE_ENTITY, render(&template)).into_response())
}

/// Delete category handler.
///
/// Categories that still hold products are kept and an error notice is shown.
#[instrument(skip(state, session))]
pub async fn destroy(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<CategoryId>,
) -> Result<Redirect, AppError> {
    let flash = match CategoryRepository::new(state.pool()).delete(id).await {
        Ok(()) => {
            tracing::info!(category_id = %id, "Category deleted");
            Flash::success("Kategori berhasil dihapus.")
        }
        Err(RepositoryError::Conflict(_)) => {
            tracing::warn!(category_id = %id, "Refused to delete category in use");
            Flash::error("Kategori masih dipakai oleh produk dan tidak dapat dihapus.")
        }
        Err(RepositoryError::NotFound) => {
            return Err(AppError::NotFound(format!("category {id}")));
        }
        Err(e) => return Err(e.into()),
    };

    set_flash(&session, flash).await?;
    Ok(Redirect::to("/categories"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_rules() {
        let rules = category_rules();
        assert_eq!(
            rules.validate(&[("name", "")][..]).errors().first("name"),
            Some("The name field is required.")
        );
        assert_eq!(
            rules.validate(&[("name", "ab")][..]).errors().first("name"),
            Some("The name field must be at least 3 characters.")
        );
        assert!(rules.validate(&[("name", "Kaos")][..]).errors().is_empty());
    }
}
