//! Category management command.

use thiserror::Error;

use apola_admin::db::{self, CategoryRepository, RepositoryError};
use apola_core::{Rule, Ruleset};

use super::{MissingDatabaseUrl, database_url};

/// Errors that can occur while managing categories.
#[derive(Debug, Error)]
pub enum CategoryError {
    #[error(transparent)]
    MissingEnvVar(#[from] MissingDatabaseUrl),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Category already exists: {0}")]
    Exists(String),

    #[error("Database connection error: {0}")]
    Connect(#[from] sqlx::Error),

    #[error(transparent)]
    Repository(RepositoryError),
}

/// Check a category name against the same rules as the admin form.
fn check_name(name: &str) -> Result<(), CategoryError> {
    Ruleset::new()
        .field("name", &[Rule::Required, Rule::Min(3)])
        .validate(&[("name", name)][..])
        .into_result()
        .map_err(|errors| {
            CategoryError::InvalidName(errors.first("name").unwrap_or_default().to_owned())
        })
}

/// Create a category and return its id.
///
/// # Errors
///
/// Returns an error if the name is invalid or taken, or the database fails.
pub async fn create(name: &str) -> Result<i32, CategoryError> {
    check_name(name)?;
    let name = name.trim();

    let database_url = database_url()?;
    let pool = db::create_pool(&database_url).await?;

    let category = CategoryRepository::new(&pool)
        .create(name)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => CategoryError::Exists(name.to_owned()),
            other => CategoryError::Repository(other),
        })?;

    tracing::info!(category_id = %category.id, name = %category.name, "Category created");
    Ok(category.id.as_i32())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_check_name() {
        assert!(check_name("Atasan").is_ok());
        assert_eq!(
            check_name("  ").unwrap_err().to_string(),
            "Invalid name: The name field is required."
        );
        assert_eq!(
            check_name("ab").unwrap_err().to_string(),
            "Invalid name: The name field must be at least 3 characters."
        );
    }
}
