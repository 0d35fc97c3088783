//! CLI subcommands.

pub mod category;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;
use thiserror::Error;

/// The environment variable was not set.
#[derive(Debug, Error)]
#[error("Missing environment variable: {0} (or DATABASE_URL)")]
pub struct MissingDatabaseUrl(&'static str);

/// Database URL for the admin database.
///
/// # Errors
///
/// Returns `MissingDatabaseUrl` if neither variable is set.
pub fn database_url() -> Result<SecretString, MissingDatabaseUrl> {
    std::env::var("ADMIN_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| MissingDatabaseUrl("ADMIN_DATABASE_URL"))
}
