//! Session middleware configuration for admin.
//!
//! Sessions are `PostgreSQL`-backed and only carry one-shot flash notices
//! between a form post and the page it redirects to.

use sqlx::PgPool;
use tower_sessions::{Expiry, Session, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::AdminConfig;
use crate::models::Flash;
use crate::models::session::keys;

/// Session cookie name for admin.
pub const SESSION_COOKIE_NAME: &str = "apola_admin_session";

/// Session expiry time in seconds (24 hours).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Create the session layer with `PostgreSQL` store.
///
/// The `admin.session` table is created by the CLI migrations.
///
/// # Errors
///
/// Returns an error if the schema or table name is rejected by the store.
pub fn create_session_layer(
    pool: &PgPool,
    config: &AdminConfig,
) -> Result<SessionManagerLayer<PostgresStore>, String> {
    let store = PostgresStore::new(pool.clone())
        .with_schema_name("admin")
        .map_err(|e| e.to_string())?
        .with_table_name("session")
        .map_err(|e| e.to_string())?;

    Ok(SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/"))
}

/// Queue a flash notice for the next page load.
///
/// # Errors
///
/// Returns an error if the session cannot be written.
pub async fn set_flash(session: &Session, flash: Flash) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::FLASH, flash).await
}

/// Take the pending flash notice, if any.
///
/// A session read failure is logged and treated as no notice.
pub async fn take_flash(session: &Session) -> Option<Flash> {
    match session.remove::<Flash>(keys::FLASH).await {
        Ok(flash) => flash,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read flash notice");
            None
        }
    }
}
