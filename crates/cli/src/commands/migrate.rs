//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! shine-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `SHINE_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//!
//! # Migration Files
//!
//! Storefront migrations live in `crates/storefront/migrations/` and are
//! embedded into the binary at compile time.

use tracing::info;

use shine_store_storefront::db;

use super::{CommandError, database_url};

/// Run storefront database migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails,
/// or a migration fails to apply.
pub async fn storefront() -> Result<(), CommandError> {
    let database_url = database_url()?;

    info!("Connecting to storefront database...");
    let pool = db::create_pool(&database_url).await?;

    info!("Running storefront migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    info!("Storefront migrations complete!");
    Ok(())
}
