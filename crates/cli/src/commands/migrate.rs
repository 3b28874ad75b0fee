//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! shopforge migrate
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! # Migration Files
//!
//! `crates/storefront/migrations/`, embedded at compile time.

use crate::error::CliError;

/// Run storefront database migrations.
pub async fn storefront() -> Result<(), CliError> {
    let stores = super::connect().await?;

    tracing::info!("Running storefront migrations...");
    sqlx::migrate!("../storefront/migrations")
        .run(stores.pool())
        .await?;

    tracing::info!("Storefront migrations complete!");
    Ok(())
}
