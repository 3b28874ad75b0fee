//! CLI command implementations.

pub mod dns;
pub mod migrate;
pub mod resolve;
pub mod store;

use shopforge_storefront::config::database_url_from_env;
use shopforge_storefront::db::{PgStoreRepository, create_pool};

use crate::error::CliError;

/// Connect to the storefront database.
pub async fn connect() -> Result<PgStoreRepository, CliError> {
    dotenvy::dotenv().ok();
    let database_url = database_url_from_env()?;

    tracing::info!("Connecting to storefront database...");
    let pool = create_pool(&database_url).await?;
    Ok(PgStoreRepository::new(pool))
}
