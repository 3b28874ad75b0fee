//! CLI error type.

use thiserror::Error;

use shopforge_core::{HostnameError, StoreId};
use shopforge_storefront::config::ConfigError;
use shopforge_storefront::db::RepositoryError;
use shopforge_storefront::services::DnsSyncError;
use shopforge_storefront::vercel::VercelError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Environment configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Repository operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// DNS action failed. The notice has already been printed.
    #[error("{}", .0.notice().message)]
    Dns(#[from] DnsSyncError),

    /// Vercel client could not be built.
    #[error("Vercel client error: {0}")]
    Vercel(#[from] VercelError),

    /// Hostname argument is malformed.
    #[error("Invalid hostname: {0}")]
    InvalidHost(#[from] HostnameError),

    /// No store has this id.
    #[error("Store {0} not found")]
    StoreNotFound(StoreId),

    /// Reading the prompt answer failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
