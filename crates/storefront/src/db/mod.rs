//! Database operations for storefront `PostgreSQL`.
//!
//! # Database: `shopforge`
//!
//! ## Tables
//!
//! - `storefront.store` - Tenant stores, custom domains, and DNS targets
//! - `tower_sessions.session` - Tower-sessions storage (shopper carts)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p shopforge-cli -- migrate
//! ```
//!
//! # Repository Seam
//!
//! Handlers and services talk to [`StoreRepository`], never to the pool.
//! [`PgStoreRepository`] is the production implementation;
//! [`InMemoryStoreRepository`] backs tests.

pub mod memory;
pub mod stores;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use shopforge_core::{DnsIp, Store, StoreId};

pub use memory::InMemoryStoreRepository;
pub use stores::PgStoreRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Backend could not be reached.
    #[error("store backend unavailable: {0}")]
    Unavailable(String),
}

/// Fields for a new store.
#[derive(Debug, Clone)]
pub struct NewStore {
    pub name: String,
    pub domain: Option<String>,
}

/// Fields written by a provider DNS fetch, applied as one update.
#[derive(Debug, Clone)]
pub struct DnsConfigUpdate {
    pub dns_ip: String,
    pub cname: String,
    pub domain_config: serde_json::Value,
    pub fetched_at: DateTime<Utc>,
}

/// Read/write access to tenant stores.
///
/// Writes are partial: each update sets only the named columns on one row.
#[async_trait]
pub trait StoreRepository: Send + Sync {
    /// All stores whose domain equals `domain` exactly, lowest id first.
    async fn find_by_domain(&self, domain: &str) -> Result<Vec<Store>, RepositoryError>;

    /// Fetch a store by id.
    async fn get_by_id(&self, id: StoreId) -> Result<Option<Store>, RepositoryError>;

    /// Set `vercel_dns_ip` and `last_dns_config_fetch`.
    ///
    /// Returns `RepositoryError::NotFound` if no store has this id.
    async fn update_dns_ip(
        &self,
        id: StoreId,
        ip: &DnsIp,
        fetched_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError>;

    /// Set all four DNS fields.
    ///
    /// Returns `RepositoryError::NotFound` if no store has this id.
    async fn update_dns_config(
        &self,
        id: StoreId,
        update: &DnsConfigUpdate,
    ) -> Result<(), RepositoryError>;

    /// Create a store.
    async fn create(&self, store: &NewStore) -> Result<Store, RepositoryError>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
