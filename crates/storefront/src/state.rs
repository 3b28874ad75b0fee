//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::db::{PgStoreRepository, StoreRepository};
use crate::services::{DnsSyncService, DomainResolver};
use crate::vercel::{DomainProvider, VercelClient, VercelError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Storage and the DNS provider
/// sit behind trait objects so tests can swap in fakes.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    stores: Arc<dyn StoreRepository>,
    provider: Arc<dyn DomainProvider>,
}

impl AppState {
    /// Create application state from explicit components.
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        stores: Arc<dyn StoreRepository>,
        provider: Arc<dyn DomainProvider>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                stores,
                provider,
            }),
        }
    }

    /// Create production state: Postgres repository and Vercel client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client for Vercel cannot be built.
    pub fn from_pool(config: StorefrontConfig, pool: PgPool) -> Result<Self, VercelError> {
        let provider = VercelClient::new(&config.vercel)?;
        Ok(Self::new(
            config,
            Arc::new(PgStoreRepository::new(pool)),
            Arc::new(provider),
        ))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the store repository.
    #[must_use]
    pub fn stores(&self) -> &dyn StoreRepository {
        self.inner.stores.as_ref()
    }

    /// Get a reference to the DNS provider.
    #[must_use]
    pub fn provider(&self) -> &dyn DomainProvider {
        self.inner.provider.as_ref()
    }

    /// Domain resolver over this state's repository.
    #[must_use]
    pub fn resolver(&self) -> DomainResolver<'_> {
        DomainResolver::new(self.stores(), &self.inner.config.platform_domain_suffix)
    }

    /// DNS synchronization service over this state's repository and provider.
    #[must_use]
    pub fn dns(&self) -> DnsSyncService<'_> {
        DnsSyncService::new(self.stores(), self.provider())
    }
}
