//! Custom domain resolution.
//!
//! Decides whether a navigation to `/` arrived on a tenant's custom domain
//! and, if so, which storefront it belongs to.

use thiserror::Error;

use shopforge_core::{Hostname, RouteTarget};

use crate::db::{RepositoryError, StoreRepository};

/// The store lookup for a hostname failed.
#[derive(Debug, Error)]
#[error("store lookup for {hostname} failed: {source}")]
pub struct LookupError {
    pub hostname: Hostname,
    #[source]
    pub source: RepositoryError,
}

/// Maps request hostnames to tenant storefronts.
pub struct DomainResolver<'a> {
    stores: &'a dyn StoreRepository,
    platform_domain_suffix: &'a str,
}

impl<'a> DomainResolver<'a> {
    /// Create a resolver.
    ///
    /// Hosts equal to or under `platform_domain_suffix` are the platform's own
    /// deployment and always resolve to the home page.
    #[must_use]
    pub const fn new(stores: &'a dyn StoreRepository, platform_domain_suffix: &'a str) -> Self {
        Self {
            stores,
            platform_domain_suffix,
        }
    }

    /// True if `hostname` never triggers a store lookup.
    #[must_use]
    pub fn is_excluded(&self, hostname: &Hostname) -> bool {
        hostname.is_loopback() || hostname.has_platform_suffix(self.platform_domain_suffix)
    }

    /// Resolve `hostname`, reporting lookup failures.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] if the repository query fails.
    pub async fn try_resolve(&self, hostname: &Hostname) -> Result<RouteTarget, LookupError> {
        if self.is_excluded(hostname) {
            return Ok(RouteTarget::Home);
        }

        let matches = self
            .stores
            .find_by_domain(hostname.as_str())
            .await
            .map_err(|source| LookupError {
                hostname: hostname.clone(),
                source,
            })?;

        if matches.len() > 1 {
            let store_ids: Vec<String> = matches.iter().map(|s| s.id.to_string()).collect();
            tracing::warn!(
                %hostname,
                store_ids = %store_ids.join(","),
                "Custom domain is claimed by more than one store; using the lowest id"
            );
        }

        Ok(matches
            .first()
            .map_or(RouteTarget::Home, |store| RouteTarget::Storefront(store.id)))
    }

    /// Resolve `hostname`. Lookup failures are logged and fall back to home.
    pub async fn resolve(&self, hostname: &Hostname) -> RouteTarget {
        match self.try_resolve(hostname).await {
            Ok(target) => target,
            Err(e) => {
                tracing::warn!(error = %e, "Custom domain lookup failed, serving home page");
                RouteTarget::Home
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use shopforge_core::{Store, StoreId};

    use super::*;
    use crate::db::InMemoryStoreRepository;

    fn store(id: i32, domain: Option<&str>) -> Store {
        let now = Utc::now();
        Store {
            id: StoreId::new(id),
            name: format!("Store {id}"),
            domain: domain.map(String::from),
            vercel_dns_ip: None,
            vercel_cname: None,
            vercel_domain_config: None,
            last_dns_config_fetch: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn host(s: &str) -> Hostname {
        Hostname::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_excluded_hosts_resolve_home_without_lookup() {
        // Stores claiming the excluded hostnames must not win
        let repo = InMemoryStoreRepository::with_stores(vec![
            store(1, Some("localhost")),
            store(2, Some("127.0.0.1")),
            store(3, Some("anything.vercel.app")),
        ]);
        repo.fail_lookups(true);
        let resolver = DomainResolver::new(&repo, "vercel.app");

        for h in ["localhost", "127.0.0.1", "anything.vercel.app", "localhost:3000"] {
            assert_eq!(resolver.try_resolve(&host(h)).await.unwrap(), RouteTarget::Home);
        }
    }

    #[tokio::test]
    async fn test_single_match_redirects_to_storefront() {
        let repo = InMemoryStoreRepository::with_stores(vec![
            store(4, Some("other.com")),
            store(7, Some("myshop.com")),
        ]);
        let resolver = DomainResolver::new(&repo, "vercel.app");
        assert_eq!(
            resolver.resolve(&host("myshop.com")).await,
            RouteTarget::Storefront(StoreId::new(7))
        );
    }

    #[tokio::test]
    async fn test_no_match_resolves_home() {
        let repo = InMemoryStoreRepository::with_stores(vec![store(1, Some("myshop.com"))]);
        let resolver = DomainResolver::new(&repo, "vercel.app");
        assert_eq!(
            resolver.try_resolve(&host("unknown.com")).await.unwrap(),
            RouteTarget::Home
        );
        assert_eq!(
            resolver.try_resolve(&host("www.myshop.com")).await.unwrap(),
            RouteTarget::Home
        );
    }

    #[tokio::test]
    async fn test_lookup_failure_falls_back_to_home() {
        let repo = InMemoryStoreRepository::with_stores(vec![store(1, Some("myshop.com"))]);
        repo.fail_lookups(true);
        let resolver = DomainResolver::new(&repo, "vercel.app");

        assert!(resolver.try_resolve(&host("myshop.com")).await.is_err());
        assert_eq!(resolver.resolve(&host("myshop.com")).await, RouteTarget::Home);
    }

    #[tokio::test]
    async fn test_duplicate_domain_picks_lowest_id() {
        let repo = InMemoryStoreRepository::with_stores(vec![
            store(9, Some("dupe.com")),
            store(3, Some("dupe.com")),
        ]);
        let resolver = DomainResolver::new(&repo, "vercel.app");
        assert_eq!(
            resolver.resolve(&host("dupe.com")).await,
            RouteTarget::Storefront(StoreId::new(3))
        );
    }

    #[tokio::test]
    async fn test_custom_platform_suffix() {
        let repo = InMemoryStoreRepository::with_stores(vec![store(1, Some("shop.example.dev"))]);
        let resolver = DomainResolver::new(&repo, "example.dev");
        assert_eq!(resolver.resolve(&host("shop.example.dev")).await, RouteTarget::Home);
    }
}
