//! DNS config synchronization.
//!
//! Keeps a store's DNS targets (A-record IP and CNAME) in line with what
//! Vercel expects, and lets the owner override the IP by hand.
//!
//! Each action performs at most one provider request and one single-row
//! UPDATE, then re-reads the store so callers can show fresh values. The
//! re-read is best effort: its failure is logged and never masks a write
//! that already succeeded.

mod error;

pub use error::{DnsOperation, DnsSyncError, MissingConfig};

use async_trait::async_trait;
use chrono::Utc;

use shopforge_core::{DEFAULT_CNAME, DEFAULT_DNS_IP, DnsIp, Notice, Store, StoreId};

use crate::db::{DnsConfigUpdate, StoreRepository};
use crate::error::add_breadcrumb;
use crate::vercel::{DomainProvider, ProviderDnsConfig};

/// Asks the owner for a DNS IP.
///
/// Returns `None` when the owner cancels.
#[async_trait]
pub trait DnsIpPrompt: Send + Sync {
    /// Ask for a new IP, offering `current` as the pre-filled answer.
    async fn ask(&self, current: &str) -> Option<String>;
}

/// Outcome of a successful DNS action.
#[derive(Debug, Clone)]
pub struct DnsUpdate {
    /// The store as re-read after the write, if the re-read succeeded.
    pub store: Option<Store>,
    pub notice: Notice,
}

/// DNS synchronization service.
pub struct DnsSyncService<'a> {
    stores: &'a dyn StoreRepository,
    provider: &'a dyn DomainProvider,
}

impl<'a> DnsSyncService<'a> {
    /// Create a new DNS synchronization service.
    #[must_use]
    pub const fn new(stores: &'a dyn StoreRepository, provider: &'a dyn DomainProvider) -> Self {
        Self { stores, provider }
    }

    /// Load a store.
    ///
    /// # Errors
    ///
    /// Returns `DnsSyncError::StoreNotFound` if no store has this id.
    /// Returns `DnsSyncError::Persistence` if the read fails.
    pub async fn load_store(&self, store_id: StoreId) -> Result<Store, DnsSyncError> {
        self.stores
            .get_by_id(store_id)
            .await
            .map_err(|e| DnsSyncError::persistence(DnsOperation::Load, store_id, e))?
            .ok_or(DnsSyncError::StoreNotFound(store_id))
    }

    /// Set the store's DNS IP to `candidate`.
    ///
    /// # Errors
    ///
    /// Returns `DnsSyncError::Validation` if `candidate` is not a dotted quad;
    /// nothing is written in that case.
    /// Returns `DnsSyncError::StoreNotFound` if no store has this id.
    /// Returns `DnsSyncError::Persistence` if the write fails.
    pub async fn update_dns_ip(
        &self,
        store_id: StoreId,
        candidate: &str,
    ) -> Result<DnsUpdate, DnsSyncError> {
        let ip = DnsIp::parse(candidate)?;
        let store_id_str = store_id.to_string();
        add_breadcrumb(
            "dns",
            "Updating DNS IP",
            Some(&[("store_id", &store_id_str), ("ip", ip.as_str())]),
        );

        self.stores
            .update_dns_ip(store_id, &ip, Utc::now())
            .await
            .map_err(|e| DnsSyncError::persistence(DnsOperation::UpdateIp, store_id, e))?;

        tracing::info!(store_id = %store_id, ip = %ip, "DNS IP updated");

        Ok(DnsUpdate {
            store: self.reread(store_id).await,
            notice: Notice::success(format!("DNS IP updated to {ip}!")),
        })
    }

    /// Pull the store's DNS targets from Vercel and save them.
    ///
    /// Values Vercel does not state explicitly are saved as the platform
    /// defaults, and the notice asks the owner to confirm manually.
    ///
    /// # Errors
    ///
    /// Returns `DnsSyncError::Configuration` if the store has no domain or
    /// the provider credentials are missing; no request is sent.
    /// Returns `DnsSyncError::Provider` if the request fails.
    /// Returns `DnsSyncError::Persistence` if the write fails.
    pub async fn fetch_provider_dns_config(&self, store: &Store) -> Result<DnsUpdate, DnsSyncError> {
        let domain = store
            .custom_domain()
            .ok_or(DnsSyncError::Configuration(MissingConfig::Domain))?;

        tracing::info!(store_id = %store.id, %domain, "Fetching DNS configuration from Vercel...");
        let store_id_str = store.id.to_string();
        add_breadcrumb(
            "dns",
            "Fetching DNS configuration from Vercel",
            Some(&[("store_id", &store_id_str), ("domain", domain)]),
        );

        let raw = self.provider.domain_config(domain).await?;
        let config = ProviderDnsConfig::from_response(&raw);

        let update = DnsConfigUpdate {
            dns_ip: config.ip().map_or(DEFAULT_DNS_IP, DnsIp::as_str).to_string(),
            cname: config.cname().unwrap_or(DEFAULT_CNAME).to_string(),
            domain_config: raw,
            fetched_at: Utc::now(),
        };

        self.stores
            .update_dns_config(store.id, &update)
            .await
            .map_err(|e| DnsSyncError::persistence(DnsOperation::FetchProvider, store.id, e))?;

        tracing::info!(
            store_id = %store.id,
            %domain,
            ip = %update.dns_ip,
            cname = %update.cname,
            complete = config.is_complete(),
            "DNS configuration saved from Vercel"
        );

        Ok(DnsUpdate {
            store: self.reread(store.id).await,
            notice: fetch_notice(domain, &config),
        })
    }

    /// Load the store by id, then fetch its DNS targets from Vercel.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load_store`] and [`Self::fetch_provider_dns_config`].
    pub async fn fetch_provider_dns_config_by_id(
        &self,
        store_id: StoreId,
    ) -> Result<DnsUpdate, DnsSyncError> {
        let store = self.load_store(store_id).await?;
        self.fetch_provider_dns_config(&store).await
    }

    /// Ask the owner for a new IP and apply it.
    ///
    /// The prompt is pre-filled with the store's current IP. A cancelled or
    /// empty answer changes nothing and returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load_store`] and [`Self::update_dns_ip`].
    pub async fn request_manual_dns_ip(
        &self,
        store_id: StoreId,
        prompt: &dyn DnsIpPrompt,
    ) -> Result<Option<DnsUpdate>, DnsSyncError> {
        let store = self.load_store(store_id).await?;
        match prompt.ask(store.dns_ip()).await {
            Some(answer) if !answer.is_empty() => self.update_dns_ip(store_id, &answer).await.map(Some),
            _ => {
                tracing::debug!(store_id = %store_id, "Manual DNS IP prompt cancelled");
                Ok(None)
            }
        }
    }

    async fn reread(&self, store_id: StoreId) -> Option<Store> {
        match self.stores.get_by_id(store_id).await {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!(store_id = %store_id, error = %e, "Failed to reload store after DNS update");
                None
            }
        }
    }
}

fn fetch_notice(domain: &str, config: &ProviderDnsConfig) -> Notice {
    match config {
        ProviderDnsConfig::Records { .. } => Notice::success("DNS configuration updated from Vercel!"),
        ProviderDnsConfig::Nameservers(nameservers) => Notice::info(format!(
            "Vercel expects {domain} to use the nameservers {}. Default DNS targets were saved; \
             confirm the DNS IP manually.",
            nameservers.join(", ")
        )),
        ProviderDnsConfig::Unresolved => Notice::info(format!(
            "Vercel reported no DNS records for {domain}. Default DNS targets were saved; \
             confirm the DNS IP manually."
        )),
    }
}
