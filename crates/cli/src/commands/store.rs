//! Store management commands.
//!
//! # Usage
//!
//! ```bash
//! shopforge store create --name "My Shop" --domain myshop.com
//! ```

use shopforge_core::{Hostname, StoreId};
use shopforge_storefront::db::{NewStore, StoreRepository};

use crate::error::CliError;

/// Create a new store. The domain is normalized the way request hosts are.
pub async fn create(name: &str, domain: Option<&str>) -> Result<StoreId, CliError> {
    let domain = domain
        .map(Hostname::parse)
        .transpose()?
        .map(|host| host.as_str().to_owned());

    let stores = super::connect().await?;

    if let Some(domain) = &domain {
        let existing = stores.find_by_domain(domain).await?;
        if let Some(other) = existing.first() {
            tracing::warn!(
                "Store {} already uses {domain}; lookups will keep resolving to the lowest id",
                other.id
            );
        }
    }

    let store = stores
        .create(&NewStore {
            name: name.to_owned(),
            domain,
        })
        .await?;

    tracing::info!(
        "Store created successfully! ID: {}, Name: {}, Domain: {}",
        store.id,
        store.name,
        store.domain.as_deref().unwrap_or("(none)")
    );
    Ok(store.id)
}
