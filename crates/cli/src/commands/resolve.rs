//! Hostname resolution command.
//!
//! # Usage
//!
//! ```bash
//! shopforge resolve myshop.com
//! ```

use shopforge_core::Hostname;
use shopforge_storefront::config::platform_domain_suffix_from_env;
use shopforge_storefront::services::DomainResolver;

use crate::error::CliError;

/// Print the route `host` resolves to. Lookup failures are reported, not
/// swallowed as they are for live requests.
pub async fn resolve(host: &str) -> Result<(), CliError> {
    let host = Hostname::parse(host)?;
    let stores = super::connect().await?;
    let suffix = platform_domain_suffix_from_env();

    let resolver = DomainResolver::new(&stores, &suffix);
    let target = resolver.try_resolve(&host).await.map_err(|e| e.source)?;

    #[allow(clippy::print_stdout)]
    {
        println!("{host} -> {} ({})", target.path(), target.name());
    }
    Ok(())
}
