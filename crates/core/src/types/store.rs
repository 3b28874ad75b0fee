//! Tenant store record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::dns::{DEFAULT_CNAME, DEFAULT_DNS_IP};
use super::id::StoreId;

/// One merchant's store.
///
/// The DNS fields are optional in storage. Read them through
/// [`Store::dns_ip`] and [`Store::cname`] (or the `*_or_default` functions
/// when the store itself may be missing), which fall back to the platform
/// defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Store {
    /// Unique store ID, assigned at creation.
    pub id: StoreId,
    /// Display name.
    pub name: String,
    /// Custom hostname the owner points at the platform.
    pub domain: Option<String>,
    /// A-record target last confirmed for the domain.
    pub vercel_dns_ip: Option<String>,
    /// CNAME target last confirmed for the domain.
    pub vercel_cname: Option<String>,
    /// Raw provider response from the last fetch. Diagnostics only.
    pub vercel_domain_config: Option<serde_json::Value>,
    /// When the DNS fields were last written.
    pub last_dns_config_fetch: Option<DateTime<Utc>>,
    /// When the store was created.
    pub created_at: DateTime<Utc>,
    /// When the store was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Store {
    /// The custom domain, if one is set and non-empty.
    #[must_use]
    pub fn custom_domain(&self) -> Option<&str> {
        non_empty(self.domain.as_deref())
    }

    /// A-record target for this store's domain.
    #[must_use]
    pub fn dns_ip(&self) -> &str {
        non_empty(self.vercel_dns_ip.as_deref()).unwrap_or(DEFAULT_DNS_IP)
    }

    /// CNAME target for this store's domain.
    #[must_use]
    pub fn cname(&self) -> &str {
        non_empty(self.vercel_cname.as_deref()).unwrap_or(DEFAULT_CNAME)
    }
}

/// A-record target for a store that may not be loaded yet.
#[must_use]
pub fn dns_ip_or_default(store: Option<&Store>) -> &str {
    store.map_or(DEFAULT_DNS_IP, Store::dns_ip)
}

/// CNAME target for a store that may not be loaded yet.
#[must_use]
pub fn cname_or_default(store: Option<&Store>) -> &str {
    store.map_or(DEFAULT_CNAME, Store::cname)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Store {
        let now = Utc::now();
        Store {
            id: StoreId::new(1),
            name: "My Shop".to_string(),
            domain: None,
            vercel_dns_ip: None,
            vercel_cname: None,
            vercel_domain_config: None,
            last_dns_config_fetch: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_missing_store_uses_defaults() {
        assert_eq!(dns_ip_or_default(None), "216.198.79.193");
        assert_eq!(cname_or_default(None), "cname.vercel-dns.com");
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let s = store();
        assert_eq!(s.dns_ip(), DEFAULT_DNS_IP);
        assert_eq!(s.cname(), DEFAULT_CNAME);
        assert_eq!(dns_ip_or_default(Some(&s)), DEFAULT_DNS_IP);
    }

    #[test]
    fn test_empty_fields_use_defaults() {
        let s = Store {
            vercel_dns_ip: Some(String::new()),
            vercel_cname: Some(String::new()),
            ..store()
        };
        assert_eq!(s.dns_ip(), DEFAULT_DNS_IP);
        assert_eq!(s.cname(), DEFAULT_CNAME);
    }

    #[test]
    fn test_present_fields_returned_unchanged() {
        let s = Store {
            vercel_dns_ip: Some("76.76.21.21".to_string()),
            vercel_cname: Some("custom.vercel-dns.com".to_string()),
            ..store()
        };
        assert_eq!(dns_ip_or_default(Some(&s)), "76.76.21.21");
        assert_eq!(cname_or_default(Some(&s)), "custom.vercel-dns.com");
    }

    #[test]
    fn test_accessors_do_not_validate_stored_values() {
        // Whatever was persisted is shown as-is
        let s = Store {
            vercel_dns_ip: Some("not-an-ip".to_string()),
            ..store()
        };
        assert_eq!(s.dns_ip(), "not-an-ip");
    }

    #[test]
    fn test_custom_domain() {
        assert_eq!(store().custom_domain(), None);
        let s = Store {
            domain: Some(String::new()),
            ..store()
        };
        assert_eq!(s.custom_domain(), None);
        let s = Store {
            domain: Some("myshop.com".to_string()),
            ..store()
        };
        assert_eq!(s.custom_domain(), Some("myshop.com"));
    }
}
