//! Interpretation of Vercel domain configuration responses.
//!
//! The response is stored verbatim; this module only pulls out values Vercel
//! states explicitly. Nothing is inferred. Fields looked at:
//!
//! - `recommendedIPv4`: `[{ "rank": 1, "value": ["76.76.21.21"] }, ...]`
//! - `aValues`: `["76.76.21.21"]`
//! - `recommendedCNAME`: `[{ "rank": 1, "value": "cname.vercel-dns.com." }, ...]`
//! - `cNames`: `["cname.vercel-dns.com"]`
//! - `intendedNameservers`: `["ns1.vercel-dns.com", ...]`

use serde_json::Value;

use shopforge_core::DnsIp;

/// What the provider said about how a domain should be pointed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderDnsConfig {
    /// At least one explicit record target.
    Records {
        ip: Option<DnsIp>,
        cname: Option<String>,
    },
    /// No explicit records; the domain is expected to delegate to these
    /// nameservers instead.
    Nameservers(Vec<String>),
    /// Neither records nor nameservers.
    Unresolved,
}

impl ProviderDnsConfig {
    /// Classify a raw provider response.
    #[must_use]
    pub fn from_response(value: &Value) -> Self {
        let ip = extract_ipv4(value);
        let cname = extract_cname(value);
        if ip.is_some() || cname.is_some() {
            return Self::Records { ip, cname };
        }

        let nameservers = string_list(value.get("intendedNameservers"));
        if nameservers.is_empty() {
            Self::Unresolved
        } else {
            Self::Nameservers(nameservers)
        }
    }

    /// Explicit A-record target, if any.
    #[must_use]
    pub fn ip(&self) -> Option<&DnsIp> {
        match self {
            Self::Records { ip, .. } => ip.as_ref(),
            _ => None,
        }
    }

    /// Explicit CNAME target, if any.
    #[must_use]
    pub fn cname(&self) -> Option<&str> {
        match self {
            Self::Records { cname, .. } => cname.as_deref(),
            _ => None,
        }
    }

    /// True when both record targets were stated by the provider.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(
            self,
            Self::Records {
                ip: Some(_),
                cname: Some(_)
            }
        )
    }
}

/// Rank-1 recommended IPv4, else the first current A value.
fn extract_ipv4(value: &Value) -> Option<DnsIp> {
    let recommended = ranked_first(value.get("recommendedIPv4")).and_then(|entry| {
        match entry.get("value") {
            Some(Value::Array(ips)) => ips.iter().find_map(Value::as_str).map(String::from),
            Some(Value::String(ip)) => Some(ip.clone()),
            _ => None,
        }
    });

    recommended
        .into_iter()
        .chain(string_list(value.get("aValues")))
        .find_map(|candidate| DnsIp::parse(candidate.trim()).ok())
}

/// Rank-1 recommended CNAME, else the first current CNAME. Trailing dot removed.
fn extract_cname(value: &Value) -> Option<String> {
    let recommended = ranked_first(value.get("recommendedCNAME")).and_then(|entry| {
        match entry.get("value") {
            Some(Value::String(cname)) => Some(cname.clone()),
            Some(Value::Array(cnames)) => cnames.iter().find_map(Value::as_str).map(String::from),
            _ => None,
        }
    });

    recommended
        .into_iter()
        .chain(string_list(value.get("cNames")))
        .map(|cname| cname.trim().trim_end_matches('.').to_string())
        .find(|cname| !cname.is_empty())
}

/// The entry with the lowest `rank` (missing rank sorts last).
fn ranked_first(list: Option<&Value>) -> Option<&Value> {
    list?
        .as_array()?
        .iter()
        .min_by_key(|entry| entry.get("rank").and_then(Value::as_u64).unwrap_or(u64::MAX))
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_recommended_records() {
        let response = json!({
            "recommendedIPv4": [
                { "rank": 2, "value": ["76.76.21.98"] },
                { "rank": 1, "value": ["216.198.79.193"] }
            ],
            "recommendedCNAME": [
                { "rank": 1, "value": "abc123.vercel-dns-017.com." }
            ]
        });
        let config = ProviderDnsConfig::from_response(&response);
        assert_eq!(config.ip().map(DnsIp::as_str), Some("216.198.79.193"));
        assert_eq!(config.cname(), Some("abc123.vercel-dns-017.com"));
        assert!(config.is_complete());
    }

    #[test]
    fn test_current_values_used_when_no_recommendation() {
        let response = json!({ "aValues": ["76.76.21.21"], "cNames": [] });
        let config = ProviderDnsConfig::from_response(&response);
        assert_eq!(config.ip().map(DnsIp::as_str), Some("76.76.21.21"));
        assert_eq!(config.cname(), None);
        assert!(!config.is_complete());
    }

    #[test]
    fn test_malformed_ip_is_ignored() {
        let response = json!({ "aValues": ["2606:4700::1"] });
        assert_eq!(
            ProviderDnsConfig::from_response(&response),
            ProviderDnsConfig::Unresolved
        );
    }

    #[test]
    fn test_nameserver_delegation() {
        let response = json!({
            "name": "myshop.com",
            "intendedNameservers": ["ns1.vercel-dns.com", "ns2.vercel-dns.com"],
            "nameservers": ["ns1.registrar.example"]
        });
        assert_eq!(
            ProviderDnsConfig::from_response(&response),
            ProviderDnsConfig::Nameservers(vec![
                "ns1.vercel-dns.com".to_string(),
                "ns2.vercel-dns.com".to_string()
            ])
        );
    }

    #[test]
    fn test_project_domain_response_is_unresolved() {
        let response = json!({
            "name": "myshop.com",
            "apexName": "myshop.com",
            "projectId": "prj_1",
            "verified": true
        });
        let config = ProviderDnsConfig::from_response(&response);
        assert_eq!(config, ProviderDnsConfig::Unresolved);
        assert_eq!(config.ip(), None);
    }
}
