//! DNS target values for custom domains.
//!
//! A store's custom domain must point at the platform either through an
//! A-record ([`DnsIp`]) or a CNAME. When a store has no explicit value the
//! platform defaults below apply.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// A-record target used when a store has no explicit DNS IP.
pub const DEFAULT_DNS_IP: &str = "216.198.79.193";

/// CNAME target used when a store has no explicit CNAME.
pub const DEFAULT_CNAME: &str = "cname.vercel-dns.com";

/// Four dot-separated groups of ASCII digits. Octet values are not range checked.
static DOTTED_QUAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+\.[0-9]+$").expect("dotted-quad pattern is valid")
});

/// Errors that can occur when parsing a [`DnsIp`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DnsIpError {
    /// The input string is empty.
    #[error("DNS IP cannot be empty")]
    Empty,
    /// The input is not four dot-separated numeric groups.
    #[error("'{0}' is not a dotted-quad IP address")]
    NotDottedQuad(String),
}

/// An owner-supplied A-record target.
///
/// Validation checks shape only: the value must be four numeric groups
/// separated by dots. `300.1.1.1` is accepted.
///
/// ```
/// use shopforge_core::DnsIp;
///
/// assert!(DnsIp::parse("216.198.79.193").is_ok());
/// assert!(DnsIp::parse("999.999.999.999").is_ok());
/// assert!(DnsIp::parse("").is_err());
/// assert!(DnsIp::parse("1.2.3").is_err());
/// assert!(DnsIp::parse("cname.vercel-dns.com").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DnsIp(String);

impl DnsIp {
    /// Parse a `DnsIp` from owner input.
    ///
    /// # Errors
    ///
    /// Returns [`DnsIpError::Empty`] for an empty string and
    /// [`DnsIpError::NotDottedQuad`] for anything else that does not match.
    pub fn parse(s: &str) -> Result<Self, DnsIpError> {
        if s.is_empty() {
            return Err(DnsIpError::Empty);
        }
        if !DOTTED_QUAD.is_match(s) {
            return Err(DnsIpError::NotDottedQuad(s.to_owned()));
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the IP as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `DnsIp` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for DnsIp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for DnsIp {
    type Err = DnsIpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DnsIp {
    type Error = DnsIpError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<DnsIp> for String {
    fn from(ip: DnsIp) -> Self {
        ip.0
    }
}

impl AsRef<str> for DnsIp {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
