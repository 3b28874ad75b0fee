//! Request hostname type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Hostname`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HostnameError {
    /// The input (after stripping the port) is empty.
    #[error("hostname cannot be empty")]
    Empty,
    /// The input contains characters that never appear in a hostname.
    #[error("hostname contains invalid characters: {0}")]
    InvalidCharacters(String),
}

/// The hostname a request arrived on.
///
/// Built from an HTTP `Host` header value. Parsing strips the port and any
/// trailing dot and lowercases ASCII letters, so `MyShop.com:443` and
/// `myshop.com.` both become `myshop.com`. Bracketed IPv6 literals keep
/// their brackets.
///
/// ```
/// use shopforge_core::Hostname;
///
/// let host = Hostname::parse("MyShop.COM:8080").unwrap();
/// assert_eq!(host.as_str(), "myshop.com");
/// assert!(!host.is_loopback());
/// assert!(Hostname::parse("localhost:3000").unwrap().is_loopback());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hostname(String);

impl Hostname {
    /// Parse a `Hostname` from a `Host` header value.
    ///
    /// # Errors
    ///
    /// Returns [`HostnameError::Empty`] if nothing is left after removing the
    /// port, or [`HostnameError::InvalidCharacters`] for whitespace, slashes,
    /// `@` and other characters that indicate a malformed header.
    pub fn parse(s: &str) -> Result<Self, HostnameError> {
        let trimmed = s.trim();
        let host = if trimmed.starts_with('[') {
            // [::1]:3000
            trimmed
                .find(']')
                .and_then(|end| trimmed.get(..=end))
                .unwrap_or(trimmed)
        } else {
            trimmed
                .rsplit_once(':')
                .map_or(trimmed, |(host, port)| {
                    if port.bytes().all(|b| b.is_ascii_digit()) {
                        host
                    } else {
                        trimmed
                    }
                })
        };
        let host = host.strip_suffix('.').unwrap_or(host);

        if host.is_empty() {
            return Err(HostnameError::Empty);
        }

        if host
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '/' | '@' | '?' | '#'))
        {
            return Err(HostnameError::InvalidCharacters(host.to_owned()));
        }

        Ok(Self(host.to_ascii_lowercase()))
    }

    /// Returns the hostname as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for `localhost` and `127.0.0.1`.
    #[must_use]
    pub fn is_loopback(&self) -> bool {
        matches!(self.0.as_str(), "localhost" | "127.0.0.1")
    }

    /// True if this hostname is the platform's own deployment domain.
    ///
    /// `suffix` is matched on a label boundary: with suffix `vercel.app`,
    /// `shop.vercel.app` and `vercel.app` match, `myvercel.app` does not.
    /// A leading dot on `suffix` is ignored.
    #[must_use]
    pub fn has_platform_suffix(&self, suffix: &str) -> bool {
        let suffix = suffix.trim_start_matches('.').to_ascii_lowercase();
        if suffix.is_empty() {
            return false;
        }
        self.0 == suffix
            || self
                .0
                .strip_suffix(suffix.as_str())
                .is_some_and(|rest| rest.ends_with('.'))
    }
}

impl fmt::Display for Hostname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Hostname {
    type Err = HostnameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Hostname {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
