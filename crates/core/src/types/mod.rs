//! Core types for Shopforge.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod dns;
pub mod hostname;
pub mod id;
pub mod notice;
pub mod price;
pub mod route;
pub mod store;

pub use dns::{DEFAULT_CNAME, DEFAULT_DNS_IP, DnsIp, DnsIpError};
pub use hostname::{Hostname, HostnameError};
pub use id::*;
pub use notice::{Notice, NoticeLevel};
pub use price::{CurrencyCode, Price};
pub use route::RouteTarget;
pub use store::{Store, cname_or_default, dns_ip_or_default};
