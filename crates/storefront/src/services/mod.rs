//! Business logic services for storefront.
//!
//! # Services
//!
//! - `resolver` - Map custom domains to tenant storefronts
//! - `dns` - Keep store DNS targets in line with Vercel
//! - `cart` - Per-store shopper carts on the session

pub mod cart;
pub mod dns;
pub mod resolver;

pub use cart::{CartService, CartServiceError, CartStore, SessionCartStore};
pub use dns::{DnsIpPrompt, DnsSyncError, DnsSyncService, DnsUpdate};
pub use resolver::{DomainResolver, LookupError};
