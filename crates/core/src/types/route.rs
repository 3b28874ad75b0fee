//! Navigation targets produced by domain resolution.

use serde::{Deserialize, Serialize};

use super::id::StoreId;

/// Where a navigation to `/` should end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "route", content = "store_id", rename_all = "snake_case")]
pub enum RouteTarget {
    /// The generic platform home page.
    Home,
    /// A tenant's storefront (`ShopStore` route).
    Storefront(StoreId),
}

impl RouteTarget {
    /// Route name, matching the storefront router.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Storefront(_) => "ShopStore",
        }
    }

    /// Canonical path for this target.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Storefront(id) => format!("/shop/{id}"),
        }
    }
}
