//! Shopforge Core - Shared types library.
//!
//! This crate provides common types used across all Shopforge components:
//! - `storefront` - Tenant storefronts, domain resolution, and DNS settings
//! - `cli` - Command-line tools for migrations and DNS management
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, hostnames, DNS targets, prices, and the store record
//! - [`cart`] - Shopper cart state container

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{Cart, CartError, CartLine, CartProduct};
pub use types::*;
