//! Shopper cart service.
//!
//! Loads a [`Cart`] through a [`CartStore`], applies one mutation and saves it
//! back. Carts are keyed by store id, so a shopper visiting two storefronts
//! keeps two independent carts.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;
use tower_sessions::Session;

use shopforge_core::{Cart, CartError, CartLine, CartProduct, StoreId};

/// Errors from a cart persistence backend.
#[derive(Debug, Error)]
pub enum CartStoreError {
    /// Session read or write failed.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Backend could not be reached.
    #[error("cart store unavailable: {0}")]
    Unavailable(String),
}

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartServiceError {
    #[error(transparent)]
    Store(#[from] CartStoreError),

    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Saves and loads the line items of one store's cart.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Lines saved for `store_id`, empty if none.
    async fn load(&self, store_id: StoreId) -> Result<Vec<CartLine>, CartStoreError>;

    /// Replace the lines saved for `store_id`.
    async fn save(&self, store_id: StoreId, lines: &[CartLine]) -> Result<(), CartStoreError>;
}

/// Session key holding a store's cart lines.
#[must_use]
pub fn session_key(store_id: StoreId) -> String {
    format!("cart:{store_id}")
}

/// [`CartStore`] on the shopper's session.
#[derive(Clone)]
pub struct SessionCartStore {
    session: Session,
}

impl SessionCartStore {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

#[async_trait]
impl CartStore for SessionCartStore {
    async fn load(&self, store_id: StoreId) -> Result<Vec<CartLine>, CartStoreError> {
        Ok(self
            .session
            .get::<Vec<CartLine>>(&session_key(store_id))
            .await?
            .unwrap_or_default())
    }

    async fn save(&self, store_id: StoreId, lines: &[CartLine]) -> Result<(), CartStoreError> {
        self.session.insert(&session_key(store_id), lines).await?;
        Ok(())
    }
}

/// [`CartStore`] over a map, for tests and the CLI.
#[derive(Default)]
pub struct MemoryCartStore {
    carts: Mutex<HashMap<StoreId, Vec<CartLine>>>,
}

impl MemoryCartStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<StoreId, Vec<CartLine>>> {
        self.carts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl CartStore for MemoryCartStore {
    async fn load(&self, store_id: StoreId) -> Result<Vec<CartLine>, CartStoreError> {
        Ok(self.lock().get(&store_id).cloned().unwrap_or_default())
    }

    async fn save(&self, store_id: StoreId, lines: &[CartLine]) -> Result<(), CartStoreError> {
        self.lock().insert(store_id, lines.to_vec());
        Ok(())
    }
}

/// Cart operations for one shopper.
pub struct CartService<'a> {
    carts: &'a dyn CartStore,
}

impl<'a> CartService<'a> {
    #[must_use]
    pub const fn new(carts: &'a dyn CartStore) -> Self {
        Self { carts }
    }

    /// Load the cart for `store_id`.
    ///
    /// # Errors
    ///
    /// Returns `CartServiceError::Store` if the backend fails.
    pub async fn load(&self, store_id: StoreId) -> Result<Cart, CartServiceError> {
        let lines = self.carts.load(store_id).await?;
        Ok(Cart::from_lines(store_id, lines))
    }

    /// Add one unit of `product`.
    ///
    /// # Errors
    ///
    /// Returns `CartServiceError::Store` if the backend fails, or
    /// `CartServiceError::Cart` if the cart rejects the product. A rejected
    /// product is not saved.
    pub async fn add_item(
        &self,
        store_id: StoreId,
        product: CartProduct,
    ) -> Result<Cart, CartServiceError> {
        self.mutate(store_id, |cart| cart.add_item(product)).await
    }

    /// Set a line's quantity; zero or less removes the line.
    ///
    /// # Errors
    ///
    /// Returns `CartServiceError::Cart` if `index` is out of bounds.
    /// Returns `CartServiceError::Store` if the backend fails.
    pub async fn update_quantity(
        &self,
        store_id: StoreId,
        index: usize,
        quantity: i64,
    ) -> Result<Cart, CartServiceError> {
        self.mutate(store_id, |cart| cart.update_quantity(index, quantity))
            .await
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns `CartServiceError::Cart` if `index` is out of bounds.
    /// Returns `CartServiceError::Store` if the backend fails.
    pub async fn remove_item(&self, store_id: StoreId, index: usize) -> Result<Cart, CartServiceError> {
        self.mutate(store_id, |cart| cart.remove_item(index).map(|_| ()))
            .await
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartServiceError::Store` if the backend fails.
    pub async fn clear(&self, store_id: StoreId) -> Result<Cart, CartServiceError> {
        self.mutate(store_id, |cart| {
            cart.clear();
            Ok(())
        })
        .await
    }

    async fn mutate(
        &self,
        store_id: StoreId,
        apply: impl FnOnce(&mut Cart) -> Result<(), CartError> + Send,
    ) -> Result<Cart, CartServiceError> {
        let mut cart = self.load(store_id).await?;
        apply(&mut cart)?;
        self.carts.save(store_id, cart.lines()).await?;
        Ok(cart)
    }
}
