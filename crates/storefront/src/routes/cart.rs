//! Cart route handlers.
//!
//! Each storefront keeps its own cart in the shopper's session. Every
//! mutation answers with the full cart so the page can re-render it.

use axum::{
    Form, Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use shopforge_core::{Cart, CartError, CartProduct, CurrencyCode, Price, ProductId, StoreId};

use crate::error::{Result, add_breadcrumb};
use crate::routes::load_store;
use crate::services::{CartService, CartServiceError, SessionCartStore};
use crate::state::AppState;

/// Cart line as returned to the page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLineView {
    pub index: usize,
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

/// Cart as returned to the page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartView {
    pub store_id: StoreId,
    pub lines: Vec<CartLineView>,
    pub item_count: u64,
    pub total: String,
}

impl TryFrom<&Cart> for CartView {
    type Error = CartError;

    fn try_from(cart: &Cart) -> std::result::Result<Self, CartError> {
        let lines = cart
            .lines()
            .iter()
            .enumerate()
            .map(|(index, line)| {
                Ok(CartLineView {
                    index,
                    product_id: line.product.id,
                    name: line.product.name.clone(),
                    quantity: line.quantity,
                    unit_price: line.product.price.to_string(),
                    line_total: line.line_total()?.to_string(),
                })
            })
            .collect::<std::result::Result<_, CartError>>()?;

        Ok(Self {
            store_id: cart.store_id(),
            lines,
            item_count: cart.item_count(),
            total: cart.total()?.to_string(),
        })
    }
}

fn render(cart: &Cart) -> Result<Json<CartView>> {
    let view = CartView::try_from(cart).map_err(CartServiceError::from)?;
    Ok(Json(view))
}

/// Add to cart form data.
///
/// The storefront page posts a snapshot of the product it shows.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub currency: CurrencyCode,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub index: usize,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub index: usize,
}

/// Display cart contents.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
    session: Session,
) -> Result<Json<CartView>> {
    load_store(&state, store_id).await?;
    let carts = SessionCartStore::new(session);
    let cart = CartService::new(&carts).load(store_id).await?;
    render(&cart)
}

/// Add one unit of a product.
#[instrument(skip(state, session, form))]
pub async fn add(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Json<CartView>> {
    load_store(&state, store_id).await?;

    let product_id = form.product_id.to_string();
    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", &product_id)]));

    let carts = SessionCartStore::new(session);
    let cart = CartService::new(&carts)
        .add_item(
            store_id,
            CartProduct {
                id: form.product_id,
                name: form.name,
                price: Price::new(form.price, form.currency),
            },
        )
        .await?;
    render(&cart)
}

/// Set a line's quantity. Zero or less removes the line.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<Json<CartView>> {
    load_store(&state, store_id).await?;
    let carts = SessionCartStore::new(session);
    let cart = CartService::new(&carts)
        .update_quantity(store_id, form.index, form.quantity)
        .await?;
    render(&cart)
}

/// Remove a line.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Json<CartView>> {
    load_store(&state, store_id).await?;
    let carts = SessionCartStore::new(session);
    let cart = CartService::new(&carts)
        .remove_item(store_id, form.index)
        .await?;
    render(&cart)
}

/// Empty the cart.
#[instrument(skip(state, session))]
pub async fn clear(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
    session: Session,
) -> Result<Json<CartView>> {
    load_store(&state, store_id).await?;
    let carts = SessionCartStore::new(session);
    let cart = CartService::new(&carts).clear(store_id).await?;
    render(&cart)
}
