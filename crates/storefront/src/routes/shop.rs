//! Storefront page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tower_sessions::Session;
use tracing::instrument;

use shopforge_core::StoreId;

use crate::error::Result;
use crate::routes::load_store;
use crate::services::{CartService, SessionCartStore};
use crate::state::AppState;

/// Storefront page template.
#[derive(Template, WebTemplate)]
#[template(path = "shop.html")]
pub struct ShopTemplate {
    pub store_id: StoreId,
    pub name: String,
    pub domain: Option<String>,
    pub cart_count: u64,
}

/// Display a store's storefront page.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
    session: Session,
) -> Result<ShopTemplate> {
    let store = load_store(&state, store_id).await?;

    let carts = SessionCartStore::new(session);
    let cart_count = CartService::new(&carts)
        .load(store_id)
        .await
        .map_or_else(
            |e| {
                tracing::warn!(error = %e, "Failed to load cart for badge");
                0
            },
            |cart| cart.item_count(),
        );

    Ok(ShopTemplate {
        store_id,
        domain: store.custom_domain().map(String::from),
        name: store.name,
        cart_count,
    })
}
