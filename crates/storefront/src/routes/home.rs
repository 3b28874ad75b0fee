//! Home page route handler.
//!
//! `/` is also where custom domains land. The resolver runs before any
//! response is produced, so a shopper on a tenant's domain gets the redirect
//! and never sees the platform home page first.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use shopforge_core::RouteTarget;

use crate::middleware::RequestHost;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub base_url: String,
}

/// Redirect custom domains to their storefront, else show the home page.
#[instrument(skip(state, host), fields(host))]
pub async fn home(State(state): State<AppState>, RequestHost(host): RequestHost) -> Response {
    let target = match &host {
        Some(host) => {
            tracing::Span::current().record("host", host.as_str());
            state.resolver().resolve(host).await
        }
        None => RouteTarget::Home,
    };

    match target {
        RouteTarget::Storefront(store_id) => {
            tracing::info!(store_id = %store_id, route = target.name(), "Redirecting custom domain");
            Redirect::to(&target.path()).into_response()
        }
        RouteTarget::Home => HomeTemplate {
            base_url: state.config().base_url.clone(),
        }
        .into_response(),
    }
}
