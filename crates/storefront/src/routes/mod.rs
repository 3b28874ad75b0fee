//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                 - Custom domain redirect, else home page
//! GET  /health                           - Liveness check
//! GET  /health/ready                     - Readiness check (store backend)
//!
//! # Storefront
//! GET  /shop/{id}                        - Store page (route name `ShopStore`)
//!
//! # Cart (JSON)
//! GET  /shop/{id}/cart                   - Cart contents
//! POST /shop/{id}/cart/add               - Add one unit of a product
//! POST /shop/{id}/cart/update            - Set a line's quantity
//! POST /shop/{id}/cart/remove            - Remove a line
//! POST /shop/{id}/cart/clear             - Empty the cart
//!
//! # Owner DNS settings
//! GET  /manage/stores/{id}/dns           - DNS targets and last notice
//! GET  /manage/stores/{id}/dns/ip        - Manual IP form, pre-filled
//! POST /manage/stores/{id}/dns/ip        - Save a manual IP
//! POST /manage/stores/{id}/dns/fetch     - Pull DNS targets from Vercel
//! GET  /api/stores/{id}/dns              - DNS targets as JSON
//! ```

pub mod cart;
pub mod dns;
pub mod health;
pub mod home;
pub mod shop;

use axum::{
    Router,
    routing::{get, post},
};

use shopforge_core::{Store, StoreId};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create the owner DNS routes router.
pub fn dns_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dns::show))
        .route("/ip", get(dns::ip_form).post(dns::update_ip))
        .route("/fetch", post(dns::fetch))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/shop/{id}", get(shop::show))
        .nest("/shop/{id}/cart", cart_routes())
        .nest("/manage/stores/{id}/dns", dns_routes())
        .route("/api/stores/{id}/dns", get(dns::api_show))
}

/// Load a store or fail with 404.
pub(crate) async fn load_store(state: &AppState, id: StoreId) -> Result<Store> {
    state
        .stores()
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("store {id}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use chrono::Utc;
    use secrecy::SecretString;
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use tower_sessions::MemoryStore;

    use super::*;
    use crate::config::StorefrontConfig;
    use crate::db::InMemoryStoreRepository;
    use crate::middleware::session::session_layer;
    use crate::vercel::{DomainProvider, VercelError};

    struct StaticProvider(Value);

    #[async_trait]
    impl DomainProvider for StaticProvider {
        async fn domain_config(&self, _domain: &str) -> std::result::Result<Value, VercelError> {
            Ok(self.0.clone())
        }
    }

    fn store(id: i32, domain: Option<&str>) -> Store {
        let now = Utc::now();
        Store {
            id: StoreId::new(id),
            name: format!("Store {id}"),
            domain: domain.map(String::from),
            vercel_dns_ip: None,
            vercel_cname: None,
            vercel_domain_config: None,
            last_dns_config_fetch: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn app_with(repo: Arc<InMemoryStoreRepository>, provider: Value) -> Router {
        let config = StorefrontConfig::new(
            SecretString::from("postgres://localhost/test"),
            "http://localhost:3000",
        );
        let sessions = session_layer(MemoryStore::default(), &config);
        let state = AppState::new(config, repo, Arc::new(StaticProvider(provider)));
        crate::app(state, sessions)
    }

    fn get(uri: &str, host: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::HOST, host)
            .body(Body::empty())
            .unwrap()
    }

    fn post_form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::HOST, "localhost")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    fn location(response: &axum::response::Response) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    #[tokio::test]
    async fn test_custom_domain_redirects_to_storefront() {
        let repo = Arc::new(InMemoryStoreRepository::with_stores(vec![store(
            7,
            Some("myshop.com"),
        )]));
        let response = app_with(repo, json!({}))
            .oneshot(get("/", "myshop.com"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/shop/7");
    }

    #[tokio::test]
    async fn test_platform_hosts_render_home() {
        let repo = Arc::new(InMemoryStoreRepository::with_stores(vec![store(
            1,
            Some("localhost"),
        )]));
        let app = app_with(repo, json!({}));
        for host in ["localhost:3000", "127.0.0.1", "shopforge.vercel.app", "unknown.com"] {
            let response = app.clone().oneshot(get("/", host)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{host}");
        }
    }

    #[tokio::test]
    async fn test_lookup_failure_renders_home() {
        let repo = Arc::new(InMemoryStoreRepository::with_stores(vec![store(
            1,
            Some("myshop.com"),
        )]));
        repo.fail_lookups(true);
        let response = app_with(repo, json!({}))
            .oneshot(get("/", "myshop.com"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_store_is_404() {
        let repo = Arc::new(InMemoryStoreRepository::new());
        let response = app_with(repo, json!({}))
            .oneshot(get("/shop/3", "localhost"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_ip_redirects_with_notice() {
        let repo = Arc::new(InMemoryStoreRepository::with_stores(vec![store(2, None)]));
        let app = app_with(repo.clone(), json!({}));

        let response = app
            .clone()
            .oneshot(post_form("/manage/stores/2/dns/ip", "ip=76.76.21.21"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            location(&response),
            "/manage/stores/2/dns?notice=success&message=DNS%20IP%20updated%20to%2076.76.21.21%21"
        );
        assert_eq!(repo.snapshot(StoreId::new(2)).unwrap().dns_ip(), "76.76.21.21");

        let response = app
            .oneshot(post_form("/manage/stores/2/dns/ip", "ip=not-an-ip"))
            .await
            .unwrap();
        assert!(location(&response).contains("notice=error"));
        assert_eq!(repo.writes(), 1);
    }

    #[tokio::test]
    async fn test_empty_ip_is_a_cancel() {
        let repo = Arc::new(InMemoryStoreRepository::with_stores(vec![store(2, None)]));
        let response = app_with(repo.clone(), json!({}))
            .oneshot(post_form("/manage/stores/2/dns/ip", "ip="))
            .await
            .unwrap();
        assert_eq!(location(&response), "/manage/stores/2/dns");
        assert_eq!(repo.writes(), 0);
    }

    #[tokio::test]
    async fn test_fetch_without_domain_reports_notice() {
        let repo = Arc::new(InMemoryStoreRepository::with_stores(vec![store(4, None)]));
        let response = app_with(repo.clone(), json!({}))
            .oneshot(post_form("/manage/stores/4/dns/fetch", ""))
            .await
            .unwrap();
        assert_eq!(
            location(&response),
            "/manage/stores/4/dns?notice=error&message=No%20domain%20configured%20for%20this%20store."
        );
        assert_eq!(repo.writes(), 0);
    }

    #[tokio::test]
    async fn test_dns_pages_render() {
        let repo = Arc::new(InMemoryStoreRepository::with_stores(vec![store(
            5,
            Some("myshop.com"),
        )]));
        let app = app_with(repo, json!({}));

        let response = app
            .clone()
            .oneshot(get(
                "/manage/stores/5/dns?notice=info&message=hello",
                "localhost",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(get("/manage/stores/5/dns/ip", "localhost"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(get("/api/stores/5/dns", "localhost"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["dns_ip"], "216.198.79.193");
        assert_eq!(json["cname"], "cname.vercel-dns.com");
        assert_eq!(json["domain"], "myshop.com");
    }

    #[tokio::test]
    async fn test_cart_add_returns_cart() {
        let repo = Arc::new(InMemoryStoreRepository::with_stores(vec![store(1, None)]));
        let response = app_with(repo, json!({}))
            .oneshot(post_form(
                "/shop/1/cart/add",
                "product_id=9&name=Candle&price=12.50",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["item_count"], 1);
        assert_eq!(json["total"], "$12.50");
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let repo = Arc::new(InMemoryStoreRepository::new());
        let app = app_with(repo, json!({}));
        let response = app.clone().oneshot(get("/health", "localhost")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let response = app.oneshot(get("/health/ready", "localhost")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
