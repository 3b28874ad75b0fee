//! Integration tests for Shopforge.
//!
//! Each test spawns the storefront on an ephemeral port with an in-memory
//! store repository and in-memory sessions, and talks to it over real HTTP.
//! Vercel is replaced by [`MockVercel`], a local axum server that records
//! every request it receives, so the production `VercelClient` is exercised
//! end to end.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopforge-integration-tests
//!
//! # Including the PostgreSQL repository tests
//! STOREFRONT_DATABASE_URL=postgres://localhost/shopforge_test \
//!     cargo test -p shopforge-integration-tests -- --include-ignored
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use reqwest::{Client, redirect};
use secrecy::SecretString;
use serde_json::{Value, json};
use tower_sessions::MemoryStore;

use shopforge_core::{Store, StoreId};
use shopforge_storefront::config::{StorefrontConfig, VercelConfig};
use shopforge_storefront::db::InMemoryStoreRepository;
use shopforge_storefront::middleware::session::session_layer;
use shopforge_storefront::state::AppState;
use shopforge_storefront::vercel::VercelClient;

/// Bearer token the mock Vercel API accepts.
pub const VERCEL_TOKEN: &str = "vercel_test_token_9f8e7d6c";

/// Project the mock Vercel API serves domains for.
pub const VERCEL_PROJECT: &str = "prj_shopforge_test";

/// Store record with no DNS data.
#[must_use]
pub fn store(id: i32, domain: Option<&str>) -> Store {
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

// =============================================================================
// Mock Vercel API
// =============================================================================

#[derive(Clone, Default)]
struct MockState {
    hits: Arc<AtomicUsize>,
    domains: Arc<Mutex<HashMap<String, (StatusCode, Value)>>>,
}

/// Local stand-in for `GET /projects/{project}/domains/{domain}`.
///
/// Unknown domains answer 404, bad credentials 403.
pub struct MockVercel {
    base_url: String,
    state: MockState,
}

impl MockVercel {
    /// Start the mock on an ephemeral port.
    pub async fn start() -> Self {
        let state = MockState::default();
        let app = Router::new()
            .route("/v10/projects/{project}/domains/{domain}", get(domain_handler))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}/v10"),
            state,
        }
    }

    /// Answer `domain` with `body`.
    pub fn respond(&self, domain: &str, body: Value) {
        self.respond_with(domain, StatusCode::OK, body);
    }

    /// Answer `domain` with an arbitrary status.
    pub fn respond_with(&self, domain: &str, status: StatusCode, body: Value) {
        self.state
            .domains
            .lock()
            .unwrap()
            .insert(domain.to_string(), (status, body));
    }

    /// Number of requests received, including rejected ones.
    #[must_use]
    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    /// Client configuration pointing at this mock.
    #[must_use]
    pub fn config(&self) -> VercelConfig {
        VercelConfig {
            api_token: Some(SecretString::from(VERCEL_TOKEN)),
            project_id: Some(VERCEL_PROJECT.to_string()),
            api_base_url: self.base_url.clone(),
            timeout: Duration::from_secs(5),
        }
    }
}

async fn domain_handler(
    State(state): State<MockState>,
    Path((project, domain)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);

    let expected = format!("Bearer {VERCEL_TOKEN}");
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        == Some(expected.as_str());
    if !authorized || project != VERCEL_PROJECT {
        return (StatusCode::FORBIDDEN, Json(json!({"error": {"code": "forbidden"}})))
            .into_response();
    }

    let answer = state.domains.lock().unwrap().get(&domain).cloned();
    match answer {
        Some((status, body)) => (status, Json(body)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": {"code": "not_found", "message": "Domain not found"}})),
        )
            .into_response(),
    }
}

// =============================================================================
// Test Context
// =============================================================================

/// A running storefront plus handles on its backing fakes.
pub struct TestContext {
    /// Client that does not follow redirects and keeps cookies.
    pub client: Client,
    pub base_url: String,
    pub stores: Arc<InMemoryStoreRepository>,
    pub vercel: MockVercel,
}

impl TestContext {
    /// Storefront with Vercel credentials configured.
    pub async fn new(stores: Vec<Store>) -> Self {
        let vercel = MockVercel::start().await;
        let config = vercel.config();
        Self::spawn(stores, vercel, config).await
    }

    /// Storefront whose Vercel token and project are unset.
    pub async fn without_vercel_credentials(stores: Vec<Store>) -> Self {
        let vercel = MockVercel::start().await;
        let config = VercelConfig {
            api_token: None,
            project_id: None,
            ..vercel.config()
        };
        Self::spawn(stores, vercel, config).await
    }

    async fn spawn(stores: Vec<Store>, vercel: MockVercel, vercel_config: VercelConfig) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{addr}");

        let mut config = StorefrontConfig::new(
            SecretString::from("postgres://localhost/unused"),
            base_url.clone(),
        );
        config.vercel = vercel_config;

        let repo = Arc::new(InMemoryStoreRepository::with_stores(stores));
        let provider = VercelClient::new(&config.vercel).unwrap();
        let sessions = session_layer(MemoryStore::default(), &config);
        let state = AppState::new(config, repo.clone(), Arc::new(provider));
        let app = shopforge_storefront::app(state, sessions);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .cookie_store(true)
            .build()
            .unwrap();

        Self {
            client,
            base_url,
            stores: repo,
            vercel,
        }
    }

    /// Absolute URL for `path` on the storefront.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `GET /` as if the request arrived for `host`.
    pub async fn get_root_as(&self, host: &str) -> reqwest::Response {
        self.client
            .get(self.url("/"))
            .header("x-forwarded-host", host)
            .send()
            .await
            .unwrap()
    }

    /// POST a form and return the redirect target.
    pub async fn post_form_location(&self, path: &str, form: &[(&str, &str)]) -> String {
        let response = self.client.post(self.url(path)).form(form).send().await.unwrap();
        assert_eq!(response.status(), 303, "expected redirect from {path}");
        location(&response)
    }
}

/// Path and decoded `(notice, message)` pair of a settings-page redirect.
#[must_use]
pub fn split_notice(location: &str) -> (String, Option<(String, String)>) {
    let url = reqwest::Url::parse(&format!("http://storefront.test{location}")).unwrap();
    let pairs: HashMap<String, String> = url.query_pairs().into_owned().collect();
    let notice = match (pairs.get("notice"), pairs.get("message")) {
        (Some(level), Some(message)) => Some((level.clone(), message.clone())),
        _ => None,
    };
    (url.path().to_string(), notice)
}

/// `Location` header of a redirect response.
#[must_use]
pub fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
