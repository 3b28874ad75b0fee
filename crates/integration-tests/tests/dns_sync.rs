//! Integration tests for owner DNS settings.
//!
//! The storefront talks to [`MockVercel`] through the production Vercel
//! client, so these cover request construction, response classification,
//! persistence, and the notice shown to the owner.
//!
//! [`MockVercel`]: shopforge_integration_tests::MockVercel

use axum::http::StatusCode;
use serde_json::{Value, json};

use shopforge_core::StoreId;
use shopforge_integration_tests::{TestContext, split_notice, store};

const SETTINGS: &str = "/manage/stores/7/dns";
const VALIDATION_MESSAGE: &str = "Please enter a valid IP address (e.g., 216.198.79.193)";

fn notice(level: &str, message: &str) -> Option<(String, String)> {
    Some((level.to_string(), message.to_string()))
}

async fn set_ip(ctx: &TestContext, ip: &str) -> (String, Option<(String, String)>) {
    split_notice(&ctx.post_form_location("/manage/stores/7/dns/ip", &[("ip", ip)]).await)
}

async fn fetch(ctx: &TestContext) -> (String, Option<(String, String)>) {
    split_notice(&ctx.post_form_location("/manage/stores/7/dns/fetch", &[]).await)
}

fn vercel_records() -> Value {
    json!({
        "name": "myshop.com",
        "verified": true,
        "recommendedIPv4": [
            { "rank": 2, "value": ["76.76.21.21"] },
            { "rank": 1, "value": ["76.76.21.241"] }
        ],
        "recommendedCNAME": [
            { "rank": 1, "value": "d1d4fc829fe7bc7c.vercel-dns-017.com." }
        ]
    })
}

// =============================================================================
// Manual IP
// =============================================================================

#[tokio::test]
async fn test_manual_ip_is_saved() {
    let ctx = TestContext::new(vec![store(7, Some("myshop.com"))]).await;

    let (path, shown) = set_ip(&ctx, "76.76.21.21").await;

    assert_eq!(path, SETTINGS);
    assert_eq!(shown, notice("success", "DNS IP updated to 76.76.21.21!"));

    let saved = ctx.stores.snapshot(StoreId::new(7)).unwrap();
    assert_eq!(saved.vercel_dns_ip.as_deref(), Some("76.76.21.21"));
    assert!(saved.last_dns_config_fetch.is_some());
    assert_eq!(saved.vercel_cname, None);
    assert_eq!(ctx.vercel.hits(), 0);
}

#[tokio::test]
async fn test_manual_ip_accepts_out_of_range_octets() {
    let ctx = TestContext::new(vec![store(7, Some("myshop.com"))]).await;

    let (_, shown) = set_ip(&ctx, "300.1.1.1").await;

    assert_eq!(shown, notice("success", "DNS IP updated to 300.1.1.1!"));
    let saved = ctx.stores.snapshot(StoreId::new(7)).unwrap();
    assert_eq!(saved.vercel_dns_ip.as_deref(), Some("300.1.1.1"));
}

#[tokio::test]
async fn test_invalid_ip_is_rejected_without_write() {
    let ctx = TestContext::new(vec![store(7, Some("myshop.com"))]).await;

    for bad in ["not-an-ip", "1.2.3", "1.2.3.4.5", "1.2.3.4 "] {
        let (path, shown) = set_ip(&ctx, bad).await;
        assert_eq!(path, SETTINGS);
        assert_eq!(shown, notice("error", VALIDATION_MESSAGE), "input {bad:?}");
    }

    assert_eq!(ctx.stores.writes(), 0);
    let saved = ctx.stores.snapshot(StoreId::new(7)).unwrap();
    assert_eq!(saved.vercel_dns_ip, None);
}

#[tokio::test]
async fn test_empty_ip_cancels() {
    let ctx = TestContext::new(vec![store(7, Some("myshop.com"))]).await;

    let (path, shown) = set_ip(&ctx, "").await;

    assert_eq!(path, SETTINGS);
    assert_eq!(shown, None);
    assert_eq!(ctx.stores.writes(), 0);
}

#[tokio::test]
async fn test_ip_form_is_prefilled_with_current_value() {
    let mut existing = store(7, Some("myshop.com"));
    existing.vercel_dns_ip = Some("76.76.21.21".to_string());
    let ctx = TestContext::new(vec![existing, store(8, None)]).await;

    let body = ctx
        .client
        .get(ctx.url("/manage/stores/7/dns/ip"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains(r#"value="76.76.21.21""#));

    let body = ctx
        .client
        .get(ctx.url("/manage/stores/8/dns/ip"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains(r#"value="216.198.79.193""#));
}

#[tokio::test]
async fn test_manual_ip_for_unknown_store() {
    let ctx = TestContext::new(vec![store(7, Some("myshop.com"))]).await;

    let location = ctx
        .post_form_location("/manage/stores/99/dns/ip", &[("ip", "76.76.21.21")])
        .await;

    let (path, shown) = split_notice(&location);
    assert_eq!(path, "/manage/stores/99/dns");
    assert_eq!(shown, notice("error", "Store not found."));
}

// =============================================================================
// Fetch From Vercel
// =============================================================================

#[tokio::test]
async fn test_fetch_saves_recommended_records() {
    let ctx = TestContext::new(vec![store(7, Some("myshop.com"))]).await;
    ctx.vercel.respond("myshop.com", vercel_records());

    let (path, shown) = fetch(&ctx).await;

    assert_eq!(path, SETTINGS);
    assert_eq!(shown, notice("success", "DNS configuration updated from Vercel!"));
    assert_eq!(ctx.vercel.hits(), 1);

    let saved = ctx.stores.snapshot(StoreId::new(7)).unwrap();
    assert_eq!(saved.vercel_dns_ip.as_deref(), Some("76.76.21.241"));
    assert_eq!(
        saved.vercel_cname.as_deref(),
        Some("d1d4fc829fe7bc7c.vercel-dns-017.com")
    );
    assert_eq!(saved.vercel_domain_config, Some(vercel_records()));
    assert!(saved.last_dns_config_fetch.is_some());

    let json: Value = ctx
        .client
        .get(ctx.url("/api/stores/7/dns"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(json["dns_ip"], "76.76.21.241");
    assert_eq!(json["cname"], "d1d4fc829fe7bc7c.vercel-dns-017.com");
    assert_eq!(json["domain"], "myshop.com");
}

#[tokio::test]
async fn test_fetch_falls_back_to_current_values() {
    let ctx = TestContext::new(vec![store(7, Some("myshop.com"))]).await;
    ctx.vercel.respond(
        "myshop.com",
        json!({ "aValues": ["198.51.100.4"], "cNames": [] }),
    );

    let (_, shown) = fetch(&ctx).await;

    assert_eq!(shown, notice("success", "DNS configuration updated from Vercel!"));
    let saved = ctx.stores.snapshot(StoreId::new(7)).unwrap();
    assert_eq!(saved.vercel_dns_ip.as_deref(), Some("198.51.100.4"));
    assert_eq!(saved.vercel_cname.as_deref(), Some("cname.vercel-dns.com"));
}

#[tokio::test]
async fn test_fetch_nameservers_only_saves_defaults() {
    let ctx = TestContext::new(vec![store(7, Some("myshop.com"))]).await;
    ctx.vercel.respond(
        "myshop.com",
        json!({ "intendedNameservers": ["ns1.vercel-dns.com", "ns2.vercel-dns.com"] }),
    );

    let (_, shown) = fetch(&ctx).await;

    let (level, message) = shown.unwrap();
    assert_eq!(level, "info");
    assert!(message.contains("ns1.vercel-dns.com, ns2.vercel-dns.com"));

    let saved = ctx.stores.snapshot(StoreId::new(7)).unwrap();
    assert_eq!(saved.vercel_dns_ip.as_deref(), Some("216.198.79.193"));
    assert_eq!(saved.vercel_cname.as_deref(), Some("cname.vercel-dns.com"));

    let page = ctx.client.get(ctx.url(SETTINGS)).send().await.unwrap();
    let body = page.text().await.unwrap();
    assert!(body.contains("ns2.vercel-dns.com"));
}

#[tokio::test]
async fn test_fetch_provider_error_writes_nothing() {
    let ctx = TestContext::new(vec![store(7, Some("myshop.com"))]).await;
    ctx.vercel.respond_with(
        "myshop.com",
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": { "code": "internal_server_error" } }),
    );

    let (_, shown) = fetch(&ctx).await;

    assert_eq!(
        shown,
        notice("error", "Failed to fetch DNS configuration from Vercel.")
    );
    assert_eq!(ctx.vercel.hits(), 1);
    assert_eq!(ctx.stores.writes(), 0);
}

#[tokio::test]
async fn test_fetch_unknown_domain_writes_nothing() {
    let ctx = TestContext::new(vec![store(7, Some("unregistered.com"))]).await;

    let (_, shown) = fetch(&ctx).await;

    assert_eq!(
        shown,
        notice("error", "Failed to fetch DNS configuration from Vercel.")
    );
    assert_eq!(ctx.stores.writes(), 0);
}

#[tokio::test]
async fn test_fetch_without_credentials_sends_nothing() {
    let ctx = TestContext::without_vercel_credentials(vec![store(7, Some("myshop.com"))]).await;
    ctx.vercel.respond("myshop.com", vercel_records());

    let (_, shown) = fetch(&ctx).await;

    assert_eq!(
        shown,
        notice("error", "Vercel configuration not set up properly.")
    );
    assert_eq!(ctx.vercel.hits(), 0);
    assert_eq!(ctx.stores.writes(), 0);
}

#[tokio::test]
async fn test_fetch_without_domain_sends_nothing() {
    let ctx = TestContext::new(vec![store(7, None)]).await;

    let (_, shown) = fetch(&ctx).await;

    assert_eq!(shown, notice("error", "No domain configured for this store."));
    assert_eq!(ctx.vercel.hits(), 0);
    assert_eq!(ctx.stores.writes(), 0);
}

#[tokio::test]
async fn test_fetch_save_failure_reports_error() {
    let ctx = TestContext::new(vec![store(7, Some("myshop.com"))]).await;
    ctx.vercel.respond("myshop.com", vercel_records());
    ctx.stores.fail_writes(true);

    let (_, shown) = fetch(&ctx).await;

    assert_eq!(
        shown,
        notice("error", "Failed to fetch DNS configuration from Vercel.")
    );
    let saved = ctx.stores.snapshot(StoreId::new(7)).unwrap();
    assert_eq!(saved.vercel_dns_ip, None);
}

// =============================================================================
// Settings Page
// =============================================================================

#[tokio::test]
async fn test_settings_page_shows_defaults_and_notice() {
    let ctx = TestContext::new(vec![store(7, Some("myshop.com"))]).await;

    let response = ctx
        .client
        .get(ctx.url("/manage/stores/7/dns?notice=success&message=DNS%20IP%20updated%20to%201.2.3.4%21"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("216.198.79.193"));
    assert!(body.contains("cname.vercel-dns.com"));
    assert!(body.contains("DNS IP updated to 1.2.3.4!"));
    assert!(body.contains("notice-success"));
}

#[tokio::test]
async fn test_settings_page_unknown_store_is_404() {
    let ctx = TestContext::new(Vec::new()).await;

    let response = ctx.client.get(ctx.url("/manage/stores/3/dns")).send().await.unwrap();

    assert_eq!(response.status(), 404);
}
