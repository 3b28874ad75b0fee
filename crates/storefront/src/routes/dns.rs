//! Owner DNS settings route handlers.
//!
//! Actions redirect back to the settings page carrying their notice in the
//! query string (`?notice=<level>&message=<text>`), so a reload never
//! repeats a write.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::{Path, Query, State},
    response::Redirect,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use shopforge_core::{Notice, NoticeLevel, Store, StoreId};

use crate::error::Result;
use crate::routes::load_store;
use crate::services::{DnsSyncError, DnsUpdate};
use crate::services::dns::MissingConfig;
use crate::state::AppState;
use crate::vercel::ProviderDnsConfig;

/// Notice carried back to the settings page.
#[derive(Debug, Default, Deserialize)]
pub struct NoticeQuery {
    pub notice: Option<NoticeLevel>,
    pub message: Option<String>,
}

impl NoticeQuery {
    fn into_notice(self) -> Option<Notice> {
        match (self.notice, self.message) {
            (Some(level), Some(message)) if !message.is_empty() => Some(Notice { level, message }),
            _ => None,
        }
    }
}

/// Manual IP form data.
#[derive(Debug, Deserialize)]
pub struct DnsIpForm {
    #[serde(default)]
    pub ip: String,
}

/// DNS settings page template.
#[derive(Template, WebTemplate)]
#[template(path = "dns.html")]
pub struct DnsSettingsTemplate {
    pub store_id: StoreId,
    pub name: String,
    pub domain: Option<String>,
    pub dns_ip: String,
    pub cname: String,
    pub last_fetch: Option<String>,
    pub nameservers: Vec<String>,
    pub notice: Option<Notice>,
}

impl DnsSettingsTemplate {
    fn new(store: &Store, notice: Option<Notice>) -> Self {
        let nameservers = match store
            .vercel_domain_config
            .as_ref()
            .map(ProviderDnsConfig::from_response)
        {
            Some(ProviderDnsConfig::Nameservers(list)) => list,
            _ => Vec::new(),
        };

        Self {
            store_id: store.id,
            name: store.name.clone(),
            domain: store.custom_domain().map(String::from),
            dns_ip: store.dns_ip().to_string(),
            cname: store.cname().to_string(),
            last_fetch: store.last_dns_config_fetch.map(format_timestamp),
            nameservers,
            notice,
        }
    }
}

/// Manual IP form template, pre-filled with the current value.
#[derive(Template, WebTemplate)]
#[template(path = "dns_ip_form.html")]
pub struct DnsIpFormTemplate {
    pub store_id: StoreId,
    pub name: String,
    pub current: String,
}

/// DNS targets as JSON.
#[derive(Debug, Serialize, Deserialize)]
pub struct DnsConfigView {
    pub store_id: StoreId,
    pub domain: Option<String>,
    pub dns_ip: String,
    pub cname: String,
    pub last_dns_config_fetch: Option<DateTime<Utc>>,
}

impl From<&Store> for DnsConfigView {
    fn from(store: &Store) -> Self {
        Self {
            store_id: store.id,
            domain: store.custom_domain().map(String::from),
            dns_ip: store.dns_ip().to_string(),
            cname: store.cname().to_string(),
            last_dns_config_fetch: store.last_dns_config_fetch,
        }
    }
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}

fn settings_url(store_id: StoreId) -> String {
    format!("/manage/stores/{store_id}/dns")
}

fn redirect_with_notice(store_id: StoreId, notice: &Notice) -> Redirect {
    Redirect::to(&format!(
        "{}?notice={}&message={}",
        settings_url(store_id),
        notice.level,
        urlencoding::encode(&notice.message)
    ))
}

/// Log a failed DNS action at a level matching who has to act on it.
fn report(store_id: StoreId, err: &DnsSyncError) -> Notice {
    match err {
        DnsSyncError::Validation(_) | DnsSyncError::StoreNotFound(_) => {
            tracing::info!(store_id = %store_id, error = %err, "DNS action rejected");
        }
        DnsSyncError::Configuration(MissingConfig::Domain) => {
            tracing::info!(store_id = %store_id, "DNS fetch requested for store without domain");
        }
        DnsSyncError::Configuration(MissingConfig::Provider(_)) => {
            tracing::warn!(store_id = %store_id, error = %err, "Vercel is not configured");
        }
        DnsSyncError::Provider(_) | DnsSyncError::Persistence { .. } => {
            let event_id = sentry::capture_error(err);
            tracing::error!(
                store_id = %store_id,
                error = %err,
                sentry_event_id = %event_id,
                "DNS action failed"
            );
        }
    }
    err.notice()
}

fn outcome_notice(store_id: StoreId, result: std::result::Result<DnsUpdate, DnsSyncError>) -> Notice {
    match result {
        Ok(update) => update.notice,
        Err(e) => report(store_id, &e),
    }
}

/// Display the DNS settings page.
#[instrument(skip(state, query))]
pub async fn show(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
    Query(query): Query<NoticeQuery>,
) -> Result<DnsSettingsTemplate> {
    let store = load_store(&state, store_id).await?;
    Ok(DnsSettingsTemplate::new(&store, query.into_notice()))
}

/// Display the manual IP form.
#[instrument(skip(state))]
pub async fn ip_form(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
) -> Result<DnsIpFormTemplate> {
    let store = load_store(&state, store_id).await?;
    Ok(DnsIpFormTemplate {
        store_id,
        current: store.dns_ip().to_string(),
        name: store.name,
    })
}

/// Save a manually entered IP.
///
/// An empty answer is treated like cancelling the form.
#[instrument(skip(state, form))]
pub async fn update_ip(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
    Form(form): Form<DnsIpForm>,
) -> Redirect {
    if form.ip.is_empty() {
        return Redirect::to(&settings_url(store_id));
    }
    let notice = outcome_notice(store_id, state.dns().update_dns_ip(store_id, &form.ip).await);
    redirect_with_notice(store_id, &notice)
}

/// Pull DNS targets from Vercel.
#[instrument(skip(state))]
pub async fn fetch(State(state): State<AppState>, Path(store_id): Path<StoreId>) -> Redirect {
    let notice = outcome_notice(
        store_id,
        state.dns().fetch_provider_dns_config_by_id(store_id).await,
    );
    redirect_with_notice(store_id, &notice)
}

/// DNS targets as JSON.
#[instrument(skip(state))]
pub async fn api_show(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
) -> Result<Json<DnsConfigView>> {
    let store = load_store(&state, store_id).await?;
    Ok(Json(DnsConfigView::from(&store)))
}
