//! Store DNS commands.
//!
//! # Usage
//!
//! ```bash
//! shopforge dns show --store 7
//! shopforge dns set-ip --store 7 --ip 76.76.21.21
//! shopforge dns set-ip --store 7
//! shopforge dns fetch --store 7
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `VERCEL_API_TOKEN`, `VERCEL_PROJECT_ID` - needed by `fetch`
//! - `VERCEL_API_BASE_URL`, `VERCEL_TIMEOUT_SECS` - optional

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;

use shopforge_core::{Notice, Store, StoreId};
use shopforge_storefront::config::VercelConfig;
use shopforge_storefront::db::StoreRepository;
use shopforge_storefront::services::{DnsIpPrompt, DnsSyncError, DnsSyncService, DnsUpdate};
use shopforge_storefront::vercel::VercelClient;

use crate::error::CliError;

/// Prompt on a line-oriented terminal.
///
/// Shows the current value in brackets. Pressing enter keeps it; end of
/// input cancels.
pub struct LinePrompt<R, W> {
    input: Mutex<R>,
    output: Mutex<W>,
}

impl<R, W> LinePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: Mutex::new(input),
            output: Mutex::new(output),
        }
    }
}

/// Prompt on the process's stdin and stdout.
pub fn stdio_prompt() -> LinePrompt<BufReader<tokio::io::Stdin>, tokio::io::Stdout> {
    LinePrompt::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
}

#[async_trait]
impl<R, W> DnsIpPrompt for LinePrompt<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn ask(&self, current: &str) -> Option<String> {
        {
            let mut output = self.output.lock().await;
            let question = format!("Enter the Vercel DNS IP address [{current}]: ");
            if let Err(e) = output.write_all(question.as_bytes()).await {
                tracing::warn!("Failed to write prompt: {e}");
            }
            if let Err(e) = output.flush().await {
                tracing::warn!("Failed to flush prompt: {e}");
            }
        }

        let mut line = String::new();
        match self.input.lock().await.read_line(&mut line).await {
            Ok(0) => None,
            Ok(_) => {
                let answer = line.trim();
                let answer = if answer.is_empty() { current } else { answer };
                Some(answer.to_owned())
            }
            Err(e) => {
                tracing::warn!("Failed to read answer: {e}");
                None
            }
        }
    }
}

#[allow(clippy::print_stdout)]
fn print_notice(notice: &Notice) {
    println!("{notice}");
}

#[allow(clippy::print_stdout)]
fn print_store(store: &Store) {
    println!("Store {} ({})", store.id, store.name);
    println!("  Domain:     {}", store.custom_domain().unwrap_or("(none)"));
    println!("  A record:   {}", store.dns_ip());
    println!("  CNAME:      {}", store.cname());
    match store.last_dns_config_fetch {
        Some(at) => println!("  Last sync:  {}", at.format("%Y-%m-%d %H:%M UTC")),
        None => println!("  Last sync:  never"),
    }
}

/// Print the outcome of a DNS action and turn failures into `CliError`.
fn report(result: Result<DnsUpdate, DnsSyncError>) -> Result<(), CliError> {
    match result {
        Ok(update) => {
            print_notice(&update.notice);
            if let Some(store) = &update.store {
                print_store(store);
            }
            Ok(())
        }
        Err(e) => {
            print_notice(&e.notice());
            Err(e.into())
        }
    }
}

/// Show a store's DNS targets.
pub async fn show(store_id: StoreId) -> Result<(), CliError> {
    let stores = super::connect().await?;
    let store = stores
        .get_by_id(store_id)
        .await?
        .ok_or(CliError::StoreNotFound(store_id))?;

    print_store(&store);
    if let Some(raw) = &store.vercel_domain_config {
        #[allow(clippy::print_stdout)]
        {
            println!("  Vercel response:");
            println!("{}", serde_json::to_string_pretty(raw).unwrap_or_default());
        }
    }
    Ok(())
}

/// Set a store's DNS IP, prompting when `ip` is `None`.
pub async fn set_ip(store_id: StoreId, ip: Option<&str>) -> Result<(), CliError> {
    let stores = super::connect().await?;
    let provider = VercelClient::new(&VercelConfig::default())?;
    let service = DnsSyncService::new(&stores, &provider);

    match ip {
        Some(ip) => report(service.update_dns_ip(store_id, ip).await),
        None => match service.request_manual_dns_ip(store_id, &stdio_prompt()).await {
            Ok(Some(update)) => report(Ok(update)),
            Ok(None) => {
                tracing::info!("No change");
                Ok(())
            }
            Err(e) => report(Err(e)),
        },
    }
}

/// Fetch a store's DNS targets from Vercel.
pub async fn fetch(store_id: StoreId) -> Result<(), CliError> {
    let stores = super::connect().await?;
    let provider = VercelClient::new(&VercelConfig::from_env()?)?;
    let service = DnsSyncService::new(&stores, &provider);

    report(service.fetch_provider_dns_config_by_id(store_id).await)
}
