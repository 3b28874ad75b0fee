//! Shopforge CLI - Database migrations, store seeding, and DNS sync.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! shopforge migrate
//!
//! # Create a store with a custom domain
//! shopforge store create --name "My Shop" --domain myshop.com
//!
//! # See where a hostname lands
//! shopforge resolve myshop.com
//!
//! # DNS targets for a store
//! shopforge dns show --store 7
//! shopforge dns set-ip --store 7 --ip 76.76.21.21
//! shopforge dns set-ip --store 7          # prompts, pre-filled with the current IP
//! shopforge dns fetch --store 7           # pull from Vercel
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use shopforge_core::StoreId;

mod commands;
mod error;

use error::CliError;

#[derive(Parser)]
#[command(name = "shopforge")]
#[command(author, version, about = "Shopforge CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate,
    /// Manage stores
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },
    /// Show which route a hostname resolves to
    Resolve {
        /// Hostname as a browser would send it (port allowed)
        host: String,
    },
    /// Manage store DNS targets
    Dns {
        #[command(subcommand)]
        action: DnsAction,
    },
}

#[derive(Subcommand)]
enum StoreAction {
    /// Create a new store
    Create {
        /// Store display name
        #[arg(short, long)]
        name: String,

        /// Custom domain
        #[arg(short, long)]
        domain: Option<String>,
    },
}

#[derive(Subcommand)]
enum DnsAction {
    /// Show the store's DNS targets
    Show {
        #[arg(short, long)]
        store: StoreId,
    },
    /// Set the store's DNS IP (prompts when --ip is omitted)
    SetIp {
        #[arg(short, long)]
        store: StoreId,

        #[arg(long)]
        ip: Option<String>,
    },
    /// Fetch the store's DNS targets from Vercel
    Fetch {
        #[arg(short, long)]
        store: StoreId,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::storefront().await?,
        Commands::Store { action } => match action {
            StoreAction::Create { name, domain } => {
                commands::store::create(&name, domain.as_deref()).await?;
            }
        },
        Commands::Resolve { host } => commands::resolve::resolve(&host).await?,
        Commands::Dns { action } => match action {
            DnsAction::Show { store } => commands::dns::show(store).await?,
            DnsAction::SetIp { store, ip } => commands::dns::set_ip(store, ip.as_deref()).await?,
            DnsAction::Fetch { store } => commands::dns::fetch(store).await?,
        },
    }
    Ok(())
}
