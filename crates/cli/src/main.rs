//! TrendHora CLI - Inspect and edit persisted storefront state.
//!
//! # Usage
//!
//! ```bash
//! # Show the wishlist
//! trendhora wishlist list
//!
//! # Toggle an item on the wishlist
//! trendhora wishlist toggle --id 64f1c0 --name "Linen Shirt" --price 19.99 --size M
//!
//! # Record a product view, then move it to the wishlist
//! trendhora recent view --id 64f1c0 --name "Linen Shirt" --price 19.99 --category men
//! trendhora recent wishlist 64f1c0
//!
//! # Build a WhatsApp order link from a cart file
//! trendhora checkout --cart cart.json --name "Asha" --phone 9876543210
//! ```
//!
//! # Commands
//!
//! - `wishlist` - List, add, remove and toggle wishlist entries
//! - `recent` - List and record recently viewed products
//! - `checkout` - Compose the WhatsApp checkout link for a cart

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trendhora_storefront::StorefrontSession;
use trendhora_storefront::config::StorefrontConfig;
use trendhora_storefront::storage::SharedStorage;

mod commands;

use commands::{CommandError, ItemArgs};

#[derive(Parser)]
#[command(name = "trendhora")]
#[command(author, version, about = "TrendHora storefront state tools")]
struct Cli {
    /// Storage directory (overrides `TRENDHORA_STORAGE_DIR`)
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the persisted wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Manage recently viewed products
    Recent {
        #[command(subcommand)]
        action: RecentAction,
    },
    /// Compose a WhatsApp checkout link for a cart file
    Checkout {
        /// JSON file holding an array of cart lines
        #[arg(long)]
        cart: PathBuf,

        /// Customer name
        #[arg(short, long)]
        name: String,

        /// Customer phone number
        #[arg(short, long)]
        phone: String,

        /// Customer email (optional)
        #[arg(short, long, default_value = "")]
        email: String,

        /// Delivery address (optional)
        #[arg(short, long, default_value = "")]
        address: String,
    },
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Print the wishlist as JSON
    List,
    /// Add an item
    Add(ItemArgs),
    /// Remove an item by ID
    Remove {
        /// Item ID
        id: String,
    },
    /// Add the item if absent, remove it if present
    Toggle(ItemArgs),
}

#[derive(Subcommand)]
enum RecentAction {
    /// Print recently viewed products as JSON
    List,
    /// Record a product view
    View(ItemArgs),
    /// Copy a recently viewed product to the wishlist
    Wishlist {
        /// Item ID
        id: String,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt::init();
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(2);
        }
    };
    if let Some(dir) = cli.storage_dir.clone() {
        config.storage_dir = dir;
    }

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "trendhora_storefront=info,trendhora_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli.command, &config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: &StorefrontConfig) -> Result<(), CommandError> {
    let storage = SharedStorage::on_disk(&config.storage_dir)?;
    tracing::debug!(dir = %config.storage_dir.display(), "Opened storage");
    let mut session = StorefrontSession::open(config, storage.open_tab());

    match command {
        Commands::Wishlist { action } => match action {
            WishlistAction::List => commands::wishlist::list(&session)?,
            WishlistAction::Add(item) => commands::wishlist::add(&mut session, item)?,
            WishlistAction::Remove { id } => commands::wishlist::remove(&mut session, &id)?,
            WishlistAction::Toggle(item) => commands::wishlist::toggle(&mut session, item)?,
        },
        Commands::Recent { action } => match action {
            RecentAction::List => commands::recent::list(&session)?,
            RecentAction::View(item) => commands::recent::view(&session, item)?,
            RecentAction::Wishlist { id } => commands::recent::to_wishlist(&mut session, &id)?,
        },
        Commands::Checkout {
            cart,
            name,
            phone,
            email,
            address,
        } => {
            let customer = commands::checkout::CustomerArgs {
                name,
                phone,
                email,
                address,
            };
            commands::checkout::run(&mut session, &cart, &customer).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_toggle_with_sizes() {
        let cli = Cli::try_parse_from([
            "trendhora", "wishlist", "toggle", "--id", "A", "--name", "Shirt", "--price", "10",
            "--size", "S", "--size", "M",
        ])
        .unwrap_or_else(|e| panic!("{e}"));

        let Commands::Wishlist {
            action: WishlistAction::Toggle(item),
        } = cli.command
        else {
            panic!("expected wishlist toggle");
        };
        assert_eq!(item.size, vec!["S".to_string(), "M".to_string()]);
    }
}
