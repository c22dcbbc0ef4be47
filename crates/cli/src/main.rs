//! Pocket Cart CLI - Inspect and edit a persisted cart.
//!
//! # Usage
//!
//! ```bash
//! # Show the stored cart as JSON
//! pc-cli show
//!
//! # Show the floating cart summary
//! pc-cli --currency BRL summary
//!
//! # Add a product (quantity starts at one, or bumps an existing entry)
//! pc-cli add --id sku-1 --title "Rivatti chair" --price 400.00
//!
//! # Change quantities
//! pc-cli increment sku-1
//! pc-cli decrement sku-1
//!
//! # Delete the stored record
//! pc-cli clear
//! ```
//!
//! Flags override the `CART_*` environment variables. `--log-json` switches
//! log output to JSON lines.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pocket_cart::CartConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use pocket_cart_core::{CartCommand, CurrencyCode};

mod commands;

use commands::cart;

#[derive(Parser)]
#[command(name = "pc-cli")]
#[command(author, version, about = "Pocket Cart CLI tools")]
struct Cli {
    /// Directory holding the cart record (overrides `CART_STORAGE_DIR`)
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    /// Storage key of the cart record (overrides `CART_STORAGE_KEY`)
    #[arg(long, global = true)]
    key: Option<String>,

    /// Display currency (overrides `CART_CURRENCY`)
    #[arg(long, global = true)]
    currency: Option<CurrencyCode>,

    /// Emit logs as JSON lines instead of text
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the stored cart as JSON
    Show,
    /// Print the item count and formatted total
    Summary,
    /// Add a product to the cart
    Add {
        /// Product ID
        #[arg(long)]
        id: String,

        /// Product title
        #[arg(long)]
        title: String,

        /// Unit price, e.g. 19.99
        #[arg(long)]
        price: String,

        /// Product image URL
        #[arg(long, default_value = "")]
        image_url: String,
    },
    /// Add one unit of a product already in the cart
    Increment {
        /// Product ID
        id: String,
    },
    /// Remove one unit of a product, dropping it at zero
    Decrement {
        /// Product ID
        id: String,
    },
    /// Delete the stored cart
    Clear,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pocket_cart=info,pc_cli=info".into());
    let json_layer = cli
        .log_json
        .then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!cli.log_json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = CartConfig::from_env()?;
    if let Some(dir) = cli.storage_dir {
        config.storage_dir = dir;
    }
    if let Some(key) = cli.key {
        pocket_cart::storage::validate_key(&key)?;
        config.storage_key = key;
    }
    if let Some(currency) = cli.currency {
        config.currency = currency;
    }

    let output = match cli.command {
        Commands::Show => cart::show(&config).await?,
        Commands::Summary => cart::summary(&config).await?,
        Commands::Add {
            id,
            title,
            price,
            image_url,
        } => cart::apply(&config, cart::add_command(&id, &title, &image_url, &price)?).await?,
        Commands::Increment { id } => {
            cart::apply(&config, CartCommand::Increment(cart::product_id(&id)?)).await?
        }
        Commands::Decrement { id } => {
            cart::apply(&config, CartCommand::Decrement(cart::product_id(&id)?)).await?
        }
        Commands::Clear => {
            cart::clear(&config).await?;
            return Ok(());
        }
    };

    #[allow(clippy::print_stdout)]
    {
        println!("{output}");
    }
    Ok(())
}
