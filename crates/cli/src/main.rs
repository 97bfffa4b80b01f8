//! Metalworks CLI - catalog browsing and local cart management.
//!
//! # Usage
//!
//! ```bash
//! # List products, optionally by category
//! mw-cli catalog list --category gates
//!
//! # Add two of a product to the local cart
//! mw-cli cart add gate-scroll-garden -q 2
//!
//! # Replace the cart with one product and head to checkout
//! mw-cli cart buy-now fire-pit-hex
//! ```
//!
//! # Commands
//!
//! - `catalog list|categories` - Browse the product catalog
//! - `cart show|add|update|remove|clear|buy-now` - Manage the local cart

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use metalworks_core::CurrencyCode;

mod commands;

use commands::Context;
use commands::cart::CartCommand;

#[derive(Parser)]
#[command(name = "mw-cli")]
#[command(author, version, about = "Metalworks CLI tools")]
struct Cli {
    /// Product catalog JSON file
    #[arg(
        long,
        global = true,
        env = "STOREFRONT_CATALOG_PATH",
        default_value = "crates/storefront/catalog/products.json"
    )]
    catalog: PathBuf,

    /// Directory holding persisted carts
    #[arg(long, global = true, env = "STOREFRONT_DATA_DIR", default_value = "data/carts")]
    data_dir: PathBuf,

    /// Currency used when the catalog does not name one
    #[arg(long, global = true, env = "STOREFRONT_CURRENCY", default_value = "USD")]
    currency: CurrencyCode,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Manage the local cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products
    List {
        /// Only show products in this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List distinct categories
    Categories,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and subtotal
    Show,
    /// Add a product, accumulating quantity
    Add {
        product_id: String,
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Set a line's quantity (zero or less removes it)
    Update {
        product_id: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a product
    Remove { product_id: String },
    /// Empty the cart
    Clear,
    /// Replace the cart with a single product
    BuyNow {
        product_id: String,
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        quantity: i64,
    },
}

impl From<CartAction> for CartCommand {
    fn from(action: CartAction) -> Self {
        match action {
            CartAction::Show => Self::Show,
            CartAction::Add {
                product_id,
                quantity,
            } => Self::Add {
                product_id,
                quantity,
            },
            CartAction::Update {
                product_id,
                quantity,
            } => Self::Update {
                product_id,
                quantity,
            },
            CartAction::Remove { product_id } => Self::Remove { product_id },
            CartAction::Clear => Self::Clear,
            CartAction::BuyNow {
                product_id,
                quantity,
            } => Self::BuyNow {
                product_id,
                quantity,
            },
        }
    }
}

#[allow(clippy::print_stdout)]
fn main() {
    dotenvy::dotenv().ok();

    // Logs go to stderr so command output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(output) => print!("{output}"),
        Err(e) => {
            tracing::error!("Command failed: {e}");
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<String, commands::CommandError> {
    let context = Context::open(&cli.catalog, &cli.data_dir, cli.currency)?;

    let output = match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List { category } => {
                commands::catalog::list(&context.catalog, category.as_deref())
            }
            CatalogAction::Categories => commands::catalog::categories(&context.catalog),
        },
        Commands::Cart { action } => commands::cart::run(&context, action.into())?,
    };
    Ok(output)
}
