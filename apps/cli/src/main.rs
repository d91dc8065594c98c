//! Farmstand CLI.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (two steps)
//! farmstand login --phone +254700000001 --password '...'
//! farmstand verify --session pend-123 --code 482913
//!
//! # Shop
//! farmstand products --search tomatoes
//! farmstand cart add prod-42 --qty 3
//! farmstand checkout --address "Plot 12, Kiambu Road" --payment upi
//! ```
//!
//! Logging goes to stderr; set `RUST_LOG` to change the filter.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use farmstand_client::{AppContext, ClientConfig, ClientError};

mod commands;

#[derive(Parser)]
#[command(name = "farmstand")]
#[command(author, version, about = "Farmstand marketplace client")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, env = "FARMSTAND_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Password step of login; prints the pending session id
    Login {
        #[arg(short, long)]
        phone: String,

        #[arg(short = 'w', long, env = "FARMSTAND_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// One-time-code step of login
    Verify {
        /// Pending session id printed by `login`
        #[arg(short, long)]
        session: String,

        #[arg(short, long)]
        code: String,
    },
    /// Clear the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Browse the catalog
    Products {
        #[arg(short, long)]
        search: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
    /// List categories
    Categories,
    /// Manage the local cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place an order for everything in the cart
    Checkout {
        #[arg(short, long)]
        address: String,

        /// cod, card, upi, netbanking or wallet
        #[arg(short, long, default_value = "cod")]
        payment: String,

        #[arg(short, long)]
        notes: Option<String>,
    },
    /// List your orders
    Orders,
    /// Cancel a pending or confirmed order
    Cancel { order_id: String },
    /// Personalized recommendations
    Recommend {
        #[arg(short = 'k', long)]
        top_k: Option<u32>,
    },
    /// Retry queued analytics events
    FlushEvents,
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a product by id
    Add {
        product_id: String,

        #[arg(short, long, default_value_t = 1)]
        qty: u32,
    },
    /// Remove a cart line
    Remove { line_id: String },
    /// Set a line's quantity (0 or less removes it)
    Set {
        line_id: String,
        #[arg(allow_negative_numbers = true)]
        qty: i64,
    },
    /// Show the cart
    List,
    /// Empty the cart
    Clear,
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        match e.downcast_ref::<ClientError>() {
            Some(client_err) => {
                tracing::debug!(error = %client_err, "Command failed");
                eprintln!("error: {}", client_err.user_message());
            }
            None => eprintln!("error: {e:#}"),
        }
        std::process::exit(1);
    }
}

/// Installs the stderr subscriber.
///
/// Default filter `info,farmstand=debug,sqlx=warn`; `RUST_LOG` overrides it.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,farmstand=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ClientConfig::load(cli.config)?;
    let ctx = AppContext::open(config).await?;

    let result = dispatch(&ctx, cli.command).await;
    ctx.close().await;
    result
}

async fn dispatch(ctx: &AppContext, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Login { phone, password } => commands::auth::login(ctx, &phone, &password).await?,
        Commands::Verify { session, code } => commands::auth::verify(ctx, &session, &code).await?,
        Commands::Logout => commands::auth::logout(ctx).await,
        Commands::Whoami => commands::auth::whoami(ctx).await?,
        Commands::Products {
            search,
            category,
            page,
            limit,
        } => commands::shop::products(ctx, search, category, page, limit).await?,
        Commands::Categories => commands::shop::categories(ctx).await?,
        Commands::Cart { action } => match action {
            CartAction::Add { product_id, qty } => commands::cart::add(ctx, &product_id, qty).await?,
            CartAction::Remove { line_id } => commands::cart::remove(ctx, &line_id).await?,
            CartAction::Set { line_id, qty } => commands::cart::set(ctx, &line_id, qty).await?,
            CartAction::List => commands::cart::list(ctx).await,
            CartAction::Clear => commands::cart::clear(ctx).await,
        },
        Commands::Checkout {
            address,
            payment,
            notes,
        } => commands::shop::checkout(ctx, address, &payment, notes).await?,
        Commands::Orders => commands::shop::orders(ctx).await?,
        Commands::Cancel { order_id } => commands::shop::cancel(ctx, &order_id).await?,
        Commands::Recommend { top_k } => commands::shop::recommend(ctx, top_k).await?,
        Commands::FlushEvents => commands::shop::flush_events(ctx).await,
    }
    Ok(())
}
