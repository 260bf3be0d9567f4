//! Binance futures trading CLI - main entry point
//!
//! Each invocation runs exactly one command: resolve the execution mode
//! and credentials, validate the arguments, make a single call against the
//! venue, print the response.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use futures_bot::binance::types::{open_orders_table, positions_table};
use futures_bot::binance::{Credentials, FuturesClient};
use futures_bot::config::ExecutionMode;
use futures_bot::dispatch::{dispatch, Outcome, TradingCommand};

#[derive(Parser, Debug)]
#[command(name = "futures-bot")]
#[command(about = "Binance USDS-M Futures trading CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (logs raw requests and responses)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Trade against the live venue (CAUTION - REAL MONEY!). Default is testnet.
    #[arg(long, global = true)]
    live: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get the futures account balance
    Balance,

    /// Get the current market price for a symbol
    Price {
        /// Trading pair (e.g., BTCUSDT)
        symbol: String,
    },

    /// Place a MARKET order (executes immediately at the current price)
    Market {
        /// Trading pair (e.g., BTCUSDT)
        symbol: String,
        /// BUY or SELL
        side: String,
        /// Amount to trade
        quantity: String,
    },

    /// Place a LIMIT order (executes at the given price or better)
    Limit {
        /// Trading pair (e.g., BTCUSDT)
        symbol: String,
        /// BUY or SELL
        side: String,
        /// Amount to trade
        quantity: String,
        /// Limit price
        price: String,
    },

    /// Place a STOP-LIMIT order (activates at the stop price, rests at the limit price)
    StopLimit {
        /// Trading pair (e.g., BTCUSDT)
        symbol: String,
        /// BUY or SELL
        side: String,
        /// Amount to trade
        quantity: String,
        /// Trigger stop price
        stop_price: String,
        /// Execution limit price
        price: String,
    },

    /// List open orders, optionally filtered by symbol
    Orders {
        /// Trading pair filter (e.g., BTCUSDT)
        symbol: Option<String>,
    },

    /// Cancel an open order
    Cancel {
        /// Trading pair (e.g., BTCUSDT)
        symbol: String,
        /// Order ID to cancel
        order_id: String,
    },

    /// Show open positions, optionally filtered by symbol
    Positions {
        /// Trading pair filter (e.g., BTCUSDT)
        symbol: Option<String>,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Balance => "balance",
            Commands::Price { .. } => "price",
            Commands::Market { .. } => "market",
            Commands::Limit { .. } => "limit",
            Commands::StopLimit { .. } => "stop-limit",
            Commands::Orders { .. } => "orders",
            Commands::Cancel { .. } => "cancel",
            Commands::Positions { .. } => "positions",
        }
    }
}

impl From<Commands> for TradingCommand {
    fn from(command: Commands) -> Self {
        match command {
            Commands::Balance => TradingCommand::Balance,
            Commands::Price { symbol } => TradingCommand::Price { symbol },
            Commands::Market {
                symbol,
                side,
                quantity,
            } => TradingCommand::Market {
                symbol,
                side,
                quantity,
            },
            Commands::Limit {
                symbol,
                side,
                quantity,
                price,
            } => TradingCommand::Limit {
                symbol,
                side,
                quantity,
                price,
            },
            Commands::StopLimit {
                symbol,
                side,
                quantity,
                stop_price,
                price,
            } => TradingCommand::StopLimit {
                symbol,
                side,
                quantity,
                stop_price,
                price,
            },
            Commands::Orders { symbol } => TradingCommand::Orders { symbol },
            Commands::Cancel { symbol, order_id } => TradingCommand::Cancel { symbol, order_id },
            Commands::Positions { symbol } => TradingCommand::Positions { symbol },
        }
    }
}

fn setup_logging(verbose: bool, command_name: &str) -> Result<()> {
    // Create logs directory
    std::fs::create_dir_all("logs")?;

    // Create log file with naming pattern: {command}_{date}.log
    let log_filename = format!(
        "{}_{}.log",
        command_name,
        chrono::Local::now().format("%Y-%m-%d_%H-%M-%S")
    );
    let log_path = PathBuf::from("logs").join(&log_filename);

    // Set log level - filter out noisy external crates
    let level = if verbose { "debug" } else { "info" };
    let filter_str = format!(
        "{},hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn,h2=warn",
        level
    );
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    // File appender
    let file_appender = tracing_appender::rolling::never("logs", &log_filename);

    // Console layer
    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_ansi(true);

    // File layer - same format but without ANSI colors
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file_appender)
        .with_target(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    info!("Log file: {}", log_path.display());

    Ok(())
}

fn render(outcome: Outcome) {
    match outcome {
        Outcome::Balance(account) => {
            println!("\n{}", account);
        }
        Outcome::Price(ticker) => {
            println!("\n{}", ticker);
        }
        Outcome::OrderPlaced(order) => {
            println!("\nOrder placed successfully");
            println!("{}", order);
        }
        Outcome::OpenOrders(orders) => {
            if orders.is_empty() {
                println!("\nNo open orders found");
            } else {
                println!("\nOpen Orders ({})", orders.len());
                open_orders_table(&orders).printstd();
            }
        }
        Outcome::Cancelled(order) => {
            println!("\nOrder {} canceled successfully", order.order_id);
        }
        Outcome::Positions(positions) => {
            // Flat positions are reported by the venue too; only show open ones
            let active: Vec<_> = positions.into_iter().filter(|p| p.is_open()).collect();
            if active.is_empty() {
                println!("\nNo active positions");
            } else {
                println!("\nActive Positions ({})", active.len());
                positions_table(&active).printstd();
            }
        }
    }
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.command.name())?;

    // Default-safe: testnet unless --live was passed explicitly
    let mode = ExecutionMode::from_live_flag(cli.live);
    info!("Mode: {}", mode);
    if mode.is_live() {
        warn!("Trading against REAL Binance Futures - USE WITH CAUTION");
    }

    // Credentials are resolved before the client exists; a missing key
    // fails here, before any network call
    let credentials = Credentials::from_env()?;
    let client = FuturesClient::new(credentials, mode);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;

    let outcome = runtime.block_on(dispatch(cli.command.into(), &client))?;
    render(outcome);

    Ok(())
}
