//! Binance USDS-M Futures trading CLI
//!
//! A thin, safe command dispatcher for issuing trading actions against the
//! Binance futures venue: balance and price lookups, market/limit/stop-limit
//! order placement, open-order and position listing, and order cancellation.
//! Defaults to the testnet; live trading is explicit opt-in.

pub mod binance;
pub mod config;
pub mod dispatch;
pub mod error;

pub use config::ExecutionMode;
pub use dispatch::{dispatch, Outcome, TradingApi, TradingCommand};
pub use error::{TradeError, TradeResult};
