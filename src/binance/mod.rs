//! Binance USDS-M Futures API integration
//!
//! Request signing, wire types, and the HTTP client.

pub mod auth;
pub mod client;
pub mod types;

pub use auth::Credentials;
pub use client::FuturesClient;
pub use types::{OrderRequest, OrderSide, OrderType};
