//! Binance USDS-M Futures API client
//!
//! One HTTP call per operation, no local retry: a failed request is
//! classified and surfaced, and any retry policy is the venue's own
//! business. The client is bound at construction to a single execution
//! mode (testnet or live) and credential set.
//!
//! # Example
//!
//! ```no_run
//! use futures_bot::binance::{Credentials, FuturesClient};
//! use futures_bot::config::ExecutionMode;
//! use futures_bot::dispatch::TradingApi;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let credentials = Credentials::from_env()?;
//!     let client = FuturesClient::new(credentials, ExecutionMode::Testnet);
//!
//!     let ticker = client.price("BTCUSDT").await?;
//!     println!("BTCUSDT price: {}", ticker.price);
//!
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::auth::Credentials;
use super::types::{
    AccountSummary, ApiErrorBody, OrderRequest, OrderResponse, PositionInfo, PriceTicker,
};
use crate::config::ExecutionMode;
use crate::dispatch::TradingApi;
use crate::error::{TradeError, TradeResult};

/// Request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// recvWindow sent with signed requests (ms)
const RECV_WINDOW_MS: u64 = 5000;

/// Binance Futures API client
#[derive(Debug, Clone)]
pub struct FuturesClient {
    credentials: Credentials,
    http_client: Client,
    base_url: String,
}

impl FuturesClient {
    /// Create a client bound to the given execution mode's endpoint
    pub fn new(credentials: Credentials, mode: ExecutionMode) -> Self {
        Self::with_base_url(credentials, mode.base_url())
    }

    /// Create a client against an explicit base URL
    ///
    /// Used by tests to point the client at a local mock server.
    pub fn with_base_url(credentials: Credentials, base_url: impl Into<String>) -> Self {
        let http_client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            credentials,
            http_client,
            base_url: base_url.into(),
        }
    }

    /// The base URL this client targets
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the signed query string: parameters plus `recvWindow`,
    /// `timestamp`, and the trailing `signature`.
    fn signed_query(&self, params: &[(&str, String)]) -> String {
        let mut parts: Vec<String> = params.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        parts.push(format!("recvWindow={}", RECV_WINDOW_MS));
        parts.push(format!("timestamp={}", Utc::now().timestamp_millis()));

        let query = parts.join("&");
        let signature = self.credentials.sign(&query);
        format!("{}&signature={}", query, signature)
    }

    /// Make a request against a signed endpoint
    async fn signed_request<R>(
        &self,
        method: Method,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> TradeResult<R>
    where
        R: DeserializeOwned,
    {
        let query = self.signed_query(params);
        let url = format!("{}{}?{}", self.base_url, endpoint, query);

        debug!("request: {} {} params={:?}", method, endpoint, params);

        let response = self
            .http_client
            .request(method, &url)
            .header("X-MBX-APIKEY", self.credentials.api_key())
            .send()
            .await?;

        self.decode(response).await
    }

    /// Make a request against a public (unsigned) endpoint
    async fn public_get<R>(&self, endpoint: &str, params: &[(&str, String)]) -> TradeResult<R>
    where
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, endpoint);

        debug!("request: GET {} params={:?}", endpoint, params);

        let response = self.http_client.get(&url).query(params).send().await?;

        self.decode(response).await
    }

    /// Classify and decode a response
    ///
    /// Non-success statuses with a parseable venue error body become
    /// `Remote` errors carrying the venue's code and message verbatim.
    async fn decode<R>(&self, response: Response) -> TradeResult<R>
    where
        R: DeserializeOwned,
    {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| TradeError::Network(e.to_string()))?;

        debug!("response: status={} body={}", status, text);

        if !status.is_success() {
            if let Ok(body) = serde_json::from_str::<ApiErrorBody>(&text) {
                return Err(TradeError::Remote {
                    code: Some(body.code),
                    message: body.msg,
                });
            }
            return Err(TradeError::Remote {
                code: None,
                message: format!("HTTP {}: {}", status, text),
            });
        }

        serde_json::from_str(&text).map_err(|e| TradeError::Parse(format!("{}: {}", e, text)))
    }
}

#[async_trait]
impl TradingApi for FuturesClient {
    /// Get the futures account balance summary
    async fn account(&self) -> TradeResult<AccountSummary> {
        self.signed_request(Method::GET, "/fapi/v2/account", &[])
            .await
    }

    /// Get the current price for a symbol
    async fn price(&self, symbol: &str) -> TradeResult<PriceTicker> {
        self.public_get(
            "/fapi/v1/ticker/price",
            &[("symbol", symbol.to_string())],
        )
        .await
    }

    /// Place a new order
    async fn place_order(&self, order: &OrderRequest) -> TradeResult<OrderResponse> {
        self.signed_request(Method::POST, "/fapi/v1/order", &order.to_query_params())
            .await
    }

    /// Get open orders, optionally filtered by symbol
    async fn open_orders(&self, symbol: Option<&str>) -> TradeResult<Vec<OrderResponse>> {
        let mut params = Vec::new();
        if let Some(symbol) = symbol {
            params.push(("symbol", symbol.to_string()));
        }
        self.signed_request(Method::GET, "/fapi/v1/openOrders", &params)
            .await
    }

    /// Cancel an open order
    async fn cancel_order(&self, symbol: &str, order_id: i64) -> TradeResult<OrderResponse> {
        self.signed_request(
            Method::DELETE,
            "/fapi/v1/order",
            &[
                ("symbol", symbol.to_string()),
                ("orderId", order_id.to_string()),
            ],
        )
        .await
    }

    /// Get position information, optionally filtered by symbol
    async fn positions(&self, symbol: Option<&str>) -> TradeResult<Vec<PositionInfo>> {
        let mut params = Vec::new();
        if let Some(symbol) = symbol {
            params.push(("symbol", symbol.to_string()));
        }
        self.signed_request(Method::GET, "/fapi/v2/positionRisk", &params)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binance::auth::verify_signature;

    fn test_client() -> FuturesClient {
        FuturesClient::new(
            Credentials::new("test_key", "test_secret"),
            ExecutionMode::Testnet,
        )
    }

    #[test]
    fn test_mode_selects_base_url() {
        let testnet = test_client();
        assert_eq!(testnet.base_url(), "https://testnet.binancefuture.com");

        let live = FuturesClient::new(
            Credentials::new("test_key", "test_secret"),
            ExecutionMode::Live,
        );
        assert_eq!(live.base_url(), "https://fapi.binance.com");
    }

    #[test]
    fn test_with_base_url_override() {
        let client =
            FuturesClient::with_base_url(Credentials::new("k", "s"), "http://127.0.0.1:9999");
        assert_eq!(client.base_url(), "http://127.0.0.1:9999");
    }

    #[test]
    fn test_signed_query_shape() {
        let client = test_client();
        let query = client.signed_query(&[("symbol", "BTCUSDT".to_string())]);

        assert!(query.starts_with("symbol=BTCUSDT&recvWindow=5000&timestamp="));

        // The trailing signature must verify against the preceding query
        let (payload, signature) = query
            .rsplit_once("&signature=")
            .expect("signature parameter present");
        assert!(verify_signature(payload, "test_secret", signature));
    }

    #[test]
    fn test_signed_query_without_params() {
        let client = test_client();
        let query = client.signed_query(&[]);

        assert!(query.starts_with("recvWindow=5000&timestamp="));
        assert!(query.contains("&signature="));
    }
}
