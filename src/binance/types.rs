//! Types and models for the Binance USDS-M Futures API
//!
//! Request types are constructed fresh per invocation and serialized into
//! the signed query string. Response types are read-only projections of
//! what the venue returns; the venue sends most numeric fields as strings,
//! so they are kept as strings with `_f64` accessors for display.

use prettytable::{format, Cell, Row, Table};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order side (buy or sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "BUY",
            OrderSide::Sell => "SELL",
        }
    }
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Order type
///
/// A stop-limit order is expressed as type `STOP` on the futures API:
/// the order activates at `stopPrice` and rests at `price`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    #[serde(rename = "MARKET")]
    Market,
    #[serde(rename = "LIMIT")]
    Limit,
    #[serde(rename = "STOP")]
    StopLimit,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
            OrderType::StopLimit => "STOP",
        }
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Request to create a new order
///
/// Quantities and prices use decimal arithmetic end to end; the venue
/// receives them as exact strings in the query, never via float formatting.
#[derive(Debug, Clone, Serialize)]
pub struct OrderRequest {
    /// Trading pair (e.g., "BTCUSDT")
    pub symbol: String,
    pub side: OrderSide,
    pub order_type: OrderType,
    #[serde(with = "rust_decimal::serde::str")]
    pub quantity: Decimal,
    /// Limit price (required for LIMIT and STOP orders)
    #[serde(with = "rust_decimal::serde::str_option")]
    pub price: Option<Decimal>,
    /// Trigger price (required for STOP orders)
    #[serde(with = "rust_decimal::serde::str_option")]
    pub stop_price: Option<Decimal>,
}

impl OrderRequest {
    /// Create a new market order request
    pub fn market(symbol: impl Into<String>, side: OrderSide, quantity: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type: OrderType::Market,
            quantity,
            price: None,
            stop_price: None,
        }
    }

    /// Create a new limit order request
    pub fn limit(
        symbol: impl Into<String>,
        side: OrderSide,
        quantity: Decimal,
        price: Decimal,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type: OrderType::Limit,
            quantity,
            price: Some(price),
            stop_price: None,
        }
    }

    /// Create a new stop-limit order request
    ///
    /// Activates at `stop_price` and rests as a limit order at `price`.
    pub fn stop_limit(
        symbol: impl Into<String>,
        side: OrderSide,
        quantity: Decimal,
        stop_price: Decimal,
        price: Decimal,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type: OrderType::StopLimit,
            quantity,
            price: Some(price),
            stop_price: Some(stop_price),
        }
    }

    /// Serialize into query parameters for the signed order endpoint
    ///
    /// LIMIT and STOP orders carry `timeInForce=GTC`.
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("symbol", self.symbol.clone()),
            ("side", self.side.as_str().to_string()),
            ("type", self.order_type.as_str().to_string()),
            ("quantity", self.quantity.to_string()),
        ];

        if let Some(price) = self.price {
            params.push(("price", price.to_string()));
        }
        if let Some(stop_price) = self.stop_price {
            params.push(("stopPrice", stop_price.to_string()));
        }
        if self.order_type != OrderType::Market {
            params.push(("timeInForce", "GTC".to_string()));
        }

        params
    }
}

/// Current price for a symbol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceTicker {
    /// Trading pair (e.g., "BTCUSDT")
    pub symbol: String,
    /// Last price as reported by the venue
    pub price: String,
    /// Venue timestamp in milliseconds
    #[serde(default)]
    pub time: i64,
}

impl PriceTicker {
    /// Parse price as f64
    pub fn price_f64(&self) -> Option<f64> {
        self.price.parse().ok()
    }
}

impl std::fmt::Display for PriceTicker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.price_f64() {
            Some(p) => write!(f, "{}: ${:.2}", self.symbol, p),
            None => write!(f, "{}: {}", self.symbol, self.price),
        }
    }
}

/// Futures account balance summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    /// Total wallet balance in USDT
    #[serde(default)]
    pub total_wallet_balance: String,
    /// Balance available for new orders
    #[serde(default)]
    pub available_balance: String,
    /// Unrealized profit across open positions
    #[serde(default)]
    pub total_unrealized_profit: String,
    /// Wallet balance plus unrealized profit
    #[serde(default)]
    pub total_margin_balance: String,
}

impl AccountSummary {
    pub fn total_wallet_balance_f64(&self) -> Option<f64> {
        self.total_wallet_balance.parse().ok()
    }

    pub fn available_balance_f64(&self) -> Option<f64> {
        self.available_balance.parse().ok()
    }
}

impl std::fmt::Display for AccountSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let total = self.total_wallet_balance_f64().unwrap_or(0.0);
        let available = self.available_balance_f64().unwrap_or(0.0);
        write!(
            f,
            "Account Balance: ${:.2} USDT (available: ${:.2})",
            total, available
        )
    }
}

/// Response from order creation, cancellation, and open-order queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse {
    /// Unique order identifier
    #[serde(rename = "orderId")]
    pub order_id: i64,
    /// Trading pair
    pub symbol: String,
    /// Order status (NEW, FILLED, CANCELED, ...)
    #[serde(default)]
    pub status: String,
    /// Client-assigned order identifier
    #[serde(default, rename = "clientOrderId")]
    pub client_order_id: String,
    /// Order side
    #[serde(default)]
    pub side: String,
    /// Order type
    #[serde(default, rename = "type")]
    pub order_type: String,
    /// Original order quantity
    #[serde(default, rename = "origQty")]
    pub orig_qty: String,
    /// Quantity filled so far
    #[serde(default, rename = "executedQty")]
    pub executed_qty: String,
    /// Limit price ("0" for market orders)
    #[serde(default)]
    pub price: String,
    /// Average fill price
    #[serde(default, rename = "avgPrice")]
    pub avg_price: String,
    /// Trigger price ("0" when not a stop order)
    #[serde(default, rename = "stopPrice")]
    pub stop_price: String,
    /// Time in force
    #[serde(default, rename = "timeInForce")]
    pub time_in_force: String,
    /// Last update timestamp in milliseconds
    #[serde(default, rename = "updateTime")]
    pub update_time: i64,
}

impl std::fmt::Display for OrderResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);
        table.add_row(Row::new(vec![Cell::new("FIELD"), Cell::new("VALUE")]));

        let zero_is_absent = |v: &str| !v.is_empty() && v.parse::<f64>().map(|p| p != 0.0).unwrap_or(true);

        table.add_row(Row::new(vec![
            Cell::new("Order ID"),
            Cell::new(&self.order_id.to_string()),
        ]));
        table.add_row(Row::new(vec![Cell::new("Symbol"), Cell::new(&self.symbol)]));

        for (label, value) in [
            ("Side", &self.side),
            ("Type", &self.order_type),
            ("Quantity", &self.orig_qty),
            ("Status", &self.status),
        ] {
            if !value.is_empty() {
                table.add_row(Row::new(vec![Cell::new(label), Cell::new(value)]));
            }
        }
        // Price fields come back as "0" when not applicable
        for (label, value) in [
            ("Price", &self.price),
            ("Stop Price", &self.stop_price),
            ("Avg Price", &self.avg_price),
        ] {
            if zero_is_absent(value) {
                table.add_row(Row::new(vec![Cell::new(label), Cell::new(value)]));
            }
        }

        write!(f, "{}", table)
    }
}

/// Render open orders as a table
pub fn open_orders_table(orders: &[OrderResponse]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.add_row(Row::new(vec![
        Cell::new("ORDER ID"),
        Cell::new("SYMBOL"),
        Cell::new("SIDE"),
        Cell::new("TYPE"),
        Cell::new("QUANTITY"),
        Cell::new("PRICE"),
        Cell::new("STATUS"),
    ]));

    for order in orders {
        table.add_row(Row::new(vec![
            Cell::new(&order.order_id.to_string()),
            Cell::new(&order.symbol),
            Cell::new(&order.side),
            Cell::new(&order.order_type),
            Cell::new(&order.orig_qty),
            Cell::new(&order.price),
            Cell::new(&order.status),
        ]));
    }

    table
}

/// Open position information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionInfo {
    /// Trading pair
    pub symbol: String,
    /// Signed position size (negative for shorts, "0" when flat)
    #[serde(default, rename = "positionAmt")]
    pub position_amt: String,
    /// Average entry price
    #[serde(default, rename = "entryPrice")]
    pub entry_price: String,
    /// Current mark price
    #[serde(default, rename = "markPrice")]
    pub mark_price: String,
    /// Unrealized profit at the mark price
    #[serde(default, rename = "unRealizedProfit")]
    pub unrealized_profit: String,
    /// Estimated liquidation price
    #[serde(default, rename = "liquidationPrice")]
    pub liquidation_price: String,
    /// Position leverage
    #[serde(default)]
    pub leverage: String,
}

impl PositionInfo {
    pub fn position_amt_f64(&self) -> Option<f64> {
        self.position_amt.parse().ok()
    }

    pub fn unrealized_profit_f64(&self) -> Option<f64> {
        self.unrealized_profit.parse().ok()
    }

    /// True when the venue reports a non-zero position size
    pub fn is_open(&self) -> bool {
        self.position_amt_f64().map(|amt| amt != 0.0).unwrap_or(false)
    }
}

/// Render open positions as a table
pub fn positions_table(positions: &[PositionInfo]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.add_row(Row::new(vec![
        Cell::new("SYMBOL"),
        Cell::new("AMOUNT"),
        Cell::new("ENTRY PRICE"),
        Cell::new("MARK PRICE"),
        Cell::new("PNL"),
        Cell::new("LEVERAGE"),
    ]));

    for position in positions {
        let pnl = position
            .unrealized_profit_f64()
            .map(|p| format!("${:.2}", p))
            .unwrap_or_else(|| position.unrealized_profit.clone());

        table.add_row(Row::new(vec![
            Cell::new(&position.symbol),
            Cell::new(&position.position_amt),
            Cell::new(&position.entry_price),
            Cell::new(&position.mark_price),
            Cell::new(&pnl),
            Cell::new(&position.leverage),
        ]));
    }

    table
}

/// Error body returned by the venue on rejected requests
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub code: i64,
    pub msg: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_market_order_params() {
        let order = OrderRequest::market("BTCUSDT", OrderSide::Buy, dec!(0.001));
        let params = order.to_query_params();

        assert_eq!(
            params,
            vec![
                ("symbol", "BTCUSDT".to_string()),
                ("side", "BUY".to_string()),
                ("type", "MARKET".to_string()),
                ("quantity", "0.001".to_string()),
            ]
        );
    }

    #[test]
    fn test_limit_order_params_carry_gtc() {
        let order = OrderRequest::limit("BTCUSDT", OrderSide::Buy, dec!(0.001), dec!(50000));
        let params = order.to_query_params();

        assert!(params.contains(&("price", "50000".to_string())));
        assert!(params.contains(&("timeInForce", "GTC".to_string())));
        assert!(!params.iter().any(|(k, _)| *k == "stopPrice"));
    }

    #[test]
    fn test_stop_limit_order_params() {
        let order = OrderRequest::stop_limit(
            "BTCUSDT",
            OrderSide::Sell,
            dec!(0.001),
            dec!(44900),
            dec!(45000),
        );
        let params = order.to_query_params();

        assert!(params.contains(&("type", "STOP".to_string())));
        assert!(params.contains(&("stopPrice", "44900".to_string())));
        assert!(params.contains(&("price", "45000".to_string())));
        assert!(params.contains(&("timeInForce", "GTC".to_string())));
    }

    #[test]
    fn test_side_and_type_wire_values() {
        assert_eq!(OrderSide::Buy.to_string(), "BUY");
        assert_eq!(OrderSide::Sell.to_string(), "SELL");
        assert_eq!(OrderType::Market.to_string(), "MARKET");
        assert_eq!(OrderType::Limit.to_string(), "LIMIT");
        assert_eq!(OrderType::StopLimit.to_string(), "STOP");
    }

    #[test]
    fn test_parse_order_response() {
        let json = r#"{
            "orderId": 22542179,
            "symbol": "BTCUSDT",
            "status": "NEW",
            "clientOrderId": "x-abc123",
            "price": "50000",
            "avgPrice": "0.00000",
            "origQty": "0.001",
            "executedQty": "0",
            "stopPrice": "0",
            "timeInForce": "GTC",
            "type": "LIMIT",
            "side": "BUY",
            "updateTime": 1566818724722
        }"#;

        let order: OrderResponse = serde_json::from_str(json).unwrap();
        assert_eq!(order.order_id, 22542179);
        assert_eq!(order.symbol, "BTCUSDT");
        assert_eq!(order.status, "NEW");
        assert_eq!(order.order_type, "LIMIT");
        assert_eq!(order.orig_qty, "0.001");
    }

    #[test]
    fn test_parse_order_response_with_missing_fields() {
        // The venue omits fields depending on endpoint and order type
        let json = r#"{"orderId": 1, "symbol": "ETHUSDT"}"#;

        let order: OrderResponse = serde_json::from_str(json).unwrap();
        assert_eq!(order.order_id, 1);
        assert!(order.status.is_empty());
        assert_eq!(order.update_time, 0);
    }

    #[test]
    fn test_parse_price_ticker() {
        let json = r#"{"symbol": "BTCUSDT", "price": "50000.00", "time": 1589437530011}"#;

        let ticker: PriceTicker = serde_json::from_str(json).unwrap();
        assert_eq!(ticker.symbol, "BTCUSDT");
        assert_eq!(ticker.price, "50000.00");
        assert_eq!(ticker.price_f64(), Some(50000.0));
    }

    #[test]
    fn test_parse_account_summary() {
        let json = r#"{
            "totalWalletBalance": "23.72469206",
            "availableBalance": "23.72469206",
            "totalUnrealizedProfit": "0.00000000",
            "totalMarginBalance": "23.72469206",
            "assets": []
        }"#;

        let account: AccountSummary = serde_json::from_str(json).unwrap();
        assert_eq!(account.total_wallet_balance_f64(), Some(23.72469206));
    }

    #[test]
    fn test_position_is_open_filters_flat() {
        let open: PositionInfo = serde_json::from_str(
            r#"{"symbol": "BTCUSDT", "positionAmt": "-0.010", "entryPrice": "45000"}"#,
        )
        .unwrap();
        let flat: PositionInfo = serde_json::from_str(
            r#"{"symbol": "ETHUSDT", "positionAmt": "0.000", "entryPrice": "0"}"#,
        )
        .unwrap();

        assert!(open.is_open());
        assert!(!flat.is_open());
    }

    #[test]
    fn test_parse_api_error_body() {
        let json = r#"{"code": -2019, "msg": "Margin is insufficient."}"#;

        let body: ApiErrorBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.code, -2019);
        assert_eq!(body.msg, "Margin is insufficient.");
    }
}
