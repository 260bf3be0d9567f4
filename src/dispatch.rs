//! Trading command dispatcher
//!
//! Maps a parsed CLI command onto exactly one remote operation. Argument
//! validation happens here, before any network call: a command that fails
//! validation never reaches the client. The remote side is abstracted
//! behind the `TradingApi` capability trait so tests can substitute a
//! deterministic fake for the HTTP client.

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::info;

use crate::binance::types::{
    AccountSummary, OrderRequest, OrderResponse, OrderSide, PositionInfo, PriceTicker,
};
use crate::error::{TradeError, TradeResult};

/// One variant per CLI command, holding the raw argument strings
///
/// Numeric arguments stay unparsed until validation so that a malformed
/// value surfaces as an `InvalidArgument` naming the field, not as an
/// argument-parser error.
#[derive(Debug, Clone)]
pub enum TradingCommand {
    Balance,
    Price {
        symbol: String,
    },
    Market {
        symbol: String,
        side: String,
        quantity: String,
    },
    Limit {
        symbol: String,
        side: String,
        quantity: String,
        price: String,
    },
    StopLimit {
        symbol: String,
        side: String,
        quantity: String,
        stop_price: String,
        price: String,
    },
    Orders {
        symbol: Option<String>,
    },
    Cancel {
        symbol: String,
        order_id: String,
    },
    Positions {
        symbol: Option<String>,
    },
}

/// Capability set required of the remote trading client
///
/// One method per remote operation; each performs a single call against
/// the mode-selected endpoint.
#[async_trait]
pub trait TradingApi {
    async fn account(&self) -> TradeResult<AccountSummary>;
    async fn price(&self, symbol: &str) -> TradeResult<PriceTicker>;
    async fn place_order(&self, order: &OrderRequest) -> TradeResult<OrderResponse>;
    async fn open_orders(&self, symbol: Option<&str>) -> TradeResult<Vec<OrderResponse>>;
    async fn cancel_order(&self, symbol: &str, order_id: i64) -> TradeResult<OrderResponse>;
    async fn positions(&self, symbol: Option<&str>) -> TradeResult<Vec<PositionInfo>>;
}

/// Response payload returned for display
#[derive(Debug)]
pub enum Outcome {
    Balance(AccountSummary),
    Price(PriceTicker),
    OrderPlaced(OrderResponse),
    OpenOrders(Vec<OrderResponse>),
    Cancelled(OrderResponse),
    Positions(Vec<PositionInfo>),
}

/// Validate the command's arguments and invoke the matching remote
/// operation
///
/// Exactly one remote call is made per invocation; there is no local
/// retry. Order placement is the only non-idempotent path.
pub async fn dispatch<T>(command: TradingCommand, api: &T) -> TradeResult<Outcome>
where
    T: TradingApi + Sync,
{
    match command {
        TradingCommand::Balance => {
            let account = api.account().await?;
            Ok(Outcome::Balance(account))
        }

        TradingCommand::Price { symbol } => {
            let symbol = normalize_symbol(&symbol)?;
            let ticker = api.price(&symbol).await?;
            Ok(Outcome::Price(ticker))
        }

        TradingCommand::Market {
            symbol,
            side,
            quantity,
        } => {
            let order = OrderRequest::market(
                normalize_symbol(&symbol)?,
                parse_side(&side)?,
                parse_positive_decimal("quantity", &quantity)?,
            );
            place(api, order).await
        }

        TradingCommand::Limit {
            symbol,
            side,
            quantity,
            price,
        } => {
            let order = OrderRequest::limit(
                normalize_symbol(&symbol)?,
                parse_side(&side)?,
                parse_positive_decimal("quantity", &quantity)?,
                parse_positive_decimal("price", &price)?,
            );
            place(api, order).await
        }

        TradingCommand::StopLimit {
            symbol,
            side,
            quantity,
            stop_price,
            price,
        } => {
            let order = OrderRequest::stop_limit(
                normalize_symbol(&symbol)?,
                parse_side(&side)?,
                parse_positive_decimal("quantity", &quantity)?,
                parse_positive_decimal("stop_price", &stop_price)?,
                parse_positive_decimal("price", &price)?,
            );
            place(api, order).await
        }

        TradingCommand::Orders { symbol } => {
            let symbol = symbol.as_deref().map(normalize_symbol).transpose()?;
            let orders = api.open_orders(symbol.as_deref()).await?;
            Ok(Outcome::OpenOrders(orders))
        }

        TradingCommand::Cancel { symbol, order_id } => {
            let symbol = normalize_symbol(&symbol)?;
            let order_id = parse_order_id(&order_id)?;
            let cancelled = api.cancel_order(&symbol, order_id).await?;
            Ok(Outcome::Cancelled(cancelled))
        }

        TradingCommand::Positions { symbol } => {
            let symbol = symbol.as_deref().map(normalize_symbol).transpose()?;
            let positions = api.positions(symbol.as_deref()).await?;
            Ok(Outcome::Positions(positions))
        }
    }
}

async fn place<T>(api: &T, order: OrderRequest) -> TradeResult<Outcome>
where
    T: TradingApi + Sync,
{
    info!(
        "Placing {} {} order: {} {}",
        order.order_type, order.side, order.quantity, order.symbol
    );

    let response = api.place_order(&order).await?;

    info!(
        "{} {} | {} | Qty: {} | Order ID: {} | Status: {}",
        order.order_type,
        order.side,
        order.symbol,
        order.quantity,
        response.order_id,
        response.status
    );

    Ok(Outcome::OrderPlaced(response))
}

/// Uppercase the symbol and require it to be non-empty alphanumeric
fn normalize_symbol(raw: &str) -> TradeResult<String> {
    let symbol = raw.trim().to_uppercase();

    if symbol.is_empty() {
        return Err(TradeError::invalid("symbol", "must not be empty"));
    }
    if !symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(TradeError::invalid(
            "symbol",
            format!("'{}' must contain only letters and digits", raw.trim()),
        ));
    }

    Ok(symbol)
}

/// Parse BUY/SELL, case-insensitive
fn parse_side(raw: &str) -> TradeResult<OrderSide> {
    match raw.trim().to_uppercase().as_str() {
        "BUY" => Ok(OrderSide::Buy),
        "SELL" => Ok(OrderSide::Sell),
        other => Err(TradeError::invalid(
            "side",
            format!("'{}' must be BUY or SELL", other),
        )),
    }
}

/// Parse a decimal argument and require it to be strictly positive
///
/// A non-numeric string is an invalid argument, never coerced.
fn parse_positive_decimal(field: &'static str, raw: &str) -> TradeResult<Decimal> {
    let value: Decimal = raw
        .trim()
        .parse()
        .map_err(|_| TradeError::invalid(field, format!("'{}' is not a number", raw.trim())))?;

    if value <= Decimal::ZERO {
        return Err(TradeError::invalid(field, "must be greater than zero"));
    }

    Ok(value)
}

fn parse_order_id(raw: &str) -> TradeResult<i64> {
    raw.trim()
        .parse()
        .map_err(|_| TradeError::invalid("order_id", format!("'{}' is not an order id", raw.trim())))
}
