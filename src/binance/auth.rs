//! Authentication utilities for the Binance Futures API
//!
//! Implements HMAC-SHA256 signature generation over the request query
//! string, as required by Binance signed endpoints. The API key itself is
//! sent in the `X-MBX-APIKEY` header and is never part of the signature.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{TradeError, TradeResult};

type HmacSha256 = Hmac<Sha256>;

/// Environment variable holding the API key
pub const API_KEY_VAR: &str = "API_KEY";

/// Environment variable holding the API secret
pub const SECRET_KEY_VAR: &str = "SECRET_KEY";

/// Generate an HMAC-SHA256 signature for a signed endpoint
///
/// The signature is computed over the urlencoded query string (including
/// the `timestamp` parameter) using the API secret as the key, and is
/// appended to the request as the `signature` parameter.
///
/// # Example
///
/// ```
/// use futures_bot::binance::auth::sign_query;
///
/// let secret = "your-api-secret";
/// let query = "symbol=BTCUSDT&timestamp=1234567890";
/// let signature = sign_query(query, secret);
/// ```
pub fn sign_query(query: &str, secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(query.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Verify a signature against the expected value
///
/// This is useful for testing or webhook verification.
pub fn verify_signature(query: &str, secret: &str, signature: &str) -> bool {
    let computed = sign_query(query, secret);
    // Use constant-time comparison to prevent timing attacks
    constant_time_eq(computed.as_bytes(), signature.as_bytes())
}

/// Constant-time byte comparison to prevent timing attacks
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

/// API credentials container
///
/// Loaded once at startup and held for the process lifetime. The secret is
/// deliberately excluded from Debug output and never logged.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Create new credentials from API key and secret
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Load credentials from the `API_KEY` and `SECRET_KEY` environment
    /// variables
    ///
    /// An absent or empty variable is fatal; no network call is made
    /// without both credentials present.
    pub fn from_env() -> TradeResult<Self> {
        let api_key = non_empty_var(API_KEY_VAR)?;
        let api_secret = non_empty_var(SECRET_KEY_VAR)?;
        Ok(Self::new(api_key, api_secret))
    }

    /// Get the API key
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Get the API secret
    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }

    /// Sign a request query string
    pub fn sign(&self, query: &str) -> String {
        sign_query(query, &self.api_secret)
    }
}

fn non_empty_var(name: &'static str) -> TradeResult<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(TradeError::MissingCredentials(name)),
    }
}
