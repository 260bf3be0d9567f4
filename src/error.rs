//! Error taxonomy for the trading CLI
//!
//! Every failure is terminal for the invocation. Credential and argument
//! errors are raised before any network call; remote and network errors
//! carry whatever the venue or transport reported, verbatim.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TradeError {
    /// A required credential environment variable is absent or empty.
    #[error("missing credentials: {0} is not set (add it to your environment or .env file)")]
    MissingCredentials(&'static str),

    /// A CLI argument failed validation. Names the offending field.
    #[error("invalid {field}: {reason}")]
    InvalidArgument { field: &'static str, reason: String },

    /// The venue rejected or failed to process the request.
    #[error("exchange error{}: {message}", .code.map(|c| format!(" ({c})")).unwrap_or_default())]
    Remote { code: Option<i64>, message: String },

    /// Transport-level failure reaching the venue.
    #[error("network error: {0}")]
    Network(String),

    /// The venue returned a payload that could not be decoded.
    #[error("unexpected response: {0}")]
    Parse(String),
}

impl TradeError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        TradeError::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for TradeError {
    fn from(err: reqwest::Error) -> Self {
        TradeError::Network(err.to_string())
    }
}

pub type TradeResult<T> = Result<T, TradeError>;
