//! Execution environment resolution
//!
//! The target environment (testnet or live) is an explicit value resolved
//! once per invocation from the `--live` flag and threaded through client
//! construction. Testnet is the default; live trading is opt-in only.

use std::fmt;

/// Base URL for the Binance USDS-M Futures testnet
pub const TESTNET_BASE_URL: &str = "https://testnet.binancefuture.com";

/// Base URL for live Binance USDS-M Futures trading
pub const LIVE_BASE_URL: &str = "https://fapi.binance.com";

/// Resolved target environment for a single invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Testnet,
    Live,
}

impl ExecutionMode {
    /// Resolve the mode from the `--live` CLI flag. Absent or false means
    /// testnet.
    pub fn from_live_flag(live: bool) -> Self {
        if live {
            ExecutionMode::Live
        } else {
            ExecutionMode::Testnet
        }
    }

    /// REST base URL for this environment
    pub fn base_url(&self) -> &'static str {
        match self {
            ExecutionMode::Testnet => TESTNET_BASE_URL,
            ExecutionMode::Live => LIVE_BASE_URL,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, ExecutionMode::Live)
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Testnet => write!(f, "TESTNET"),
            ExecutionMode::Live => write!(f, "LIVE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_testnet() {
        assert_eq!(ExecutionMode::from_live_flag(false), ExecutionMode::Testnet);
        assert!(!ExecutionMode::from_live_flag(false).is_live());
    }

    #[test]
    fn test_live_flag_selects_live() {
        assert_eq!(ExecutionMode::from_live_flag(true), ExecutionMode::Live);
        assert!(ExecutionMode::from_live_flag(true).is_live());
    }

    #[test]
    fn test_base_urls() {
        assert_eq!(
            ExecutionMode::Testnet.base_url(),
            "https://testnet.binancefuture.com"
        );
        assert_eq!(ExecutionMode::Live.base_url(), "https://fapi.binance.com");
    }

    #[test]
    fn test_display() {
        assert_eq!(ExecutionMode::Testnet.to_string(), "TESTNET");
        assert_eq!(ExecutionMode::Live.to_string(), "LIVE");
    }
}
