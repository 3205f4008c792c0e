//! Candle source trait and structured error types.
//!
//! The CandleProvider trait abstracts over market-data sources (Yahoo
//! Finance, synthetic series, test fixtures) so jobs can swap
//! implementations and tests never touch the network.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::Candle;

/// Candle interval of a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interval {
    OneMinute,
    FiveMinute,
    Daily,
}

impl Interval {
    /// Chart API interval token.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OneMinute => "1m",
            Self::FiveMinute => "5m",
            Self::Daily => "1d",
        }
    }

    /// Duration of one candle.
    pub fn step(self) -> Duration {
        match self {
            Self::OneMinute => Duration::minutes(1),
            Self::FiveMinute => Duration::minutes(5),
            Self::Daily => Duration::days(1),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1m" => Ok(Self::OneMinute),
            "5m" => Ok(Self::FiveMinute),
            "1d" => Ok(Self::Daily),
            other => Err(format!("unknown interval '{other}' (expected 1m, 5m or 1d)")),
        }
    }
}

/// Time coverage of a fetch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FetchRange {
    /// Trailing lookback of whole days ending now.
    Period { days: u32 },
    /// Explicit half-open instant range [start, end).
    Between {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// Structured error types for candle fetches.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network error: {0}")]
    Network(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("data error: {0}")]
    Other(String),
}

/// Trait for candle sources.
///
/// `fetch` returns candles oldest-first with strictly increasing
/// timestamps. An empty series is a normal outcome (no trading in the
/// range), not an error.
pub trait CandleProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    fn fetch(
        &self,
        symbol: &str,
        interval: Interval,
        range: FetchRange,
    ) -> Result<Vec<Candle>, DataError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_tokens_roundtrip() {
        for interval in [Interval::OneMinute, Interval::FiveMinute, Interval::Daily] {
            assert_eq!(interval.as_str().parse::<Interval>().unwrap(), interval);
        }
        assert!("15m".parse::<Interval>().is_err());
    }

    #[test]
    fn interval_steps() {
        assert_eq!(Interval::OneMinute.step(), Duration::minutes(1));
        assert_eq!(Interval::Daily.step(), Duration::days(1));
    }
}
