//! Yahoo Finance candle source.
//!
//! Fetches OHLCV candles from Yahoo's v8 chart API at 1m/5m/1d resolution.
//! Yahoo has no official API and is subject to unannounced format changes;
//! parse failures surface as `ResponseFormatChanged`.
//!
//! No retry loop: a symbol that fails here is simply retried on the next
//! scheduled run. A request timeout is imposed so a wedged connection
//! cannot stall the batch.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;

use super::provider::{CandleProvider, DataError, FetchRange, Interval};
use crate::domain::Candle;

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

/// Yahoo Finance candle provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
}

impl Default for YahooProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl YahooProvider {
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .expect("failed to build HTTP client");

        Self { client }
    }

    /// Build the chart API URL for a symbol, interval and range.
    fn chart_url(symbol: &str, interval: Interval, range: FetchRange) -> String {
        let interval = interval.as_str();
        match range {
            FetchRange::Period { days } => format!(
                "https://query2.finance.yahoo.com/v8/finance/chart/{symbol}\
                 ?range={days}d&interval={interval}"
            ),
            FetchRange::Between { start, end } => {
                let period1 = start.timestamp();
                let period2 = end.timestamp();
                format!(
                    "https://query2.finance.yahoo.com/v8/finance/chart/{symbol}\
                     ?period1={period1}&period2={period2}&interval={interval}"
                )
            }
        }
    }

    /// Parse the chart API response into candles.
    ///
    /// Rows missing any OHLC value (halts, partial minutes) are dropped —
    /// detectors require complete rows. A present-but-empty result is a
    /// normal empty series.
    fn parse_response(symbol: &str, resp: ChartResponse) -> Result<Vec<Candle>, DataError> {
        let result = resp.chart.result.ok_or_else(|| {
            if let Some(err) = resp.chart.error {
                if err.code == "Not Found" {
                    DataError::SymbolNotFound {
                        symbol: symbol.to_string(),
                    }
                } else {
                    DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
                }
            } else {
                DataError::ResponseFormatChanged("empty result with no error".into())
            }
        })?;

        let Some(data) = result.into_iter().next() else {
            return Ok(Vec::new());
        };

        let Some(timestamps) = data.timestamp else {
            return Ok(Vec::new()); // no trading in the requested range
        };

        // Multi-symbol responses carry one quote block per symbol; the
        // single-symbol case collapses to the first (and only) block.
        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

        let mut candles = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let timestamp = DateTime::<Utc>::from_timestamp(ts, 0).ok_or_else(|| {
                DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
            })?;

            let open = quote.open.get(i).copied().flatten();
            let high = quote.high.get(i).copied().flatten();
            let low = quote.low.get(i).copied().flatten();
            let close = quote.close.get(i).copied().flatten();
            let volume = quote.volume.get(i).copied().flatten();

            let (Some(open), Some(high), Some(low), Some(close)) = (open, high, low, close)
            else {
                continue;
            };

            candles.push(Candle {
                timestamp,
                open,
                high,
                low,
                close,
                volume: volume.unwrap_or(0),
            });
        }

        // Yahoo occasionally returns out-of-order or duplicated rows;
        // detectors require a strictly increasing sequence.
        candles.sort_by_key(|c| c.timestamp);
        candles.dedup_by_key(|c| c.timestamp);

        Ok(candles)
    }
}

impl CandleProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(
        &self,
        symbol: &str,
        interval: Interval,
        range: FetchRange,
    ) -> Result<Vec<Candle>, DataError> {
        let url = Self::chart_url(symbol, interval, range);

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| DataError::Network(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        if !status.is_success() {
            return Err(DataError::Network(format!("HTTP {status} for {symbol}")));
        }

        let chart: ChartResponse = resp.json().map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
        })?;

        Self::parse_response(symbol, chart)
    }
}
