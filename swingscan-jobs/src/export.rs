//! JSON export artifacts — the matched-signal list and per-symbol candle
//! dumps, for ad-hoc inspection outside the store.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use swingscan_core::data::Interval;
use swingscan_core::domain::{round2, TradeSignal};
use swingscan_core::series::ScanSeries;

/// One row of the matched-signal artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanMatch {
    pub symbol: String,
    pub close: f64,
    pub ema: f64,
    pub volume: u64,
}

impl From<&TradeSignal> for ScanMatch {
    fn from(signal: &TradeSignal) -> Self {
        Self {
            symbol: signal.symbol.clone(),
            close: signal.entry_close,
            ema: signal.entry_ema,
            volume: signal.volume,
        }
    }
}

/// Write `results_<strategy>.json` into the export directory.
pub fn write_matches(dir: &Path, strategy: &str, matches: &[ScanMatch]) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("create export directory {}", dir.display()))?;
    let path = dir.join(format!("results_{strategy}.json"));
    let json = serde_json::to_string_pretty(matches)?;
    fs::write(&path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}

/// One candle of the per-symbol OHLC+EMA dump.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandleRow {
    /// Unix seconds.
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub ema: f64,
    pub volume: u64,
}

/// Write `<SYMBOL>_<interval>.json`: the merged OHLC+EMA series, prices
/// rounded to 2 decimals.
pub fn write_candle_dump(
    dir: &Path,
    symbol: &str,
    interval: Interval,
    series: &ScanSeries,
) -> Result<PathBuf> {
    let rows: Vec<CandleRow> = series
        .candles()
        .iter()
        .zip(series.ema())
        .map(|(c, &ema)| CandleRow {
            time: c.timestamp.timestamp(),
            open: round2(c.open),
            high: round2(c.high),
            low: round2(c.low),
            close: round2(c.close),
            ema: round2(ema),
            volume: c.volume,
        })
        .collect();

    fs::create_dir_all(dir)
        .with_context(|| format!("create export directory {}", dir.display()))?;
    let path = dir.join(format!("{symbol}_{interval}.json"));
    let json = serde_json::to_string_pretty(&rows)?;
    fs::write(&path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}
