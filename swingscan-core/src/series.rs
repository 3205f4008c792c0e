//! ScanSeries — candles merged with an aligned EMA column.
//!
//! The single input type every detector consumes: one EMA value per candle,
//! same length, same order.

use crate::domain::Candle;
use crate::indicators::ema_of_candles;

#[derive(Debug, Clone)]
pub struct ScanSeries {
    candles: Vec<Candle>,
    ema: Vec<f64>,
    span: usize,
}

impl ScanSeries {
    /// Build a merged series, computing the EMA over the candle closes.
    pub fn new(candles: Vec<Candle>, span: usize) -> Self {
        let ema = ema_of_candles(&candles, span);
        Self { candles, ema, span }
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn ema(&self) -> &[f64] {
        &self.ema
    }

    pub fn span(&self) -> usize {
        self.span
    }

    pub fn last_candle(&self) -> Option<&Candle> {
        self.candles.last()
    }

    pub fn last_ema(&self) -> Option<f64> {
        self.ema.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn flat_candles(n: usize, close: f64) -> Vec<Candle> {
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 9, 15, 0).unwrap();
        (0..n)
            .map(|i| Candle {
                timestamp: start + Duration::minutes(5 * i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1_000,
            })
            .collect()
    }

    #[test]
    fn ema_column_is_aligned() {
        let series = ScanSeries::new(flat_candles(30, 100.0), 22);
        assert_eq!(series.len(), 30);
        assert_eq!(series.ema().len(), 30);
        assert_eq!(series.span(), 22);
        let last_ema = series.last_ema().unwrap();
        assert!((last_ema - 100.0).abs() < 1e-9);
    }

    #[test]
    fn empty_series() {
        let series = ScanSeries::new(Vec::new(), 22);
        assert!(series.is_empty());
        assert!(series.last_candle().is_none());
        assert!(series.last_ema().is_none());
    }
}
