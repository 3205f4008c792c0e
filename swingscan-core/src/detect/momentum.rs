//! Momentum-window detector — N strong bullish candles inside a sliding window.

use serde::{Deserialize, Serialize};

use crate::series::ScanSeries;

/// Slides a window of `momentum_length` consecutive candles across a bounded
/// trailing region of the series and counts "strong" candles per position.
///
/// The region deliberately excludes the most recent `cooldown` candles (the
/// setup must have happened, then pulled back) and everything older than
/// `scan_reach` candles from the end. A candle is strong when it closes above
/// its open by more than `body_pct` (fractional) and its close exceeds the
/// previous in-window candle's high; the first candle of a window compares
/// against its own open as a neutral baseline.
///
/// First match wins: the scan stops at the first window position holding at
/// least `required_strong_candles` strong candles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumWindow {
    pub momentum_length: usize,
    pub required_strong_candles: usize,
    pub body_pct: f64,
    pub scan_reach: usize,
    pub cooldown: usize,
}

impl MomentumWindow {
    pub fn new(
        momentum_length: usize,
        required_strong_candles: usize,
        body_pct: f64,
        scan_reach: usize,
        cooldown: usize,
    ) -> Self {
        assert!(momentum_length >= 1, "momentum_length must be >= 1");
        assert!(
            required_strong_candles >= 1 && required_strong_candles <= momentum_length,
            "required_strong_candles must be in 1..=momentum_length"
        );
        assert!(scan_reach > cooldown, "scan_reach must exceed cooldown");
        Self {
            momentum_length,
            required_strong_candles,
            body_pct,
            scan_reach,
            cooldown,
        }
    }

    /// 5-minute preset: 3 of 5 candles with a 0.5% body, windows ending
    /// between 65 and 5 candles ago.
    pub fn five_minute() -> Self {
        Self::new(5, 3, 0.005, 65, 5)
    }

    /// 1-minute preset: 4 of 7 candles with a 0.3% body, windows ending
    /// between 85 and 5 candles ago.
    pub fn one_minute() -> Self {
        Self::new(7, 4, 0.003, 85, 5)
    }

    pub fn matches(&self, series: &ScanSeries) -> bool {
        let candles = series.candles();
        let n = candles.len();
        if n <= self.cooldown {
            return false;
        }

        let first_end = n.saturating_sub(self.scan_reach);
        let last_end = n - self.cooldown; // exclusive

        for end in first_end..last_end {
            // Window covers [end + 1 - momentum_length, end]; positions where
            // it cannot fully form are skipped, not zero-padded.
            let Some(start) = (end + 1).checked_sub(self.momentum_length) else {
                continue;
            };
            let window = &candles[start..=end];

            let strong = window
                .iter()
                .enumerate()
                .filter(|(j, c)| {
                    let prev_high = if *j > 0 { window[j - 1].high } else { c.open };
                    c.open > 0.0
                        && c.close > c.open
                        && (c.close - c.open) / c.open > self.body_pct
                        && c.close > prev_high
                })
                .count();

            if strong >= self.required_strong_candles {
                return true;
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Candle;
    use chrono::{Duration, TimeZone, Utc};

    fn flat_candle(i: usize, close: f64) -> Candle {
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 9, 15, 0).unwrap();
        Candle {
            timestamp: start + Duration::minutes(5 * i as i64),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1_000,
        }
    }

    /// 70 flat candles at 100 with a run of strong candles starting at
    /// `at`, each closing `body` above its open and above the prior high.
    fn series_with_run(at: usize, count: usize, body: f64) -> ScanSeries {
        let mut candles: Vec<Candle> = (0..70).map(|i| flat_candle(i, 100.0)).collect();
        let mut open = 100.0;
        for i in at..at + count {
            let close = open * (1.0 + body);
            candles[i].open = open;
            candles[i].close = close;
            candles[i].high = close;
            candles[i].low = open;
            open = close;
        }
        ScanSeries::new(candles, 22)
    }

    #[test]
    fn detects_exact_threshold_run() {
        let detector = MomentumWindow::five_minute();
        // Exactly 3 strong candles, window ending well inside the region.
        assert!(detector.matches(&series_with_run(40, 3, 0.007)));
    }

    #[test]
    fn body_below_threshold_fails() {
        let detector = MomentumWindow::five_minute();
        // Same shape but bodies under 0.5% never count as strong.
        assert!(!detector.matches(&series_with_run(40, 3, 0.004)));
    }

    #[test]
    fn run_inside_cooldown_zone_is_ignored() {
        let detector = MomentumWindow::five_minute();
        // Strong candles in the last 3 positions: every qualifying window
        // ends inside the excluded cooldown zone.
        assert!(!detector.matches(&series_with_run(67, 3, 0.007)));
    }

    #[test]
    fn short_series_skips_unformable_windows() {
        let detector = MomentumWindow::five_minute();
        // 20 candles: the scan region starts at the series head where the
        // first few windows cannot form. No panic, and a run placed in the
        // middle is still found.
        let mut candles: Vec<Candle> = (0..20).map(|i| flat_candle(i, 100.0)).collect();
        let mut open = 100.0;
        for i in 8..11 {
            let close = open * 1.007;
            candles[i].open = open;
            candles[i].close = close;
            candles[i].high = close;
            candles[i].low = open;
            open = close;
        }
        assert!(detector.matches(&ScanSeries::new(candles, 22)));
    }

    #[test]
    fn empty_and_tiny_series() {
        let detector = MomentumWindow::five_minute();
        assert!(!detector.matches(&ScanSeries::new(Vec::new(), 22)));
        let tiny: Vec<Candle> = (0..3).map(|i| flat_candle(i, 100.0)).collect();
        assert!(!detector.matches(&ScanSeries::new(tiny, 22)));
    }

    #[test]
    fn close_must_break_prior_high() {
        let detector = MomentumWindow::five_minute();
        // Bullish bodies, but each candle's high towers above the next
        // close, so the breakout condition never holds past the first.
        let mut candles: Vec<Candle> = (0..70).map(|i| flat_candle(i, 100.0)).collect();
        for i in 40..43 {
            candles[i].open = 100.0;
            candles[i].close = 101.0;
            candles[i].high = 110.0;
            candles[i].low = 99.0;
        }
        assert!(!detector.matches(&ScanSeries::new(candles, 22)));
    }
}
