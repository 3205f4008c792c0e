//! Synthetic candle source — seeded random walk for tests and offline runs.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::provider::{CandleProvider, DataError, FetchRange, Interval};
use crate::domain::Candle;

/// Deterministic random-walk candles: the same (seed, symbol, interval,
/// range) always yields the same series, so offline runs are reproducible.
pub struct SyntheticProvider {
    pub seed: u64,
    pub start_price: f64,
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self {
            seed: 7,
            start_price: 100.0,
        }
    }
}

impl SyntheticProvider {
    /// Candles per simulated session (one exchange day).
    fn candles_per_day(interval: Interval) -> u32 {
        match interval {
            Interval::OneMinute => 375, // a 09:15–15:30 session
            Interval::FiveMinute => 75,
            Interval::Daily => 1,
        }
    }

    fn symbol_seed(&self, symbol: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        symbol.hash(&mut hasher);
        self.seed ^ hasher.finish()
    }

    fn generate(&self, symbol: &str, interval: Interval, start: DateTime<Utc>, count: u32) -> Vec<Candle> {
        let mut rng = StdRng::seed_from_u64(self.symbol_seed(symbol));
        let step = interval.step();

        let mut candles = Vec::with_capacity(count as usize);
        let mut open = self.start_price;
        for i in 0..count {
            let drift: f64 = rng.gen_range(-0.004..0.005);
            let close = (open * (1.0 + drift)).max(0.01);
            let wick: f64 = rng.gen_range(0.0..0.002);
            let high = open.max(close) * (1.0 + wick);
            let low = open.min(close) * (1.0 - wick);
            let volume = rng.gen_range(1_000..100_000);

            candles.push(Candle {
                timestamp: start + step * i as i32,
                open,
                high,
                low,
                close,
                volume,
            });
            open = close;
        }
        candles
    }
}

impl CandleProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(
        &self,
        symbol: &str,
        interval: Interval,
        range: FetchRange,
    ) -> Result<Vec<Candle>, DataError> {
        let per_day = Self::candles_per_day(interval);
        let (start, count) = match range {
            FetchRange::Period { days } => {
                let count = days * per_day;
                let start = Utc::now() - interval.step() * count as i32;
                (start, count)
            }
            FetchRange::Between { start, end } => {
                let span = end.signed_duration_since(start);
                let days = span.num_days().clamp(0, 365) as u32;
                (start, (days.max(1)) * per_day)
            }
        };
        Ok(self.generate(symbol, interval, start, count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::candle::is_strictly_ordered;
    use chrono::TimeZone;

    #[test]
    fn deterministic_per_symbol() {
        let provider = SyntheticProvider::default();
        let range = FetchRange::Between {
            start: Utc.with_ymd_and_hms(2024, 1, 2, 9, 15, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 1, 4, 9, 15, 0).unwrap(),
        };
        let a = provider.fetch("RELIANCE", Interval::FiveMinute, range).unwrap();
        let b = provider.fetch("RELIANCE", Interval::FiveMinute, range).unwrap();
        assert_eq!(a, b);

        let c = provider.fetch("INFY", Interval::FiveMinute, range).unwrap();
        assert_ne!(a, c, "different symbols should diverge");
    }

    #[test]
    fn candles_are_ordered_and_sane() {
        let provider = SyntheticProvider::default();
        let candles = provider
            .fetch("TCS", Interval::FiveMinute, FetchRange::Period { days: 3 })
            .unwrap();
        assert_eq!(candles.len(), 3 * 75);
        assert!(is_strictly_ordered(&candles));
        assert!(candles.iter().all(Candle::is_sane));
    }
}
