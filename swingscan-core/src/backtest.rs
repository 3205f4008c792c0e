//! Backtest evaluator — first-touch outcome over forward candles.
//!
//! State machine per signal: `pending`/`no_hit`/`no_data` are re-evaluated
//! every run; the first forward candle whose high reaches the target
//! resolves `win`, whose low reaches the stop resolves `loss` (terminal
//! states); exhausting the fetched data with neither touch leaves `no_hit`;
//! an empty fetch, or no candle after the entry, leaves `no_data`.

use chrono::{DateTime, Duration, Utc};

use crate::domain::{Candle, TradeSignal, TradeStatus};
use crate::strategy::StrategyConfig;

/// Evaluation parameters derived from a strategy.
#[derive(Debug, Clone, Copy)]
pub struct EvalParams {
    /// Signals younger than this are skipped for the cycle.
    pub min_age: Duration,
    /// Cap on forward candles scanned (None = everything fetched).
    pub forward_limit: Option<usize>,
    /// Forward data is fetched from the entry up to entry + horizon.
    pub fetch_horizon: Duration,
}

impl EvalParams {
    pub fn for_strategy(cfg: &StrategyConfig) -> Self {
        Self {
            min_age: Duration::minutes(cfg.min_age_minutes),
            forward_limit: cfg.forward_limit,
            fetch_horizon: Duration::days(2),
        }
    }
}

/// Whether enough time has passed since entry for a meaningful forward scan.
pub fn is_eligible(signal: &TradeSignal, now: DateTime<Utc>, min_age: Duration) -> bool {
    now.signed_duration_since(signal.entry_timestamp) >= min_age
}

/// Index of the candle nearest in time to `ts`.
///
/// The source data may be missing the exact entry minute, so this is a
/// nearest match, not exact-match-required. Ties resolve to the earlier
/// candle. Requires `candles` sorted by timestamp.
pub fn nearest_index(candles: &[Candle], ts: DateTime<Utc>) -> Option<usize> {
    if candles.is_empty() {
        return None;
    }

    let right = candles.partition_point(|c| c.timestamp < ts);
    if right == 0 {
        return Some(0);
    }
    if right == candles.len() {
        return Some(candles.len() - 1);
    }

    let left = right - 1;
    let before = ts.signed_duration_since(candles[left].timestamp);
    let after = candles[right].timestamp.signed_duration_since(ts);
    if after < before {
        Some(right)
    } else {
        Some(left)
    }
}

/// First-touch outcome over a forward window.
///
/// Within each candle the target is checked before the stop, so a range
/// that covers both levels counts as a win. That ordering is inherited
/// reference behavior, not a claim about intrabar execution — kept as the
/// documented policy.
pub fn first_touch(future: &[Candle], target: f64, stop_loss: f64) -> TradeStatus {
    for candle in future {
        if candle.high >= target {
            return TradeStatus::Win;
        }
        if candle.low <= stop_loss {
            return TradeStatus::Loss;
        }
    }
    TradeStatus::NoHit
}

/// Resolve a signal against freshly fetched forward data.
///
/// `candles` is everything fetched from the entry time onward; the entry
/// candle is located by nearest timestamp and scanning starts strictly
/// after it.
pub fn evaluate(
    signal: &TradeSignal,
    candles: &[Candle],
    forward_limit: Option<usize>,
) -> TradeStatus {
    let Some(entry_index) = nearest_index(candles, signal.entry_timestamp) else {
        return TradeStatus::NoData;
    };

    let future = &candles[entry_index + 1..];
    if future.is_empty() {
        return TradeStatus::NoData;
    }

    let future = match forward_limit {
        Some(cap) => &future[..future.len().min(cap)],
        None => future,
    };

    first_touch(future, signal.target, signal.stop_loss)
}
