//! Signal generation — detector verdicts plus the final EMA-proximity test.

use chrono::NaiveDate;

use crate::detect::near_ema;
use crate::domain::{round2, TradeSignal, TradeStatus};
use crate::series::ScanSeries;
use crate::strategy::StrategyConfig;

/// Evaluate one symbol's merged series against a strategy.
///
/// Returns `None` when the series is shorter than the strategy's minimum
/// history (skipped silently, per the error taxonomy) or when no setup is
/// present. The strategy's detectors are OR-combined — any single true
/// verdict counts — and a match additionally requires the latest close to
/// sit near the latest EMA. A strategy carrying no detectors matches on
/// proximity alone.
///
/// The returned signal has status `pending`; whether it is persisted is the
/// caller's decision (export-only strategies collect matches without filing
/// them).
pub fn evaluate_symbol(
    symbol: &str,
    series: &ScanSeries,
    cfg: &StrategyConfig,
    scan_date: NaiveDate,
) -> Option<TradeSignal> {
    if series.len() < cfg.min_history {
        return None;
    }
    let last = series.last_candle()?;
    let last_ema = series.last_ema()?;

    let has_detectors =
        cfg.momentum.is_some() || cfg.gap_up.is_some() || cfg.ema_slope.is_some();
    let detector_hit = !has_detectors
        || cfg.momentum.as_ref().is_some_and(|d| d.matches(series))
        || cfg.gap_up.as_ref().is_some_and(|d| d.matches(series))
        || cfg.ema_slope.as_ref().is_some_and(|d| d.matches(series));

    if !detector_hit {
        return None;
    }
    if !near_ema(last.close, last_ema, cfg.ema_percent) {
        return None;
    }
    if cfg.require_close_above_ema && last.close < last_ema {
        return None;
    }

    let (target, stop_loss) = cfg.bracket.levels(last.close);
    Some(TradeSignal {
        symbol: symbol.to_string(),
        strategy: cfg.name.clone(),
        scan_date,
        entry_timestamp: last.timestamp,
        entry_close: round2(last.close),
        entry_ema: round2(last_ema),
        target,
        stop_loss,
        volume: last.volume,
        status: TradeStatus::Pending,
        evaluated_at: None,
    })
}
