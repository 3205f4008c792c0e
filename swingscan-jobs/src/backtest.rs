//! Backtest job — resolve unresolved signals against forward candles.

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use swingscan_core::backtest::{evaluate, is_eligible, EvalParams};
use swingscan_core::data::{CandleProvider, FetchRange};
use swingscan_core::domain::TradeStatus;
use swingscan_core::lifecycle::UNRESOLVED;
use swingscan_core::store::{SignalQuery, SignalStore};
use swingscan_core::strategy::StrategyConfig;

use crate::config::JobConfig;

/// Tallies of one backtest batch.
#[derive(Debug, Clone, Default)]
pub struct BacktestReport {
    pub strategy: String,
    pub examined: usize,
    pub skipped_young: usize,
    pub wins: usize,
    pub losses: usize,
    pub no_hit: usize,
    pub no_data: usize,
}

/// Evaluate every unresolved signal of a strategy.
///
/// `pending`, `no_hit` and `no_data` signals are all re-examined; wins and
/// losses are terminal and never revisited. A forward-fetch failure files
/// the signal as `no_data` — a normal, retryable state, not an error.
pub fn run_backtest(
    job: &JobConfig,
    cfg: &StrategyConfig,
    provider: &dyn CandleProvider,
    store: &dyn SignalStore,
    now: DateTime<Utc>,
) -> Result<BacktestReport> {
    if !cfg.persist {
        bail!("strategy '{}' does not persist signals; nothing to backtest", cfg.name);
    }

    let unresolved = store.find_signals(
        &SignalQuery::strategy(&cfg.name).with_statuses(UNRESOLVED),
    )?;
    info!(strategy = %cfg.name, count = unresolved.len(), "unresolved signals to evaluate");

    let params = EvalParams::for_strategy(cfg);
    let mut report = BacktestReport {
        strategy: cfg.name.clone(),
        ..BacktestReport::default()
    };

    for signal in unresolved {
        if !is_eligible(&signal, now, params.min_age) {
            debug!(symbol = %signal.symbol, "entry too recent, skipping this cycle");
            report.skipped_young += 1;
            continue;
        }
        report.examined += 1;

        let range = FetchRange::Between {
            start: signal.entry_timestamp,
            end: signal.entry_timestamp + params.fetch_horizon,
        };
        let status = match provider.fetch(&job.ticker(&signal.symbol), cfg.interval, range) {
            Ok(candles) => evaluate(&signal, &candles, params.forward_limit),
            Err(e) => {
                warn!(symbol = %signal.symbol, error = %e, "forward fetch failed");
                TradeStatus::NoData
            }
        };

        store.update_status(&signal.key(), status, Some(now))?;
        info!(symbol = %signal.symbol, status = status.as_str(), "signal evaluated");

        match status {
            TradeStatus::Win => report.wins += 1,
            TradeStatus::Loss => report.losses += 1,
            TradeStatus::NoHit => report.no_hit += 1,
            TradeStatus::NoData => report.no_data += 1,
            TradeStatus::Pending => {}
        }
    }

    info!(
        strategy = %cfg.name,
        examined = report.examined,
        wins = report.wins,
        losses = report.losses,
        no_hit = report.no_hit,
        no_data = report.no_data,
        "backtest complete"
    );
    Ok(report)
}
