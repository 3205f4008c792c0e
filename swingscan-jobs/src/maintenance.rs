//! Maintenance jobs — session-close cleanup and weekly summarization.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tracing::info;

use swingscan_core::domain::WeeklySummary;
use swingscan_core::lifecycle::{session_cleanup, summarize_week};
use swingscan_core::store::SignalStore;
use swingscan_core::strategy::StrategyConfig;

/// Discard today's still-unresolved signals once past the session close.
pub fn run_cleanup(
    cfg: &StrategyConfig,
    store: &dyn SignalStore,
    today: NaiveDate,
    now: NaiveTime,
) -> Result<usize> {
    let deleted = session_cleanup(store, &cfg.name, today, now, cfg.session_close)?;
    if deleted > 0 {
        info!(strategy = %cfg.name, deleted, "discarded unresolved signals after session close");
    } else {
        info!(strategy = %cfg.name, "nothing to clean up");
    }
    Ok(deleted)
}

/// Roll the current week's signals into a summary and purge them.
pub fn run_summarize(
    cfg: &StrategyConfig,
    store: &dyn SignalStore,
    today: NaiveDate,
    created_at: DateTime<Utc>,
) -> Result<Option<WeeklySummary>> {
    let summary = summarize_week(store, &cfg.name, today, created_at)?;
    match &summary {
        Some(s) => info!(
            strategy = %cfg.name,
            total = s.total_trades,
            win_rate = s.win_rate,
            "weekly summary saved"
        ),
        None => info!(strategy = %cfg.name, "no trades to summarize this week"),
    }
    Ok(summary)
}
