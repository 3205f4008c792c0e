//! Scan job — evaluate the symbol universe and file matched signals.

use anyhow::Result;
use chrono::NaiveDate;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use swingscan_core::data::{CandleProvider, FetchRange, Universe};
use swingscan_core::scan::evaluate_symbol;
use swingscan_core::series::ScanSeries;
use swingscan_core::store::{SignalStore, StoreError};
use swingscan_core::strategy::StrategyConfig;

use crate::config::JobConfig;
use crate::export::{self, ScanMatch};

/// Tallies of one scan batch.
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub strategy: String,
    pub scanned: usize,
    pub matched: usize,
    pub no_data: usize,
    pub failed: usize,
    pub matches: Vec<ScanMatch>,
}

enum SymbolOutcome {
    Matched(ScanMatch),
    NoMatch,
    NoData,
    FetchFailed,
    StoreFailed(StoreError),
}

/// Run one scan batch: fetch, detect, and upsert per symbol in parallel.
///
/// Per-symbol fetch failures are logged with the symbol and never abort
/// the batch; a store failure does — the store is the one collaborator the
/// pipeline cannot run without. The matched-signal artifact is written to
/// the export directory on every run, matched or not.
pub fn run_scan(
    job: &JobConfig,
    cfg: &StrategyConfig,
    universe: &Universe,
    provider: &dyn CandleProvider,
    store: &dyn SignalStore,
    scan_date: NaiveDate,
) -> Result<ScanReport> {
    info!(
        strategy = %cfg.name,
        symbols = universe.len(),
        interval = %cfg.interval,
        "starting scan"
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(job.workers)
        .build()?;

    let outcomes: Vec<SymbolOutcome> = pool.install(|| {
        universe
            .symbols()
            .par_iter()
            .map(|symbol| scan_symbol(job, cfg, provider, store, symbol, scan_date))
            .collect()
    });

    let mut report = ScanReport {
        strategy: cfg.name.clone(),
        scanned: universe.len(),
        matched: 0,
        no_data: 0,
        failed: 0,
        matches: Vec::new(),
    };

    for outcome in outcomes {
        match outcome {
            SymbolOutcome::Matched(row) => {
                report.matched += 1;
                report.matches.push(row);
            }
            SymbolOutcome::NoMatch => {}
            SymbolOutcome::NoData => report.no_data += 1,
            SymbolOutcome::FetchFailed => report.failed += 1,
            SymbolOutcome::StoreFailed(e) => return Err(e.into()),
        }
    }

    // Parallel completion order is nondeterministic; the artifact is not.
    report.matches.sort_by(|a, b| a.symbol.cmp(&b.symbol));
    export::write_matches(&job.export_dir, &cfg.name, &report.matches)?;

    info!(
        strategy = %cfg.name,
        matched = report.matched,
        no_data = report.no_data,
        failed = report.failed,
        "scan complete"
    );
    Ok(report)
}

fn scan_symbol(
    job: &JobConfig,
    cfg: &StrategyConfig,
    provider: &dyn CandleProvider,
    store: &dyn SignalStore,
    symbol: &str,
    scan_date: NaiveDate,
) -> SymbolOutcome {
    let ticker = job.ticker(symbol);
    let range = FetchRange::Period {
        days: cfg.fetch_period_days,
    };

    let candles = match provider.fetch(&ticker, cfg.interval, range) {
        Ok(candles) => candles,
        Err(e) => {
            warn!(symbol, error = %e, "candle fetch failed");
            return SymbolOutcome::FetchFailed;
        }
    };
    if candles.is_empty() {
        debug!(symbol, "no candle data, skipping");
        return SymbolOutcome::NoData;
    }

    let series = ScanSeries::new(candles, cfg.ema_span);
    let Some(signal) = evaluate_symbol(symbol, &series, cfg, scan_date) else {
        return SymbolOutcome::NoMatch;
    };

    if cfg.persist {
        if let Err(e) = store.upsert_signal(&signal) {
            return SymbolOutcome::StoreFailed(e);
        }
    }

    info!(symbol, close = signal.entry_close, "setup matched");
    SymbolOutcome::Matched(ScanMatch::from(&signal))
}
