//! Batch jobs — the scheduled entry points of the scanner.
//!
//! Each job is a plain function over explicitly passed collaborators
//! (candle provider, signal store, universe) and runs to completion before
//! the process exits; cron owns the cadence. Per-symbol failures are
//! isolated and logged, persistence failures abort the batch.

pub mod backtest;
pub mod config;
pub mod export;
pub mod maintenance;
pub mod scan;

pub use backtest::{run_backtest, BacktestReport};
pub use config::JobConfig;
pub use export::ScanMatch;
pub use maintenance::{run_cleanup, run_summarize};
pub use scan::{run_scan, ScanReport};
