//! SwingScan CLI — cron-driven scan, backtest, and maintenance commands.
//!
//! Commands:
//! - `scan` — evaluate the symbol universe and file matched signals
//! - `backtest` — resolve unresolved signals, then session cleanup
//! - `cleanup` — session-close cleanup on its own
//! - `summarize` — weekly win/loss rollup and purge
//! - `fetch` — dump one symbol's OHLC+EMA series as JSON
//!
//! Setup failures (unreadable config or universe, store directory) exit
//! non-zero; per-symbol failures are logged and never abort a batch.

use anyhow::Result;
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use swingscan_core::data::{
    CandleProvider, FetchRange, Interval, SyntheticProvider, Universe, YahooProvider,
};
use swingscan_core::series::ScanSeries;
use swingscan_core::store::JsonStore;
use swingscan_core::strategy::StrategyConfig;
use swingscan_jobs::{export, run_backtest, run_cleanup, run_scan, run_summarize, JobConfig};

#[derive(Parser)]
#[command(name = "swingscan", about = "Momentum + pullback setup scanner")]
struct Cli {
    /// Path to a job config TOML file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the universe CSV file.
    #[arg(long, global = true)]
    universe: Option<PathBuf>,

    /// Override the store directory.
    #[arg(long, global = true)]
    store_dir: Option<PathBuf>,

    /// Override the export directory.
    #[arg(long, global = true)]
    export_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the symbol universe and file matched signals.
    Scan {
        /// Strategy preset: 5m_momentum, 1m_momentum, daily_44ema.
        #[arg(long, default_value = "5m_momentum")]
        strategy: String,

        /// Use the deterministic synthetic candle source (no network).
        #[arg(long, default_value_t = false)]
        synthetic: bool,
    },
    /// Resolve unresolved signals against forward candles, then clean up
    /// the session if past the close.
    Backtest {
        #[arg(long, default_value = "5m_momentum")]
        strategy: String,
    },
    /// Discard today's unresolved signals once past the session close.
    Cleanup {
        #[arg(long, default_value = "5m_momentum")]
        strategy: String,
    },
    /// Weekly rollup: write one summary per strategy, purge the period.
    Summarize {
        /// Restrict to one strategy (default: every persisted preset).
        #[arg(long)]
        strategy: Option<String>,
    },
    /// Dump one symbol's OHLC+EMA series as JSON.
    Fetch {
        symbol: String,

        /// Candle interval: 1m, 5m or 1d.
        #[arg(long, default_value = "5m")]
        interval: Interval,

        /// Trailing days to fetch.
        #[arg(long, default_value_t = 7)]
        days: u32,

        /// Use the deterministic synthetic candle source (no network).
        #[arg(long, default_value_t = false)]
        synthetic: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let job = load_job_config(&cli)?;

    match &cli.command {
        Commands::Scan { strategy, synthetic } => cmd_scan(&job, strategy, *synthetic),
        Commands::Backtest { strategy } => cmd_backtest(&job, strategy),
        Commands::Cleanup { strategy } => cmd_cleanup(&job, strategy),
        Commands::Summarize { strategy } => cmd_summarize(&job, strategy.as_deref()),
        Commands::Fetch {
            symbol,
            interval,
            days,
            synthetic,
        } => cmd_fetch(&job, symbol, *interval, *days, *synthetic),
    }
}

fn load_job_config(cli: &Cli) -> Result<JobConfig> {
    let mut job = match &cli.config {
        Some(path) => JobConfig::from_file(path)?,
        None => JobConfig::default_local(PathBuf::from("universe.csv")),
    };
    if let Some(universe) = &cli.universe {
        job.universe_file = universe.clone();
    }
    if let Some(store_dir) = &cli.store_dir {
        job.store_dir = store_dir.clone();
    }
    if let Some(export_dir) = &cli.export_dir {
        job.export_dir = export_dir.clone();
    }
    Ok(job)
}

fn make_provider(synthetic: bool) -> Box<dyn CandleProvider> {
    if synthetic {
        Box::new(SyntheticProvider::default())
    } else {
        Box::new(YahooProvider::new())
    }
}

fn cmd_scan(job: &JobConfig, strategy: &str, synthetic: bool) -> Result<()> {
    let cfg = job.strategy(strategy)?;
    let universe = Universe::from_csv_file(&job.universe_file, &job.symbol_column)?;
    let store = JsonStore::open(&job.store_dir)?;
    let provider = make_provider(synthetic);

    let scan_date = Local::now().date_naive();
    let report = run_scan(job, &cfg, &universe, provider.as_ref(), &store, scan_date)?;

    println!(
        "Scan complete: {} matched, {} no data, {} failed out of {} symbols.",
        report.matched, report.no_data, report.failed, report.scanned
    );
    Ok(())
}

fn cmd_backtest(job: &JobConfig, strategy: &str) -> Result<()> {
    let cfg = job.strategy(strategy)?;
    let store = JsonStore::open(&job.store_dir)?;
    let provider = make_provider(false);

    let report = run_backtest(job, &cfg, provider.as_ref(), &store, Utc::now())?;
    println!(
        "Backtest complete: {} win, {} loss, {} no hit, {} no data ({} too recent).",
        report.wins, report.losses, report.no_hit, report.no_data, report.skipped_young
    );

    // The evening run doubles as the session sweep.
    let now = Local::now();
    let deleted = run_cleanup(&cfg, &store, now.date_naive(), now.time())?;
    if deleted > 0 {
        println!("Discarded {deleted} unresolved signal(s) after session close.");
    }
    Ok(())
}

fn cmd_cleanup(job: &JobConfig, strategy: &str) -> Result<()> {
    let cfg = job.strategy(strategy)?;
    let store = JsonStore::open(&job.store_dir)?;

    let now = Local::now();
    let deleted = run_cleanup(&cfg, &store, now.date_naive(), now.time())?;
    println!("Discarded {deleted} unresolved signal(s).");
    Ok(())
}

fn cmd_summarize(job: &JobConfig, strategy: Option<&str>) -> Result<()> {
    let store = JsonStore::open(&job.store_dir)?;
    let today = Local::now().date_naive();

    let names: Vec<String> = match strategy {
        Some(name) => vec![name.to_string()],
        None => StrategyConfig::preset_names()
            .iter()
            .map(|n| n.to_string())
            .collect(),
    };

    for name in names {
        let cfg = job.strategy(&name)?;
        if strategy.is_none() && !cfg.persist {
            continue; // export-only scans file nothing to roll up
        }
        match run_summarize(&cfg, &store, today, Utc::now())? {
            Some(summary) => println!(
                "{}: {} trades, {:.1}% win / {:.1}% loss.",
                name, summary.total_trades, summary.win_rate, summary.loss_rate
            ),
            None => println!("{name}: no trades to summarize."),
        }
    }
    Ok(())
}

fn cmd_fetch(
    job: &JobConfig,
    symbol: &str,
    interval: Interval,
    days: u32,
    synthetic: bool,
) -> Result<()> {
    let provider = make_provider(synthetic);
    let ticker = job.ticker(symbol);
    let candles = provider
        .as_ref()
        .fetch(&ticker, interval, FetchRange::Period { days })?;

    let span = match interval {
        Interval::OneMinute => 9,
        Interval::FiveMinute => 22,
        Interval::Daily => 44,
    };
    let series = ScanSeries::new(candles, span);

    let path = export::write_candle_dump(&job.export_dir, symbol, interval, &series)?;
    println!("Saved {} candles to {}", series.len(), path.display());
    Ok(())
}
