//! Job configuration loaded from TOML.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use swingscan_core::strategy::StrategyConfig;

/// Shared configuration for every scheduled job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    /// CSV file with the ticker universe.
    pub universe_file: PathBuf,

    /// Column holding the ticker symbols.
    #[serde(default = "default_symbol_column")]
    pub symbol_column: String,

    /// Suffix appended to each symbol at fetch time (e.g. ".NS").
    #[serde(default)]
    pub symbol_suffix: String,

    /// Directory for the JSON trade store.
    #[serde(default = "default_store_dir")]
    pub store_dir: PathBuf,

    /// Directory for exported artifacts.
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,

    /// Worker threads for the per-symbol scan loop.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Minutes added to candle timestamps when grouping into exchange-local
    /// sessions (330 for NSE).
    #[serde(default)]
    pub session_offset_minutes: i32,
}

fn default_symbol_column() -> String {
    swingscan_core::data::universe::DEFAULT_SYMBOL_COLUMN.to_string()
}

fn default_store_dir() -> PathBuf {
    PathBuf::from("store")
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("exports")
}

fn default_workers() -> usize {
    8
}

impl JobConfig {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("parse job config TOML")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read job config {}", path.display()))?;
        Self::from_toml(&content)
    }

    /// Defaults for running without a config file.
    pub fn default_local(universe_file: PathBuf) -> Self {
        Self {
            universe_file,
            symbol_column: default_symbol_column(),
            symbol_suffix: String::new(),
            store_dir: default_store_dir(),
            export_dir: default_export_dir(),
            workers: default_workers(),
            session_offset_minutes: 0,
        }
    }

    /// Resolve a strategy preset and apply job-level overrides.
    pub fn strategy(&self, name: &str) -> Result<StrategyConfig> {
        let mut cfg = StrategyConfig::preset(name).ok_or_else(|| {
            anyhow!(
                "unknown strategy '{name}' (valid: {})",
                StrategyConfig::preset_names().join(", ")
            )
        })?;

        if let Some(gap_up) = cfg.gap_up.as_mut() {
            gap_up.session_offset_minutes = self.session_offset_minutes;
        }

        cfg.validate().map_err(|e| anyhow!("invalid strategy config: {e}"))?;
        Ok(cfg)
    }

    /// The ticker handed to the candle source for a universe symbol.
    pub fn ticker(&self, symbol: &str) -> String {
        format!("{symbol}{}", self.symbol_suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_toml_fills_defaults() {
        let cfg = JobConfig::from_toml("universe_file = \"Nifty 500.csv\"\n").unwrap();
        assert_eq!(cfg.universe_file, PathBuf::from("Nifty 500.csv"));
        assert_eq!(cfg.symbol_column, "SYMBOL");
        assert_eq!(cfg.store_dir, PathBuf::from("store"));
        assert_eq!(cfg.workers, 8);
        assert_eq!(cfg.session_offset_minutes, 0);
    }

    #[test]
    fn full_toml_roundtrip() {
        let cfg = JobConfig {
            universe_file: "universe.csv".into(),
            symbol_column: "TICKER".into(),
            symbol_suffix: ".NS".into(),
            store_dir: "/var/lib/swingscan".into(),
            export_dir: "/tmp/exports".into(),
            workers: 4,
            session_offset_minutes: 330,
        };
        let text = toml::to_string(&cfg).unwrap();
        assert_eq!(JobConfig::from_toml(&text).unwrap(), cfg);
    }

    #[test]
    fn strategy_lookup_applies_session_offset() {
        let mut cfg = JobConfig::default_local("u.csv".into());
        cfg.session_offset_minutes = 330;

        let strategy = cfg.strategy("5m_momentum").unwrap();
        assert_eq!(strategy.gap_up.unwrap().session_offset_minutes, 330);

        assert!(cfg.strategy("10m_momentum").is_err());
    }

    #[test]
    fn ticker_suffix() {
        let mut cfg = JobConfig::default_local("u.csv".into());
        cfg.symbol_suffix = ".NS".into();
        assert_eq!(cfg.ticker("RELIANCE"), "RELIANCE.NS");
    }
}
