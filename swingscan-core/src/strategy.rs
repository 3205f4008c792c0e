//! Strategy configuration — named presets over the shared detector set.
//!
//! The scan scripts this replaces differed only in thresholds and detector
//! choice; here each variant is a preset of one parameterized config.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::data::Interval;
use crate::detect::{EmaSlopeRetest, GapUpRetest, MomentumWindow};
use crate::domain::round2;

/// Bracket percentages applied to the entry close: +1% target, -0.5% stop
/// by default — asymmetric on purpose, the stop is the tighter leg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub target_pct: f64,
    pub stop_pct: f64,
}

impl Default for Bracket {
    fn default() -> Self {
        Self {
            target_pct: 0.01,
            stop_pct: 0.005,
        }
    }
}

impl Bracket {
    /// (target, stop_loss) for an entry price, rounded to price precision.
    pub fn levels(&self, entry: f64) -> (f64, f64) {
        (
            round2(entry * (1.0 + self.target_pct)),
            round2(entry * (1.0 - self.stop_pct)),
        )
    }
}

/// Full configuration of one scan strategy.
///
/// Detectors are optional: a strategy runs every detector it carries and
/// OR-combines the verdicts. A strategy with no detectors at all matches on
/// EMA proximity alone (the daily pullback scan).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Strategy tag filed with every signal (e.g. "5m_momentum").
    pub name: String,
    pub interval: Interval,
    pub ema_span: usize,
    /// Max fractional distance from the EMA for the final proximity test.
    pub ema_percent: f64,
    /// Series shorter than this are skipped before any detector runs.
    pub min_history: usize,
    /// Latest close must sit on or above the EMA (daily pullback scan).
    #[serde(default)]
    pub require_close_above_ema: bool,
    /// Minimum elapsed minutes before a signal is backtest-eligible.
    pub min_age_minutes: i64,
    /// Cap on forward candles scanned per evaluation (None = all fetched).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forward_limit: Option<usize>,
    /// Local wall-clock boundary after which unresolved same-day signals
    /// are discarded.
    pub session_close: NaiveTime,
    /// Whether matches are filed in the trade store. Export-only scans
    /// (daily pullback list) skip persistence and the backtest phase.
    pub persist: bool,
    /// Trailing fetch window for a scan, in days.
    pub fetch_period_days: u32,
    #[serde(default)]
    pub bracket: Bracket,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub momentum: Option<MomentumWindow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap_up: Option<GapUpRetest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ema_slope: Option<EmaSlopeRetest>,
}

impl StrategyConfig {
    /// 5-minute momentum strategy: EMA22, all three detectors.
    pub fn momentum_5m() -> Self {
        let ema_percent = 0.0035;
        Self {
            name: "5m_momentum".into(),
            interval: Interval::FiveMinute,
            ema_span: 22,
            ema_percent,
            min_history: 60,
            momentum: Some(MomentumWindow::five_minute()),
            gap_up: Some(GapUpRetest::unconditional(0.03, ema_percent)),
            ema_slope: Some(EmaSlopeRetest::five_minute(ema_percent)),
            require_close_above_ema: false,
            bracket: Bracket::default(),
            min_age_minutes: 60,
            forward_limit: None,
            session_close: session_close_default(),
            persist: true,
            fetch_period_days: 60,
        }
    }

    /// 1-minute momentum strategy: EMA9, momentum detector only.
    pub fn momentum_1m() -> Self {
        Self {
            name: "1m_momentum".into(),
            interval: Interval::OneMinute,
            ema_span: 9,
            ema_percent: 0.005,
            min_history: 80,
            momentum: Some(MomentumWindow::one_minute()),
            gap_up: None,
            ema_slope: None,
            require_close_above_ema: false,
            bracket: Bracket::default(),
            min_age_minutes: 30,
            forward_limit: Some(39),
            session_close: session_close_default(),
            persist: true,
            fetch_period_days: 8,
        }
    }

    /// Daily 44-EMA pullback list: proximity-only, above trend, export-only.
    pub fn daily_44ema() -> Self {
        Self {
            name: "daily_44ema".into(),
            interval: Interval::Daily,
            ema_span: 44,
            ema_percent: 0.01,
            min_history: 50,
            momentum: None,
            gap_up: None,
            ema_slope: None,
            require_close_above_ema: true,
            bracket: Bracket::default(),
            min_age_minutes: 0,
            forward_limit: None,
            session_close: session_close_default(),
            persist: false,
            fetch_period_days: 120,
        }
    }

    /// Look up a preset by its strategy tag.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "5m_momentum" => Some(Self::momentum_5m()),
            "1m_momentum" => Some(Self::momentum_1m()),
            "daily_44ema" => Some(Self::daily_44ema()),
            _ => None,
        }
    }

    /// Names of all presets, scan-ready order.
    pub fn preset_names() -> [&'static str; 3] {
        ["5m_momentum", "1m_momentum", "daily_44ema"]
    }

    /// Cross-field checks applied after deserialization or overrides.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("strategy name must not be empty".into());
        }
        if self.ema_span == 0 {
            return Err("ema_span must be >= 1".into());
        }
        if !(0.0..1.0).contains(&self.ema_percent) {
            return Err(format!("ema_percent out of range: {}", self.ema_percent));
        }
        if let Some(momentum) = &self.momentum {
            if self.min_history < momentum.momentum_length * 2 {
                return Err(format!(
                    "min_history {} is below twice the momentum window {}",
                    self.min_history, momentum.momentum_length
                ));
            }
        }
        Ok(())
    }
}

fn session_close_default() -> NaiveTime {
    NaiveTime::from_hms_opt(15, 30, 0).expect("valid constant time")
}
