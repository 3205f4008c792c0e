//! Trade signals and their lifecycle status.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a trade signal.
///
/// `pending`, `no_hit`, and `no_data` are re-evaluated on every backtest
/// run until resolved or purged; `win` and `loss` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeStatus {
    Pending,
    Win,
    Loss,
    NoHit,
    NoData,
}

impl TradeStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Win | Self::Loss)
    }

    pub fn is_unresolved(self) -> bool {
        !self.is_terminal()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Win => "win",
            Self::Loss => "loss",
            Self::NoHit => "no_hit",
            Self::NoData => "no_data",
        }
    }
}

/// Uniqueness key for a signal: one per symbol, per scan date, per strategy.
///
/// Re-scanning the same symbol on the same day updates the existing record
/// instead of inserting a second one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SignalKey {
    pub symbol: String,
    pub scan_date: NaiveDate,
    pub strategy: String,
}

/// A momentum + pullback trade signal with its fixed bracket.
///
/// Created by the signal generator with status `pending`; resolved by the
/// backtest evaluator; discarded by session cleanup or the weekly purge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSignal {
    pub symbol: String,
    pub strategy: String,
    pub scan_date: NaiveDate,
    pub entry_timestamp: DateTime<Utc>,
    pub entry_close: f64,
    pub entry_ema: f64,
    pub target: f64,
    pub stop_loss: f64,
    pub volume: u64,
    pub status: TradeStatus,
    /// Stamped by the backtest evaluator on each resolution write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluated_at: Option<DateTime<Utc>>,
}

impl TradeSignal {
    pub fn key(&self) -> SignalKey {
        SignalKey {
            symbol: self.symbol.clone(),
            scan_date: self.scan_date,
            strategy: self.strategy.clone(),
        }
    }
}
