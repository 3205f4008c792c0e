//! Weekly aggregation record.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One win/loss aggregation per (strategy, week). Append-only: written once
/// by the weekly summarization run, never mutated afterwards.
///
/// Rates are percentages over resolved trades only; `total_trades` still
/// counts every signal filed in the period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySummary {
    pub strategy: String,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub total_trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub loss_rate: f64,
    pub created_at: DateTime<Utc>,
}
