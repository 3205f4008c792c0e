//! Trade store — capability trait over the signal collection.
//!
//! The store is the pipeline's only shared mutable resource. Handles are
//! constructed explicitly and passed into each batch run; upserts are
//! atomic per (symbol, scan_date, strategy) key.

pub mod json_file;
pub mod memory;

pub use json_file::JsonStore;
pub use memory::MemoryStore;

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use crate::domain::{SignalKey, TradeSignal, TradeStatus, WeeklySummary};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("store serialization: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Filter over stored signals, mirroring the key lookups jobs run:
/// `{symbol, scan_date, strategy}` and `{strategy, status-set, scan_date}`.
/// Empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalQuery {
    pub strategy: Option<String>,
    pub statuses: Option<Vec<TradeStatus>>,
    pub scan_date: Option<NaiveDate>,
    /// Inclusive date range.
    pub scan_date_range: Option<(NaiveDate, NaiveDate)>,
}

impl SignalQuery {
    pub fn strategy(name: &str) -> Self {
        Self {
            strategy: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = TradeStatus>) -> Self {
        self.statuses = Some(statuses.into_iter().collect());
        self
    }

    pub fn with_scan_date(mut self, date: NaiveDate) -> Self {
        self.scan_date = Some(date);
        self
    }

    pub fn with_date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.scan_date_range = Some((start, end));
        self
    }

    pub fn matches(&self, signal: &TradeSignal) -> bool {
        if let Some(strategy) = &self.strategy {
            if signal.strategy != *strategy {
                return false;
            }
        }
        if let Some(statuses) = &self.statuses {
            if !statuses.contains(&signal.status) {
                return false;
            }
        }
        if let Some(date) = self.scan_date {
            if signal.scan_date != date {
                return false;
            }
        }
        if let Some((start, end)) = self.scan_date_range {
            if signal.scan_date < start || signal.scan_date > end {
                return false;
            }
        }
        true
    }
}

/// Outcome of an upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Capability trait over the signal and summary collections.
pub trait SignalStore: Send + Sync {
    fn find_signals(&self, query: &SignalQuery) -> Result<Vec<TradeSignal>, StoreError>;

    /// Insert or update by (symbol, scan_date, strategy).
    ///
    /// An existing record's non-pending status (and evaluation stamp)
    /// survives the rewrite: a re-scan never reverts an evaluated signal
    /// back to pending.
    fn upsert_signal(&self, signal: &TradeSignal) -> Result<UpsertOutcome, StoreError>;

    /// Set the status of one signal. Returns false when the key is absent.
    fn update_status(
        &self,
        key: &SignalKey,
        status: TradeStatus,
        evaluated_at: Option<DateTime<Utc>>,
    ) -> Result<bool, StoreError>;

    /// Delete every signal the query matches; returns the deleted count.
    fn delete_signals(&self, query: &SignalQuery) -> Result<usize, StoreError>;

    fn insert_summary(&self, summary: &WeeklySummary) -> Result<(), StoreError>;

    /// Stored summaries, optionally restricted to one strategy.
    fn summaries(&self, strategy: Option<&str>) -> Result<Vec<WeeklySummary>, StoreError>;
}

/// The status-preserving merge both backends apply on upsert.
pub(crate) fn merged_for_upsert(
    existing: Option<&TradeSignal>,
    incoming: &TradeSignal,
) -> TradeSignal {
    let mut doc = incoming.clone();
    if let Some(prev) = existing {
        if prev.status != TradeStatus::Pending {
            doc.status = prev.status;
            doc.evaluated_at = prev.evaluated_at;
        }
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn signal(strategy: &str, day: u32, status: TradeStatus) -> TradeSignal {
        TradeSignal {
            symbol: "RELIANCE".into(),
            strategy: strategy.into(),
            scan_date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            entry_timestamp: Utc.with_ymd_and_hms(2024, 1, day, 10, 0, 0).unwrap(),
            entry_close: 100.0,
            entry_ema: 100.1,
            target: 101.0,
            stop_loss: 99.5,
            volume: 1_000,
            status,
            evaluated_at: None,
        }
    }

    #[test]
    fn empty_query_matches_everything() {
        let query = SignalQuery::default();
        assert!(query.matches(&signal("5m_momentum", 2, TradeStatus::Pending)));
    }

    #[test]
    fn query_filters_compose() {
        let query = SignalQuery::strategy("5m_momentum")
            .with_statuses([TradeStatus::Pending, TradeStatus::NoHit])
            .with_scan_date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());

        assert!(query.matches(&signal("5m_momentum", 2, TradeStatus::Pending)));
        assert!(!query.matches(&signal("1m_momentum", 2, TradeStatus::Pending)));
        assert!(!query.matches(&signal("5m_momentum", 2, TradeStatus::Win)));
        assert!(!query.matches(&signal("5m_momentum", 3, TradeStatus::Pending)));
    }

    #[test]
    fn date_range_is_inclusive() {
        let query = SignalQuery::strategy("5m_momentum").with_date_range(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        );
        assert!(query.matches(&signal("5m_momentum", 1, TradeStatus::Win)));
        assert!(query.matches(&signal("5m_momentum", 5, TradeStatus::Win)));
        assert!(!query.matches(&signal("5m_momentum", 6, TradeStatus::Win)));
    }

    #[test]
    fn merge_preserves_evaluated_status() {
        let existing = signal("5m_momentum", 2, TradeStatus::Win);
        let incoming = signal("5m_momentum", 2, TradeStatus::Pending);
        let merged = merged_for_upsert(Some(&existing), &incoming);
        assert_eq!(merged.status, TradeStatus::Win);
    }

    #[test]
    fn merge_overwrites_pending() {
        let mut existing = signal("5m_momentum", 2, TradeStatus::Pending);
        existing.entry_close = 90.0;
        let incoming = signal("5m_momentum", 2, TradeStatus::Pending);
        let merged = merged_for_upsert(Some(&existing), &incoming);
        assert_eq!(merged.entry_close, 100.0);
        assert_eq!(merged.status, TradeStatus::Pending);
    }
}
