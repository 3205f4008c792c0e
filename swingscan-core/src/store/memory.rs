//! In-memory store — test substrate and single-process runs.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use super::{merged_for_upsert, SignalQuery, SignalStore, StoreError, UpsertOutcome};
use crate::domain::{SignalKey, TradeSignal, TradeStatus, WeeklySummary};

/// Mutex-guarded map keyed by (symbol, scan_date, strategy). The mutex
/// makes every upsert atomic per key under the parallel scan loop.
#[derive(Default)]
pub struct MemoryStore {
    signals: Mutex<BTreeMap<SignalKey, TradeSignal>>,
    summaries: Mutex<Vec<WeeklySummary>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SignalStore for MemoryStore {
    fn find_signals(&self, query: &SignalQuery) -> Result<Vec<TradeSignal>, StoreError> {
        let signals = self.signals.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(signals.values().filter(|s| query.matches(s)).cloned().collect())
    }

    fn upsert_signal(&self, signal: &TradeSignal) -> Result<UpsertOutcome, StoreError> {
        let mut signals = self.signals.lock().unwrap_or_else(PoisonError::into_inner);
        let key = signal.key();
        let existing = signals.get(&key);
        let outcome = if existing.is_some() {
            UpsertOutcome::Updated
        } else {
            UpsertOutcome::Inserted
        };
        let doc = merged_for_upsert(existing, signal);
        signals.insert(key, doc);
        Ok(outcome)
    }

    fn update_status(
        &self,
        key: &SignalKey,
        status: TradeStatus,
        evaluated_at: Option<DateTime<Utc>>,
    ) -> Result<bool, StoreError> {
        let mut signals = self.signals.lock().unwrap_or_else(PoisonError::into_inner);
        match signals.get_mut(key) {
            Some(signal) => {
                signal.status = status;
                signal.evaluated_at = evaluated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_signals(&self, query: &SignalQuery) -> Result<usize, StoreError> {
        let mut signals = self.signals.lock().unwrap_or_else(PoisonError::into_inner);
        let before = signals.len();
        signals.retain(|_, s| !query.matches(s));
        Ok(before - signals.len())
    }

    fn insert_summary(&self, summary: &WeeklySummary) -> Result<(), StoreError> {
        let mut summaries = self.summaries.lock().unwrap_or_else(PoisonError::into_inner);
        summaries.push(summary.clone());
        Ok(())
    }

    fn summaries(&self, strategy: Option<&str>) -> Result<Vec<WeeklySummary>, StoreError> {
        let summaries = self.summaries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(summaries
            .iter()
            .filter(|s| strategy.map_or(true, |name| s.strategy == name))
            .cloned()
            .collect())
    }
}
