//! JSON-file store — persistence across separately scheduled job runs.
//!
//! The scan, backtest and maintenance jobs are independent processes driven
//! by an external scheduler, so signals live in `signals.json` inside the
//! store directory (atomic rewrite via temp-file rename) and summaries
//! append to `summaries.jsonl`, one JSON object per line — each line is
//! independent, so the format survives partial writes and streams cheaply.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::{merged_for_upsert, SignalQuery, SignalStore, StoreError, UpsertOutcome};
use crate::domain::{SignalKey, TradeSignal, TradeStatus, WeeklySummary};

const SIGNALS_FILE: &str = "signals.json";
const SUMMARIES_FILE: &str = "summaries.jsonl";

pub struct JsonStore {
    dir: PathBuf,
    signals: Mutex<BTreeMap<SignalKey, TradeSignal>>,
}

impl JsonStore {
    /// Open (or initialize) a store directory and load the signal file.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let path = dir.join(SIGNALS_FILE);
        let signals = if path.exists() {
            let content = fs::read_to_string(&path)?;
            let list: Vec<TradeSignal> = serde_json::from_str(&content)?;
            list.into_iter().map(|s| (s.key(), s)).collect()
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            dir,
            signals: Mutex::new(signals),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Rewrite the signal file atomically: write a sibling temp file, then
    /// rename over the original.
    fn save(&self, signals: &BTreeMap<SignalKey, TradeSignal>) -> Result<(), StoreError> {
        let list: Vec<&TradeSignal> = signals.values().collect();
        let json = serde_json::to_string_pretty(&list)?;

        let path = self.dir.join(SIGNALS_FILE);
        let tmp = self.dir.join(format!("{SIGNALS_FILE}.tmp"));
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

impl SignalStore for JsonStore {
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
        self.save(&signals)?;
        Ok(outcome)
    }

    fn update_status(
        &self,
        key: &SignalKey,
        status: TradeStatus,
        evaluated_at: Option<DateTime<Utc>>,
    ) -> Result<bool, StoreError> {
        let mut signals = self.signals.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(signal) = signals.get_mut(key) else {
            return Ok(false);
        };
        signal.status = status;
        signal.evaluated_at = evaluated_at;
        self.save(&signals)?;
        Ok(true)
    }

    fn delete_signals(&self, query: &SignalQuery) -> Result<usize, StoreError> {
        let mut signals = self.signals.lock().unwrap_or_else(PoisonError::into_inner);
        let before = signals.len();
        signals.retain(|_, s| !query.matches(s));
        let deleted = before - signals.len();
        if deleted > 0 {
            self.save(&signals)?;
        }
        Ok(deleted)
    }

    fn insert_summary(&self, summary: &WeeklySummary) -> Result<(), StoreError> {
        let json = serde_json::to_string(summary)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.dir.join(SUMMARIES_FILE))?;
        writeln!(file, "{json}")?;
        file.flush()?;
        Ok(())
    }

    fn summaries(&self, strategy: Option<&str>) -> Result<Vec<WeeklySummary>, StoreError> {
        let path = self.dir.join(SUMMARIES_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(fs::File::open(&path)?);
        let mut summaries = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<WeeklySummary>(&line) {
                Ok(summary) => {
                    if strategy.map_or(true, |name| summary.strategy == name) {
                        summaries.push(summary);
                    }
                }
                Err(_) => continue, // skip malformed lines
            }
        }
        Ok(summaries)
    }
}
