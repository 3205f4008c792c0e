//! Lifecycle management — session-close cleanup and weekly summarization.
//!
//! Two independent, schedule-driven triggers: once local time passes the
//! session close, the day's still-unresolved signals are discarded rather
//! than carried to the next day; once a week, each strategy's signals are
//! rolled into an append-only summary and purged (archive-then-purge, not
//! a rolling window).

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};

use crate::domain::{round2, TradeStatus, WeeklySummary};
use crate::store::{SignalQuery, SignalStore, StoreError};

/// Statuses that count as unresolved for cleanup and re-evaluation.
pub const UNRESOLVED: [TradeStatus; 3] =
    [TradeStatus::Pending, TradeStatus::NoHit, TradeStatus::NoData];

/// Delete today's unresolved signals once local time has passed the
/// session-close boundary. Signals filed under earlier dates are never
/// touched here — the weekly purge owns those.
///
/// Returns the deleted count (0 when the market is still open).
pub fn session_cleanup(
    store: &dyn SignalStore,
    strategy: &str,
    today: NaiveDate,
    now: NaiveTime,
    session_close: NaiveTime,
) -> Result<usize, StoreError> {
    if now < session_close {
        return Ok(0);
    }

    store.delete_signals(
        &SignalQuery::strategy(strategy)
            .with_statuses(UNRESOLVED)
            .with_scan_date(today),
    )
}

/// Monday..Friday bounds of the trading week containing `date`.
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
    (monday, monday + Duration::days(4))
}

/// Aggregate one strategy's signals for the week containing `today`, write
/// one WeeklySummary, then purge the period's signals.
///
/// Win/loss rates are percentages over resolved trades only (wins+losses);
/// an all-unresolved week records 0.0 for both while `total_trades` still
/// counts every signal. A week with no signals writes nothing and returns
/// `None`.
pub fn summarize_week(
    store: &dyn SignalStore,
    strategy: &str,
    today: NaiveDate,
    created_at: DateTime<Utc>,
) -> Result<Option<WeeklySummary>, StoreError> {
    let (week_start, week_end) = week_bounds(today);
    let query = SignalQuery::strategy(strategy).with_date_range(week_start, week_end);

    let trades = store.find_signals(&query)?;
    if trades.is_empty() {
        return Ok(None);
    }

    let wins = trades.iter().filter(|t| t.status == TradeStatus::Win).count();
    let losses = trades.iter().filter(|t| t.status == TradeStatus::Loss).count();
    let resolved = wins + losses;

    let (win_rate, loss_rate) = if resolved == 0 {
        (0.0, 0.0)
    } else {
        (
            round2(wins as f64 / resolved as f64 * 100.0),
            round2(losses as f64 / resolved as f64 * 100.0),
        )
    };

    let summary = WeeklySummary {
        strategy: strategy.to_string(),
        week_start,
        week_end,
        total_trades: trades.len(),
        wins,
        losses,
        win_rate,
        loss_rate,
        created_at,
    };

    store.insert_summary(&summary)?;
    store.delete_signals(&query)?;

    Ok(Some(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TradeSignal;
    use crate::store::MemoryStore;
    use chrono::TimeZone;

    fn signal(symbol: &str, day: u32, status: TradeStatus) -> TradeSignal {
        TradeSignal {
            symbol: symbol.into(),
            strategy: "5m_momentum".into(),
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

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn cleanup_waits_for_the_close() {
        let store = MemoryStore::new();
        store.upsert_signal(&signal("RELIANCE", 2, TradeStatus::Pending)).unwrap();

        let today = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let deleted =
            session_cleanup(&store, "5m_momentum", today, time(14, 0), time(15, 30)).unwrap();
        assert_eq!(deleted, 0);
        assert_eq!(store.find_signals(&SignalQuery::default()).unwrap().len(), 1);
    }

    #[test]
    fn cleanup_discards_todays_unresolved_only() {
        let store = MemoryStore::new();
        // Today: one of each unresolved status plus a win.
        store.upsert_signal(&signal("RELIANCE", 2, TradeStatus::Pending)).unwrap();
        store.upsert_signal(&signal("TCS", 2, TradeStatus::NoHit)).unwrap();
        store.upsert_signal(&signal("INFY", 2, TradeStatus::NoData)).unwrap();
        store.upsert_signal(&signal("HDFCBANK", 2, TradeStatus::Win)).unwrap();
        // A prior day's pending signal stays.
        store.upsert_signal(&signal("SBIN", 1, TradeStatus::Pending)).unwrap();

        let today = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let deleted =
            session_cleanup(&store, "5m_momentum", today, time(15, 30), time(15, 30)).unwrap();
        assert_eq!(deleted, 3);

        let remaining = store.find_signals(&SignalQuery::default()).unwrap();
        let symbols: Vec<&str> = remaining.iter().map(|s| s.symbol.as_str()).collect();
        assert!(symbols.contains(&"HDFCBANK"));
        assert!(symbols.contains(&"SBIN"));
        assert_eq!(remaining.len(), 2);
    }

    #[test]
    fn week_bounds_monday_to_friday() {
        // 2024-01-03 is a Wednesday.
        let (start, end) = week_bounds(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());

        // A Monday is its own week start.
        let (start, _) = week_bounds(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn weekly_summary_archives_then_purges() {
        let store = MemoryStore::new();
        // 10 resolved signals across the week of Jan 1–5: 6 wins, 4 losses.
        for i in 0..6 {
            store
                .upsert_signal(&signal(&format!("W{i}"), 1 + (i % 5) as u32, TradeStatus::Win))
                .unwrap();
        }
        for i in 0..4 {
            store
                .upsert_signal(&signal(&format!("L{i}"), 1 + (i % 5) as u32, TradeStatus::Loss))
                .unwrap();
        }

        let today = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let summary = summarize_week(&store, "5m_momentum", today, Utc::now())
            .unwrap()
            .unwrap();

        assert_eq!(summary.total_trades, 10);
        assert_eq!(summary.wins, 6);
        assert_eq!(summary.losses, 4);
        assert_eq!(summary.win_rate, 60.0);
        assert_eq!(summary.loss_rate, 40.0);

        // Period purged, exactly one summary on record.
        let week_query = SignalQuery::strategy("5m_momentum").with_date_range(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        );
        assert!(store.find_signals(&week_query).unwrap().is_empty());
        assert_eq!(store.summaries(Some("5m_momentum")).unwrap().len(), 1);
    }

    #[test]
    fn unresolved_only_week_has_zero_rates() {
        let store = MemoryStore::new();
        store.upsert_signal(&signal("RELIANCE", 2, TradeStatus::Pending)).unwrap();
        store.upsert_signal(&signal("TCS", 3, TradeStatus::NoHit)).unwrap();

        let today = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let summary = summarize_week(&store, "5m_momentum", today, Utc::now())
            .unwrap()
            .unwrap();
        assert_eq!(summary.total_trades, 2);
        assert_eq!(summary.win_rate, 0.0);
        assert_eq!(summary.loss_rate, 0.0);
    }

    #[test]
    fn empty_week_writes_nothing() {
        let store = MemoryStore::new();
        let today = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        assert!(summarize_week(&store, "5m_momentum", today, Utc::now())
            .unwrap()
            .is_none());
        assert!(store.summaries(None).unwrap().is_empty());
    }

    #[test]
    fn signals_outside_the_week_are_kept() {
        let store = MemoryStore::new();
        store.upsert_signal(&signal("RELIANCE", 3, TradeStatus::Win)).unwrap();
        store.upsert_signal(&signal("OLD", 8, TradeStatus::Win)).unwrap(); // next week

        let today = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        summarize_week(&store, "5m_momentum", today, Utc::now()).unwrap();

        let remaining = store.find_signals(&SignalQuery::default()).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].symbol, "OLD");
    }
}
