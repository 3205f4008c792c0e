//! Gap-up-retest detector — session-open gap versus the prior session close.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::near_ema;
use crate::series::ScanSeries;

/// How a qualifying gap combines with the EMA-retest condition.
///
/// Both policies exist in the wild; the strategy configuration picks one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GapMode {
    /// A qualifying gap alone fires the detector.
    Unconditional,
    /// After a qualifying gap, some candle in the trailing sub-window
    /// `[len - reach, len - skip)` must additionally sit near the EMA.
    EmaRetest { reach: usize, skip: usize },
}

/// Detects a gap between yesterday's last close and today's first open.
///
/// Candles are grouped into calendar sessions by the date of
/// `timestamp + session_offset_minutes` (exchange-local days); at least two
/// distinct sessions must be present. The gap is
/// `(today_first_open - yesterday_last_close) / yesterday_last_close` and
/// must strictly exceed `gap_threshold`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapUpRetest {
    pub gap_threshold: f64,
    pub ema_percent: f64,
    /// Minutes added to candle timestamps before calendar grouping
    /// (e.g. 330 for an exchange at UTC+05:30).
    #[serde(default)]
    pub session_offset_minutes: i32,
    pub mode: GapMode,
}

impl GapUpRetest {
    /// Gap above 3% fires on its own.
    pub fn unconditional(gap_threshold: f64, ema_percent: f64) -> Self {
        Self {
            gap_threshold,
            ema_percent,
            session_offset_minutes: 0,
            mode: GapMode::Unconditional,
        }
    }

    /// Gap above 2% followed by an EMA retest in the `[len-60, len-45)`
    /// sub-window.
    pub fn with_retest(gap_threshold: f64, ema_percent: f64) -> Self {
        Self {
            gap_threshold,
            ema_percent,
            session_offset_minutes: 0,
            mode: GapMode::EmaRetest { reach: 60, skip: 45 },
        }
    }

    pub fn matches(&self, series: &ScanSeries) -> bool {
        let candles = series.candles();
        let Some(last) = candles.last() else {
            return false;
        };

        let offset = Duration::minutes(i64::from(self.session_offset_minutes));
        let session_of = |ts: chrono::DateTime<chrono::Utc>| (ts + offset).date_naive();

        // Walk back to the first candle of the latest session; the candle
        // before it closed the previous session.
        let today = session_of(last.timestamp);
        let mut first_today = candles.len() - 1;
        while first_today > 0 && session_of(candles[first_today - 1].timestamp) == today {
            first_today -= 1;
        }
        if first_today == 0 {
            return false; // fewer than two sessions present
        }

        let yesterday_close = candles[first_today - 1].close;
        let today_open = candles[first_today].open;
        if yesterday_close <= 0.0 {
            return false;
        }

        let gap = (today_open - yesterday_close) / yesterday_close;
        if gap <= self.gap_threshold {
            return false;
        }

        match self.mode {
            GapMode::Unconditional => true,
            GapMode::EmaRetest { reach, skip } => {
                let n = series.len();
                if n <= skip {
                    return false;
                }
                let start = n.saturating_sub(reach);
                let end = n - skip;
                candles[start..end]
                    .iter()
                    .zip(&series.ema()[start..end])
                    .any(|(c, &ema)| near_ema(c.close, ema, self.ema_percent))
            }
        }
    }
}
