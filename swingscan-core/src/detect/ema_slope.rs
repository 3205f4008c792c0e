//! EMA-slope-retest detector — sustained rising EMA, then a pullback to it.

use serde::{Deserialize, Serialize};

use super::near_ema;
use crate::series::ScanSeries;

/// Consecutive steps rising by at least `min_step` (fractional change from
/// the prior value). A non-qualifying step resets the count to zero — no
/// partial credit. A step whose prior value is zero is skipped outright:
/// the streak neither advances nor resets.
pub fn has_rising_streak(values: &[f64], streak_required: usize, min_step: f64) -> bool {
    let mut streak = 0;
    for pair in values.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);
        if prev == 0.0 {
            continue;
        }
        if (curr - prev) / prev >= min_step {
            streak += 1;
            if streak >= streak_required {
                return true;
            }
        } else {
            streak = 0;
        }
    }
    false
}

/// Fires when the EMA rose steadily somewhere in an intermediate trailing
/// window and the latest close has come back near the latest EMA.
///
/// The slope window is `ema[len - slope_reach .. len - slope_skip)` — the
/// most recent candles are excluded so the rise must precede the pullback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmaSlopeRetest {
    pub streak_required: usize,
    pub min_step: f64,
    pub slope_reach: usize,
    pub slope_skip: usize,
    pub ema_percent: f64,
}

impl EmaSlopeRetest {
    pub fn new(
        streak_required: usize,
        min_step: f64,
        slope_reach: usize,
        slope_skip: usize,
        ema_percent: f64,
    ) -> Self {
        assert!(streak_required >= 1, "streak_required must be >= 1");
        assert!(slope_reach > slope_skip, "slope_reach must exceed slope_skip");
        Self {
            streak_required,
            min_step,
            slope_reach,
            slope_skip,
            ema_percent,
        }
    }

    /// 5-minute preset: five consecutive 0.1% steps inside `[len-60, len-10)`.
    pub fn five_minute(ema_percent: f64) -> Self {
        Self::new(5, 0.001, 60, 10, ema_percent)
    }

    pub fn matches(&self, series: &ScanSeries) -> bool {
        let n = series.len();
        if n <= self.slope_skip {
            return false;
        }

        let start = n.saturating_sub(self.slope_reach);
        let end = n - self.slope_skip;
        if !has_rising_streak(&series.ema()[start..end], self.streak_required, self.min_step) {
            return false;
        }

        match (series.last_candle(), series.last_ema()) {
            (Some(last), Some(last_ema)) => near_ema(last.close, last_ema, self.ema_percent),
            _ => false,
        }
    }
}
