//! Pattern detectors.
//!
//! Each detector is a pure function of a bounded trailing window of the
//! merged OHLC+EMA series, parameterized by a config struct with named
//! presets. A window that cannot be formed contributes `false`, never an
//! error — a symbol's other detectors always get their turn.

pub mod ema_slope;
pub mod gap_up;
pub mod momentum;

pub use ema_slope::{has_rising_streak, EmaSlopeRetest};
pub use gap_up::{GapMode, GapUpRetest};
pub use momentum::MomentumWindow;

/// EMA proximity test: the close sits within `ema_percent` (fractional) of
/// the EMA, measured relative to the close.
pub fn near_ema(close: f64, ema: f64, ema_percent: f64) -> bool {
    close > 0.0 && ((close - ema) / close).abs() < ema_percent
}
