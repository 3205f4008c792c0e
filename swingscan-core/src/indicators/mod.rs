//! Indicator engine — exponential moving averages over close-price series.
//!
//! Every detector threshold in this crate is a comparison against an EMA
//! column, so the recursion here is the numeric substrate of the whole
//! pipeline: any deviation silently shifts every downstream verdict.

pub mod ema;

pub use ema::{ema, ema_of_candles};
