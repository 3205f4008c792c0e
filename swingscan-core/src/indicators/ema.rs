//! Exponential Moving Average (EMA).
//!
//! Recursive: ema[0] = close[0]; ema[i] = k * close[i] + (1 - k) * ema[i-1],
//! with k = 2/(span+1). Seeded from the first close, so ema[i] depends only
//! on close[0..=i] — no look-ahead, no warmup gap.

use crate::domain::Candle;

/// Compute the EMA of a close-price series for one span.
///
/// Empty input yields empty output. Each span is an independent pass over
/// the same input; tracking several spans means calling this once per span.
pub fn ema(closes: &[f64], span: usize) -> Vec<f64> {
    assert!(span >= 1, "EMA span must be >= 1");

    let k = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(closes.len());
    let mut prev = 0.0;

    for (i, &close) in closes.iter().enumerate() {
        let value = if i == 0 {
            close
        } else {
            k * close + (1.0 - k) * prev
        };
        out.push(value);
        prev = value;
    }

    out
}

/// EMA over candle closes.
pub fn ema_of_candles(candles: &[Candle], span: usize) -> Vec<f64> {
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    ema(&closes, span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn first_value_equals_first_close() {
        let result = ema(&[42.5, 43.0, 41.0], 9);
        assert_eq!(result[0], 42.5);
    }

    #[test]
    fn constant_input_is_fixed_point() {
        let closes = vec![100.0; 50];
        for value in ema(&closes, 22) {
            assert!((value - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn span_1_equals_input() {
        let closes = [10.0, 20.0, 15.0];
        assert_eq!(ema(&closes, 1), closes.to_vec());
    }

    #[test]
    fn known_values_span_3() {
        // k = 2/(3+1) = 0.5
        // ema[0] = 10
        // ema[1] = 0.5*12 + 0.5*10 = 11
        // ema[2] = 0.5*14 + 0.5*11 = 12.5
        let result = ema(&[10.0, 12.0, 14.0], 3);
        assert_eq!(result, vec![10.0, 11.0, 12.5]);
    }

    #[test]
    fn shorter_span_reacts_faster_to_step() {
        // Flat at 100, then a step up to 110.
        let mut closes = vec![100.0; 20];
        closes.extend(vec![110.0; 5]);

        let fast = ema(&closes, 9);
        let slow = ema(&closes, 22);

        let last = closes.len() - 1;
        assert!(
            fast[last] > slow[last],
            "fast EMA should track the step more closely: {} vs {}",
            fast[last],
            slow[last]
        );
    }

    #[test]
    fn empty_input_empty_output() {
        assert!(ema(&[], 22).is_empty());
    }

    proptest! {
        #[test]
        fn output_aligned_and_bounded(
            closes in proptest::collection::vec(1.0f64..10_000.0, 0..200),
            span in 1usize..60,
        ) {
            let result = ema(&closes, span);
            prop_assert_eq!(result.len(), closes.len());

            // Each value is a convex combination of the closes seen so far.
            let mut lo = f64::INFINITY;
            let mut hi = f64::NEG_INFINITY;
            for (i, &close) in closes.iter().enumerate() {
                lo = lo.min(close);
                hi = hi.max(close);
                prop_assert!(result[i] >= lo - 1e-9 && result[i] <= hi + 1e-9);
            }
        }
    }
}
