//! MACD line and signal line computation.
//!
//! Uses the non-adjusted exponential moving average convention: the first
//! observation seeds the average and weights are applied iteratively, never
//! reweighted retroactively. Every value therefore depends on the full
//! historical prefix, which is why the indicator series is recomputed from
//! the complete price history on each run instead of being extended from a
//! persisted partial state.

use crate::{PriceSeries, ValidationError};

/// EMA spans for the MACD computation. Defaults to the conventional 12/26/9.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacdParams {
    fast_span: usize,
    slow_span: usize,
    signal_span: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast_span: 12,
            slow_span: 26,
            signal_span: 9,
        }
    }
}

impl MacdParams {
    pub fn new(fast_span: usize, slow_span: usize, signal_span: usize) -> Result<Self, ValidationError> {
        if fast_span == 0 || slow_span == 0 || signal_span == 0 {
            return Err(ValidationError::InvalidSpan);
        }
        Ok(Self {
            fast_span,
            slow_span,
            signal_span,
        })
    }

    pub const fn fast_span(&self) -> usize {
        self.fast_span
    }

    pub const fn slow_span(&self) -> usize {
        self.slow_span
    }

    pub const fn signal_span(&self) -> usize {
        self.signal_span
    }

    /// Bars needed before the signal line is past its initialization
    /// artifacts. Shorter series still compute; their early values are
    /// low-confidence.
    pub fn min_bars(&self) -> usize {
        self.fast_span.max(self.slow_span).max(self.signal_span) + 1
    }
}

/// MACD output aligned 1:1 by position with the price series it was
/// computed from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IndicatorSeries {
    pub ema_fast: Vec<f64>,
    pub ema_slow: Vec<f64>,
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.macd.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macd.is_empty()
    }
}

/// Compute MACD and signal lines over the closing prices of `series`.
pub fn compute_macd(series: &PriceSeries, params: &MacdParams) -> IndicatorSeries {
    let closes = series.closes();
    let ema_fast = ema(&closes, params.fast_span);
    let ema_slow = ema(&closes, params.slow_span);
    let macd: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(fast, slow)| fast - slow)
        .collect();
    let signal = ema(&macd, params.signal_span);

    IndicatorSeries {
        ema_fast,
        ema_slow,
        macd,
        signal,
    }
}

/// Non-adjusted EMA: `ema[0] = values[0]`, then
/// `ema[i] = values[i] * k + ema[i-1] * (1 - k)` with `k = 2 / (span + 1)`.
fn ema(values: &[f64], span: usize) -> Vec<f64> {
    let k = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut prev = match values.first() {
        Some(first) => *first,
        None => return out,
    };
    out.push(prev);

    for &value in &values[1..] {
        prev = value * k + prev * (1.0 - k);
        out.push(prev);
    }

    out
}
