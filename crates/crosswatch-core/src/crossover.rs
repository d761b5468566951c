//! Detection of the most recent MACD/signal-line crossover.

use crate::{Direction, IndicatorSeries};

/// Most recent sign change of `macd - signal`, located by index into the
/// indicator (and therefore price) series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossover {
    pub direction: Direction,
    pub index: usize,
}

/// Scan backward from the newest bar for the most recent crossover.
///
/// For each pair of consecutive indices `(i - 1, i)`, strictly
/// `macd < signal` before and strictly `macd > signal` after is a bullish
/// crossover at `i`; the mirrored comparison is bearish. Equality at either
/// index is not a transition: the pair is skipped and the scan continues,
/// so bars sitting exactly on the signal line never produce an event by
/// themselves.
pub fn last_crossover(indicators: &IndicatorSeries) -> Option<Crossover> {
    let macd = &indicators.macd;
    let signal = &indicators.signal;
    debug_assert_eq!(macd.len(), signal.len());

    for i in (1..macd.len().min(signal.len())).rev() {
        let was_below = macd[i - 1] < signal[i - 1];
        let was_above = macd[i - 1] > signal[i - 1];

        if was_below && macd[i] > signal[i] {
            return Some(Crossover {
                direction: Direction::Bullish,
                index: i,
            });
        }
        if was_above && macd[i] < signal[i] {
            return Some(Crossover {
                direction: Direction::Bearish,
                index: i,
            });
        }
    }

    None
}
