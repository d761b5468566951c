use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{Symbol, TradeDate, ValidationError};

/// Direction of a MACD/signal-line crossover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Bullish,
    Bearish,
}

impl Direction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bullish => "bullish",
            Self::Bearish => "bearish",
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// OHLCV observation for one trading period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: TradeDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    pub fn new(
        date: TradeDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Result<Self, ValidationError> {
        let bar = Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        };
        bar.validate()?;
        Ok(bar)
    }

    /// Re-check the OHLC invariants. Deserialized bars bypass [`Bar::new`],
    /// so loaders run this before trusting a record.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_positive("open", self.open)?;
        validate_positive("high", self.high)?;
        validate_positive("low", self.low)?;
        validate_positive("close", self.close)?;
        Ok(())
    }
}

fn validate_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value <= 0.0 {
        return Err(ValidationError::NonPositiveValue { field });
    }
    Ok(())
}

/// Price history of one instrument: strictly ascending by date, no
/// duplicate dates.
///
/// Construction through [`PriceSeries::from_bars`] enforces the ordering
/// invariant; when the input carries the same date more than once, the bar
/// supplied last wins.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PriceSeries {
    bars: Vec<Bar>,
}

impl PriceSeries {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_bars(bars: Vec<Bar>) -> Self {
        let mut by_date = BTreeMap::new();
        for bar in bars {
            by_date.insert(bar.date, bar);
        }
        Self {
            bars: by_date.into_values().collect(),
        }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn into_bars(self) -> Vec<Bar> {
        self.bars
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.close).collect()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }
}

/// A crossover that occurred on the latest available bar of an instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossoverEvent {
    pub symbol: Symbol,
    pub direction: Direction,
    pub date: TradeDate,
    pub close: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(input: &str) -> TradeDate {
        TradeDate::parse(input).expect("test date must parse")
    }

    fn bar(day: &str, close: f64) -> Bar {
        Bar::new(date(day), close, close + 1.0, close - 1.0, close, 100).expect("test bar")
    }

    #[test]
    fn rejects_non_positive_close() {
        let err = Bar::new(date("2024-01-02"), 10.0, 11.0, 9.0, 0.0, 100).expect_err("must fail");
        assert!(matches!(err, ValidationError::NonPositiveValue { field: "close" }));
    }

    #[test]
    fn rejects_non_finite_open() {
        let err =
            Bar::new(date("2024-01-02"), f64::NAN, 11.0, 9.0, 10.0, 100).expect_err("must fail");
        assert!(matches!(err, ValidationError::NonFiniteValue { field: "open" }));
    }

    #[test]
    fn from_bars_sorts_by_date() {
        let series = PriceSeries::from_bars(vec![bar("2024-01-04", 12.0), bar("2024-01-02", 10.0)]);
        let dates: Vec<String> = series.bars().iter().map(|b| b.date.to_string()).collect();
        assert_eq!(dates, ["2024-01-02", "2024-01-04"]);
    }

    #[test]
    fn from_bars_keeps_last_bar_per_date() {
        let series = PriceSeries::from_bars(vec![bar("2024-01-02", 10.0), bar("2024-01-02", 11.5)]);
        assert_eq!(series.len(), 1);
        assert_eq!(series.bars()[0].close, 11.5);
    }
}
