//! Run outcome types handed to the report renderer.

use serde::{Deserialize, Serialize};

use crosswatch_core::{CrossoverEvent, Symbol};

/// An instrument excluded from this run's output, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentFailure {
    pub symbol: Symbol,
    pub reason: String,
}

/// Everything one pipeline run produced: actionable events partitioned by
/// direction, plus per-instrument diagnostics for anything that failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub bullish: Vec<CrossoverEvent>,
    pub bearish: Vec<CrossoverEvent>,
    pub skipped: Vec<InstrumentFailure>,
}

impl RunSummary {
    pub fn has_events(&self) -> bool {
        !self.bullish.is_empty() || !self.bearish.is_empty()
    }

    pub fn event_count(&self) -> usize {
        self.bullish.len() + self.bearish.len()
    }
}
