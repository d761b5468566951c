//! Per-instrument scan orchestration.

use thiserror::Error;

use crosswatch_core::{
    compute_macd, last_crossover, CrossoverEvent, Direction, MacdParams, Symbol,
};

use crate::acquire::{AcquireError, SeriesAcquirer};
use crate::chart::{ChartError, ChartWriter};
use crate::report::{InstrumentFailure, RunSummary};

/// Why one instrument produced no result this run.
#[derive(Debug, Error)]
enum ScanError {
    #[error(transparent)]
    Acquire(#[from] AcquireError),

    #[error("chart emission failed: {0}")]
    Chart(#[from] ChartError),
}

/// Iterates the instrument universe, running acquisition, indicator
/// computation, and crossover detection per instrument, and partitions the
/// results into bullish and bearish buckets.
///
/// Instruments are independent: every per-instrument error is contained,
/// logged, and recorded as a diagnostic; no failure aborts the run.
pub struct Pipeline {
    acquirer: SeriesAcquirer,
    params: MacdParams,
    charts: ChartWriter,
}

impl Pipeline {
    pub fn new(acquirer: SeriesAcquirer, params: MacdParams, charts: ChartWriter) -> Self {
        Self {
            acquirer,
            params,
            charts,
        }
    }

    pub async fn run(&self, universe: &[Symbol]) -> RunSummary {
        let mut summary = RunSummary::default();

        for symbol in universe {
            match self.scan_instrument(symbol).await {
                Ok(Some(event)) => {
                    tracing::info!(
                        symbol = %event.symbol,
                        direction = %event.direction,
                        date = %event.date,
                        "crossover on latest bar"
                    );
                    match event.direction {
                        Direction::Bullish => summary.bullish.push(event),
                        Direction::Bearish => summary.bearish.push(event),
                    }
                }
                Ok(None) => {}
                Err(error) => {
                    tracing::warn!(symbol = %symbol, %error, "instrument excluded from this run");
                    summary.skipped.push(InstrumentFailure {
                        symbol: symbol.clone(),
                        reason: error.to_string(),
                    });
                }
            }
        }

        summary
    }

    /// One instrument's acquire → compute → detect cycle.
    ///
    /// A detected crossover is only actionable when it sits on the final
    /// bar of the series; an older cross has already settled and is stale.
    /// The chart is emitted before the event is returned so no event ever
    /// exists without its chart input.
    async fn scan_instrument(&self, symbol: &Symbol) -> Result<Option<CrossoverEvent>, ScanError> {
        let series = self.acquirer.acquire(symbol).await?;
        let indicators = compute_macd(&series, &self.params);

        let Some(cross) = last_crossover(&indicators) else {
            tracing::debug!(symbol = %symbol, "no crossover in series");
            return Ok(None);
        };

        if cross.index + 1 != series.len() {
            tracing::debug!(
                symbol = %symbol,
                index = cross.index,
                len = series.len(),
                "most recent crossover is stale"
            );
            return Ok(None);
        }

        let bar = series.bars()[cross.index];
        self.charts.write(symbol, &indicators, Some(&cross))?;

        Ok(Some(CrossoverEvent {
            symbol: symbol.clone(),
            direction: cross.direction,
            date: bar.date,
            close: bar.close,
        }))
    }
}
