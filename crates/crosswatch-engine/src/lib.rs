//! Acquisition and crossover-scan pipeline for crosswatch.
//!
//! [`SeriesAcquirer`] combines the per-symbol cache with the retrying
//! market data client; [`Pipeline`] walks an instrument universe through
//! acquire → compute → detect and buckets the actionable events for the
//! report renderer.

pub mod acquire;
pub mod chart;
pub mod pipeline;
pub mod report;

pub use acquire::{AcquireError, AcquireSettings, SeriesAcquirer};
pub use chart::{ChartError, ChartWriter};
pub use pipeline::Pipeline;
pub use report::{InstrumentFailure, RunSummary};
