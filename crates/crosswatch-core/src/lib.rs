//! # Crosswatch Core
//!
//! Domain types and indicator math for the crosswatch MACD scanner.
//!
//! ## Overview
//!
//! This crate provides the pure, I/O-free foundation of crosswatch:
//!
//! - **Canonical domain models** for symbols, dates, bars, and price series
//! - **Indicator engine** computing MACD and signal lines with the
//!   non-adjusted EMA convention
//! - **Crossover detection** scanning a computed indicator series backward
//!   for the most recent sign change
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`domain`] | Domain models (Symbol, TradeDate, Bar, PriceSeries) |
//! | [`indicator`] | MACD / signal line computation |
//! | [`crossover`] | Most-recent-crossover scan |
//! | [`error`] | Validation errors |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use crosswatch_core::{compute_macd, last_crossover, MacdParams, PriceSeries};
//!
//! let series: PriceSeries = load_series();
//! let indicators = compute_macd(&series, &MacdParams::default());
//! if let Some(cross) = last_crossover(&indicators) {
//!     println!("{} at index {}", cross.direction, cross.index);
//! }
//! ```
//!
//! ## Invariants
//!
//! - A [`PriceSeries`] is strictly ascending by date with no duplicates;
//!   when the same date is supplied twice, the bar supplied last wins.
//! - [`Bar`] OHLC fields are positive and finite; anything else fails
//!   validation and is dropped by the acquisition layer before use.
//! - The indicator series is recomputed from the full price history on
//!   every run — the EMA is a function of the entire prefix, so extending
//!   it from a persisted partial state would be unsound.

pub mod crossover;
pub mod domain;
pub mod error;
pub mod indicator;

pub use crossover::{last_crossover, Crossover};
pub use domain::{Bar, CrossoverEvent, Direction, Interval, PriceSeries, Symbol, TradeDate};
pub use error::ValidationError;
pub use indicator::{compute_macd, IndicatorSeries, MacdParams};
