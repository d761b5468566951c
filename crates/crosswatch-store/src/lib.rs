//! Durable per-symbol price series cache.
//!
//! One schema-versioned JSON document per sanitized symbol under a
//! caller-supplied root directory. Reads never fail the caller: a missing,
//! corrupt, or incompatible file degrades to an empty series so the
//! acquisition path falls back to a full refetch. Writes are best-effort
//! through a temp-file rename; a failed write only means the next run
//! re-merges from the previous cache state, which is safe because
//! [`SeriesStore::merge`] is idempotent and incoming data wins on conflict.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crosswatch_core::{Bar, PriceSeries, Symbol};

const SCHEMA_VERSION: u32 = 1;

/// Errors surfaced by cache persistence.
///
/// Only [`SeriesStore::save`] and [`SeriesStore::open`] return these;
/// `load` recovers internally.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("cache decode failed: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("cache schema version {found} is not supported (expected {SCHEMA_VERSION})")]
    SchemaMismatch { found: u32 },
}

/// Store location, passed explicitly at construction and scoped to a
/// single pipeline run.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub root: PathBuf,
}

/// On-disk document shape. Kept schema-stable: new fields require a
/// version bump, and an unknown version reads as empty.
#[derive(Debug, Serialize, Deserialize)]
struct CachedSeries {
    schema_version: u32,
    symbol: String,
    bars: Vec<Bar>,
}

/// Durable, incrementally-mergeable storage of one price series per
/// instrument symbol.
#[derive(Debug)]
pub struct SeriesStore {
    root: PathBuf,
}

impl SeriesStore {
    pub fn open(config: StoreConfig) -> Result<Self, StoreError> {
        fs::create_dir_all(&config.root)?;
        Ok(Self { root: config.root })
    }

    /// Load the cached series for `symbol`, or an empty series when no
    /// usable cache exists. Never fails the caller.
    pub fn load(&self, symbol: &Symbol) -> PriceSeries {
        let path = self.path_for(symbol);
        match read_series(&path) {
            Ok(series) => series,
            Err(error) => {
                tracing::warn!(
                    symbol = %symbol,
                    path = %path.display(),
                    %error,
                    "cache unreadable, treating as empty"
                );
                PriceSeries::empty()
            }
        }
    }

    /// Merge `incoming` into `existing`: union of both, strictly ascending
    /// by date, and for duplicate dates the `incoming` bar wins. Does not
    /// persist; idempotent.
    pub fn merge(existing: PriceSeries, incoming: PriceSeries) -> PriceSeries {
        let mut bars = existing.into_bars();
        bars.extend(incoming.into_bars());
        PriceSeries::from_bars(bars)
    }

    /// Persist `series` for `symbol`. Best effort: callers log a failure
    /// and continue, skipping persistence for this run only.
    pub fn save(&self, symbol: &Symbol, series: &PriceSeries) -> Result<(), StoreError> {
        let document = CachedSeries {
            schema_version: SCHEMA_VERSION,
            symbol: symbol.to_string(),
            bars: series.bars().to_vec(),
        };
        let body = serde_json::to_string(&document)?;

        let path = self.path_for(symbol);
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, body)?;
        fs::rename(&staging, &path)?;
        Ok(())
    }

    pub fn path_for(&self, symbol: &Symbol) -> PathBuf {
        self.root.join(format!("{}.json", symbol.cache_key()))
    }
}

fn read_series(path: &Path) -> Result<PriceSeries, StoreError> {
    if !path.exists() {
        return Ok(PriceSeries::empty());
    }

    let raw = fs::read_to_string(path)?;
    let document: CachedSeries = serde_json::from_str(&raw)?;
    if document.schema_version != SCHEMA_VERSION {
        return Err(StoreError::SchemaMismatch {
            found: document.schema_version,
        });
    }

    // Deserialization bypasses Bar::new, so re-validate and drop anything
    // a corrupted record smuggled in.
    let bars = document
        .bars
        .into_iter()
        .filter(|bar| bar.validate().is_ok())
        .collect();
    Ok(PriceSeries::from_bars(bars))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crosswatch_core::TradeDate;
    use tempfile::tempdir;

    fn symbol(input: &str) -> Symbol {
        Symbol::parse(input).expect("test symbol")
    }

    fn bar(day: &str, close: f64) -> Bar {
        let date = TradeDate::parse(day).expect("test date");
        Bar::new(date, close, close + 1.0, close - 1.0, close, 100).expect("test bar")
    }

    #[test]
    fn path_uses_sanitized_symbol() {
        let temp = tempdir().expect("tempdir");
        let store = SeriesStore::open(StoreConfig {
            root: temp.path().to_path_buf(),
        })
        .expect("store open");

        let path = store.path_for(&symbol("PETR4.SA"));
        assert_eq!(path.file_name().unwrap(), "PETR4_SA.json");
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let temp = tempdir().expect("tempdir");
        let store = SeriesStore::open(StoreConfig {
            root: temp.path().to_path_buf(),
        })
        .expect("store open");

        assert!(store.load(&symbol("VALE3.SA")).is_empty());
    }

    #[test]
    fn load_drops_invalid_bars() {
        let temp = tempdir().expect("tempdir");
        let store = SeriesStore::open(StoreConfig {
            root: temp.path().to_path_buf(),
        })
        .expect("store open");
        let sym = symbol("ITUB4.SA");

        let body = format!(
            "{{\"schema_version\":{SCHEMA_VERSION},\"symbol\":\"ITUB4.SA\",\"bars\":[\
             {{\"date\":\"2024-01-02\",\"open\":10.0,\"high\":11.0,\"low\":9.0,\"close\":10.5,\"volume\":100}},\
             {{\"date\":\"2024-01-03\",\"open\":10.0,\"high\":11.0,\"low\":9.0,\"close\":-3.0,\"volume\":100}}]}}"
        );
        fs::write(store.path_for(&sym), body).expect("write fixture");

        let series = store.load(&sym);
        assert_eq!(series.len(), 1);
        assert_eq!(series.bars()[0].close, 10.5);
    }

    #[test]
    fn save_then_load_round_trips() {
        let temp = tempdir().expect("tempdir");
        let store = SeriesStore::open(StoreConfig {
            root: temp.path().to_path_buf(),
        })
        .expect("store open");
        let sym = symbol("WEGE3.SA");

        let series = PriceSeries::from_bars(vec![bar("2024-01-02", 35.1), bar("2024-01-03", 35.8)]);
        store.save(&sym, &series).expect("save should succeed");

        assert_eq!(store.load(&sym), series);
    }
}
