//! Cache-aware series acquisition.

use thiserror::Error;

use crosswatch_client::{FetchError, FetchWindow, MarketDataClient};
use crosswatch_core::{Interval, PriceSeries, Symbol};
use crosswatch_store::SeriesStore;

/// Acquisition tuning, passed explicitly per run.
#[derive(Debug, Clone)]
pub struct AcquireSettings {
    pub interval: Interval,
    /// Calendar days fetched when a cached series exists: enough to cover
    /// bars posted since the last run plus overlap for upstream
    /// corrections.
    pub refresh_lookback_days: u32,
}

impl Default for AcquireSettings {
    fn default() -> Self {
        Self {
            interval: Interval::OneDay,
            refresh_lookback_days: 10,
        }
    }
}

/// Raised when an instrument has neither cached nor fetchable data and
/// must be skipped for this run.
#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("{symbol}: no cached data and fetch failed: {source}")]
    NoData {
        symbol: Symbol,
        #[source]
        source: FetchError,
    },
}

/// Composes [`SeriesStore`] and [`MarketDataClient`] into a single
/// "get up-to-date series" operation with cache-aware partial refresh.
pub struct SeriesAcquirer {
    store: SeriesStore,
    client: MarketDataClient,
    settings: AcquireSettings,
}

impl SeriesAcquirer {
    pub fn new(store: SeriesStore, client: MarketDataClient, settings: AcquireSettings) -> Self {
        Self {
            store,
            client,
            settings,
        }
    }

    /// Produce an up-to-date series for `symbol` with as little upstream
    /// traffic as the cache state allows.
    ///
    /// A cached series is refreshed with a short recent window and merged
    /// (incoming bars win on conflict, absorbing upstream corrections). A
    /// cold start fetches the full history in one call. When the refresh
    /// fetch terminally fails, the cached series is returned unchanged —
    /// stale but available — unless the cache is also empty, in which case
    /// the instrument is skipped via [`AcquireError::NoData`].
    pub async fn acquire(&self, symbol: &Symbol) -> Result<PriceSeries, AcquireError> {
        let cached = self.store.load(symbol);

        let series = if cached.is_empty() {
            match self
                .client
                .fetch(symbol, FetchWindow::FullHistory, self.settings.interval)
                .await
            {
                Ok(full) => full,
                Err(source) => {
                    return Err(AcquireError::NoData {
                        symbol: symbol.clone(),
                        source,
                    })
                }
            }
        } else {
            let window = FetchWindow::LastDays(self.settings.refresh_lookback_days);
            match self.client.fetch(symbol, window, self.settings.interval).await {
                Ok(recent) => SeriesStore::merge(cached, recent),
                Err(error) => {
                    tracing::warn!(
                        symbol = %symbol,
                        %error,
                        "refresh failed, falling back to cached series"
                    );
                    cached
                }
            }
        };

        // Persist before returning so corrections merged this run survive
        // even if a later step fails. A write failure only skips
        // persistence for this run.
        if let Err(error) = self.store.save(symbol, &series) {
            tracing::warn!(symbol = %symbol, %error, "cache write failed, continuing");
        }

        Ok(series)
    }
}
