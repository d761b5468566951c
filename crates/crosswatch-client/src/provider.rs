//! Provider adapter contract.

use std::future::Future;
use std::pin::Pin;

use crosswatch_core::{Interval, Symbol, TradeDate};

use crate::error::ProviderError;

/// Fetch window for one provider call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchWindow {
    /// Incremental refresh: the last `n` calendar days.
    LastDays(u32),
    /// Cold start: the provider's full supported history range.
    FullHistory,
}

/// One wire-level row, before cleaning. OHLC fields arrive nullable;
/// anything the provider could not quote stays `None` and the cleaning
/// pass drops the row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawBar {
    pub date: TradeDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<u64>,
}

/// Upstream bar source. Implementations must be `Send + Sync`; the client
/// retries around them, so a single call should make exactly one upstream
/// request and classify its own failures.
pub trait BarsProvider: Send + Sync {
    fn fetch_bars<'a>(
        &'a self,
        symbol: &'a Symbol,
        window: FetchWindow,
        interval: Interval,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RawBar>, ProviderError>> + Send + 'a>>;
}
