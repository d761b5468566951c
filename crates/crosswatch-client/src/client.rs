//! Retrying fetch client around a [`BarsProvider`].

use std::sync::Arc;

use crosswatch_core::{Bar, Interval, PriceSeries, Symbol};

use crate::error::FetchError;
use crate::provider::{BarsProvider, FetchWindow, RawBar};
use crate::retry::FetchPolicy;
use crate::throttle::Throttle;

/// Fetches a contiguous window of bars for one symbol, absorbing transient
/// upstream failures, explicit rate-limit signals, and malformed payloads
/// within a fixed retry budget.
pub struct MarketDataClient {
    provider: Arc<dyn BarsProvider>,
    policy: FetchPolicy,
    throttle: Option<Throttle>,
}

impl MarketDataClient {
    pub fn new(provider: Arc<dyn BarsProvider>, policy: FetchPolicy) -> Self {
        Self {
            provider,
            policy,
            throttle: None,
        }
    }

    /// Share `throttle` across every fetch issued through this client.
    pub fn with_throttle(mut self, throttle: Throttle) -> Self {
        self.throttle = Some(throttle);
        self
    }

    /// Fetch and clean a window of bars.
    ///
    /// A nominally successful call whose cleaned series is empty counts as
    /// a failed attempt, not as "no data": an instrument with no usable
    /// bars must surface as a fetch failure, never as "no crossover".
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::BudgetExhausted`] — the only terminal
    /// variant — naming the symbol, the attempt count, and the last
    /// underlying cause.
    pub async fn fetch(
        &self,
        symbol: &Symbol,
        window: FetchWindow,
        interval: Interval,
    ) -> Result<PriceSeries, FetchError> {
        let attempts = self.policy.attempts();
        let mut last_error = FetchError::EmptyData;

        for attempt in 1..=attempts {
            if let Some(throttle) = &self.throttle {
                throttle.acquire().await;
            }

            let error = match self.provider.fetch_bars(symbol, window, interval).await {
                Ok(rows) => {
                    let series = clean_rows(rows);
                    if series.is_empty() {
                        FetchError::EmptyData
                    } else {
                        return Ok(series);
                    }
                }
                Err(provider_error) => FetchError::from(provider_error),
            };

            tracing::warn!(
                symbol = %symbol,
                attempt,
                max_attempts = attempts,
                %error,
                "fetch attempt failed"
            );

            let rate_limited = error.is_rate_limited();
            last_error = error;

            if attempt < attempts {
                let delay = self.policy.delay_for_attempt(attempt, rate_limited);
                tokio::time::sleep(delay).await;
            }
        }

        Err(FetchError::BudgetExhausted {
            symbol: symbol.clone(),
            attempts,
            last: Box::new(last_error),
        })
    }
}

/// Drop rows with any missing OHLC field, coerce missing volume to zero,
/// and normalize ordering: strictly ascending by date, later rows winning
/// duplicate dates.
pub fn clean_rows(rows: Vec<RawBar>) -> PriceSeries {
    let bars: Vec<Bar> = rows
        .into_iter()
        .filter_map(|row| {
            let open = row.open?;
            let high = row.high?;
            let low = row.low?;
            let close = row.close?;
            Bar::new(row.date, open, high, low, close, row.volume.unwrap_or(0)).ok()
        })
        .collect();
    PriceSeries::from_bars(bars)
}
