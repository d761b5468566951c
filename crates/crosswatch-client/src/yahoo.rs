//! Yahoo Finance chart-API provider.
//!
//! Talks to the unauthenticated v8 chart endpoint:
//! `GET /v8/finance/chart/{symbol}?range=..&interval=..`. The payload
//! carries parallel arrays of epoch timestamps and nullable OHLCV values;
//! rows are zipped by position. HTTP 429 is the provider's explicit
//! throttling signal.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use crosswatch_core::{Interval, Symbol, TradeDate};

use crate::error::ProviderError;
use crate::http::{HttpClient, HttpRequest};
use crate::provider::{BarsProvider, FetchWindow, RawBar};

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const DEFAULT_FULL_RANGE: &str = "2y";

/// Chart-API adapter.
#[derive(Clone)]
pub struct YahooChartProvider {
    http: Arc<dyn HttpClient>,
    base_url: String,
    full_range: String,
    timeout_ms: u64,
}

impl YahooChartProvider {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self {
            http,
            base_url: DEFAULT_BASE_URL.to_owned(),
            full_range: DEFAULT_FULL_RANGE.to_owned(),
            timeout_ms: 10_000,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Range requested on a cold start, e.g. `2y`.
    pub fn with_full_range(mut self, full_range: impl Into<String>) -> Self {
        self.full_range = full_range.into();
        self
    }

    fn request_url(&self, symbol: &Symbol, window: FetchWindow, interval: Interval) -> String {
        let range = match window {
            FetchWindow::LastDays(days) => format!("{days}d"),
            FetchWindow::FullHistory => self.full_range.clone(),
        };
        format!(
            "{}/v8/finance/chart/{}?range={}&interval={}&includePrePost=false",
            self.base_url,
            urlencoding::encode(symbol.as_str()),
            range,
            interval.as_str(),
        )
    }
}

impl BarsProvider for YahooChartProvider {
    fn fetch_bars<'a>(
        &'a self,
        symbol: &'a Symbol,
        window: FetchWindow,
        interval: Interval,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RawBar>, ProviderError>> + Send + 'a>> {
        Box::pin(async move {
            let request = HttpRequest::get(self.request_url(symbol, window, interval))
                .with_header("accept", "application/json")
                .with_header("referer", "https://finance.yahoo.com/")
                .with_timeout_ms(self.timeout_ms);

            let response = self
                .http
                .execute(request)
                .await
                .map_err(|error| ProviderError::Transient(error.message().to_owned()))?;

            if response.status == 429 {
                return Err(ProviderError::RateLimited(format!(
                    "chart API returned 429 for {symbol}"
                )));
            }
            if !response.is_success() {
                return Err(ProviderError::Transient(format!(
                    "chart API returned status {} for {symbol}",
                    response.status
                )));
            }

            decode_chart_body(&response.body)
        })
    }
}

/// Decode a chart payload into raw rows. Exposed within the crate so the
/// decoding rules stay testable without a transport.
pub(crate) fn decode_chart_body(body: &str) -> Result<Vec<RawBar>, ProviderError> {
    let payload: ChartResponse = serde_json::from_str(body)
        .map_err(|error| ProviderError::Transient(format!("chart payload undecodable: {error}")))?;

    if let Some(error) = payload.chart.error {
        return Err(ProviderError::Malformed(format!(
            "chart API error {}: {}",
            error.code,
            error.description.unwrap_or_default()
        )));
    }

    let result = payload
        .chart
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::Malformed("chart result is empty".to_owned()))?;

    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .unwrap_or_default();

    let rows = timestamps
        .iter()
        .enumerate()
        .filter_map(|(index, &seconds)| {
            let date = TradeDate::from_unix_timestamp(seconds).ok()?;
            Some(RawBar {
                date,
                open: column_value(&quote.open, index),
                high: column_value(&quote.high, index),
                low: column_value(&quote.low, index),
                close: column_value(&quote.close, index),
                volume: column_value(&quote.volume, index),
            })
        })
        .collect();

    Ok(rows)
}

fn column_value<T: Copy>(column: &Option<Vec<Option<T>>>, index: usize) -> Option<T> {
    column.as_ref().and_then(|values| values.get(index).copied().flatten())
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartQuote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<u64>>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"symbol": "PETR4.SA"},
                "timestamp": [1704205800, 1704292200],
                "indicators": {
                    "quote": [{
                        "open":   [36.10, 36.55],
                        "high":   [36.80, 36.90],
                        "low":    [35.90, 36.20],
                        "close":  [36.50, null],
                        "volume": [1000000, 900000]
                    }]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn decodes_rows_by_position() {
        let rows = decode_chart_body(SAMPLE).expect("payload should decode");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date.to_string(), "2024-01-02");
        assert_eq!(rows[0].close, Some(36.50));
        // Nulls survive as missing values; cleaning decides their fate.
        assert_eq!(rows[1].close, None);
        assert_eq!(rows[1].volume, Some(900_000));
    }

    #[test]
    fn chart_level_error_is_malformed() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found"}}}"#;
        let err = decode_chart_body(body).expect_err("must fail");
        assert!(matches!(err, ProviderError::Malformed(_)));
    }

    #[test]
    fn undecodable_body_is_transient() {
        let err = decode_chart_body("<html>oops</html>").expect_err("must fail");
        assert!(matches!(err, ProviderError::Transient(_)));
    }

    #[test]
    fn builds_range_from_window() {
        let provider = YahooChartProvider::new(Arc::new(crate::http::NoopHttpClient));
        let symbol = Symbol::parse("PETR4.SA").expect("symbol");

        let url = provider.request_url(&symbol, FetchWindow::LastDays(10), Interval::OneDay);
        assert!(url.contains("range=10d"));
        assert!(url.contains("interval=1d"));
        assert!(url.contains("/v8/finance/chart/PETR4.SA"));

        let url = provider.request_url(&symbol, FetchWindow::FullHistory, Interval::OneWeek);
        assert!(url.contains("range=2y"));
        assert!(url.contains("interval=1wk"));
    }
}
