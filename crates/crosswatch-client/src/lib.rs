//! # Crosswatch Client
//!
//! Market data acquisition for crosswatch: a provider adapter contract, a
//! Yahoo chart-API implementation, and a retrying client that absorbs an
//! unreliable, rate-limited upstream.
//!
//! ## Failure model
//!
//! Every provider call resolves to one of three classifications —
//! rate-limited, transient, or malformed payload — and the client retries
//! all of them within a fixed budget, doubling its delay per attempt and
//! enforcing a minimum wait after an explicit rate-limit signal. Only
//! [`FetchError::BudgetExhausted`] escapes the loop; the orchestrator
//! catches it per instrument and moves on.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Retrying [`MarketDataClient`] and row cleaning |
//! | [`provider`] | [`BarsProvider`] trait, fetch windows, raw rows |
//! | [`yahoo`] | Yahoo v8 chart-API adapter |
//! | [`http`] | Transport abstraction (reqwest / no-op) |
//! | [`retry`] | Backoff policy |
//! | [`throttle`] | Shared governor-based request throttle |

pub mod client;
pub mod error;
pub mod http;
pub mod provider;
pub mod retry;
pub mod throttle;
pub mod yahoo;

pub use client::{clean_rows, MarketDataClient};
pub use error::{FetchError, ProviderError};
pub use http::{HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient};
pub use provider::{BarsProvider, FetchWindow, RawBar};
pub use retry::FetchPolicy;
pub use throttle::Throttle;
pub use yahoo::YahooChartProvider;
