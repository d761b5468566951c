use thiserror::Error;

use crosswatch_core::Symbol;

/// Classification of a single provider call. Every failure a provider can
/// produce maps onto exactly one of these; nothing is swallowed
/// generically.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider explicitly signalled throttling.
    #[error("rate limited by provider: {0}")]
    RateLimited(String),

    /// Network or transport failure, undecodable body, unexpected status.
    #[error("transient provider failure: {0}")]
    Transient(String),

    /// The call nominally succeeded but the payload carries no usable rows.
    #[error("malformed provider payload: {0}")]
    Malformed(String),
}

/// Outcome of a full [`MarketDataClient::fetch`](crate::MarketDataClient::fetch)
/// cycle. Only [`FetchError::BudgetExhausted`] is terminal; the other
/// variants describe individual attempts and are consumed by the retry
/// loop itself.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("transient failure: {0}")]
    Transient(String),

    #[error("no usable bars after cleaning")]
    EmptyData,

    #[error("{symbol}: retry budget exhausted after {attempts} attempts, last error: {last}")]
    BudgetExhausted {
        symbol: Symbol,
        attempts: u32,
        last: Box<FetchError>,
    },
}

impl FetchError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }
}

impl From<ProviderError> for FetchError {
    fn from(error: ProviderError) -> Self {
        match error {
            ProviderError::RateLimited(message) => Self::RateLimited(message),
            ProviderError::Transient(message) => Self::Transient(message),
            ProviderError::Malformed(message) => Self::Transient(message),
        }
    }
}
