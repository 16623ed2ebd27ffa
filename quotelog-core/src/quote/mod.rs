//! Quote providers and structured error types.
//!
//! The QuoteProvider trait abstracts over price sources (Yahoo Finance, the
//! deterministic synthetic walk) so the scheduler can be exercised without
//! network access. Providers make exactly one request per fetch; there is no
//! retry inside a tick, the next tick simply tries again.

pub mod synthetic;
pub mod yahoo;

pub use synthetic::SyntheticProvider;
pub use yahoo::YahooQuoteProvider;

use thiserror::Error;

/// Structured error types for quote fetches.
///
/// The scheduler downgrades every variant to an "unavailable" sample; these
/// exist so the operator sees a descriptive line, not to alter control flow.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("provider returned HTTP {status} for {symbol}")]
    HttpStatus { symbol: String, status: u16 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("no price in response for {symbol}")]
    MissingPrice { symbol: String },

    #[error("invalid price {price} for {symbol}")]
    InvalidPrice { symbol: String, price: f64 },
}

/// Trait for last-price providers.
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the last traded price for a symbol.
    ///
    /// The `Ok` value is always finite and positive; anything else from the
    /// upstream source is reported as an error.
    fn fetch_last(&self, symbol: &str) -> Result<f64, QuoteError>;
}
