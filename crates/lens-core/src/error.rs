//! Error taxonomy shared across the marketlens core
//!
//! Upstream failures are represented as typed values rather than stringified
//! exceptions. A failure is either fatal to the calling operation
//! (invalid symbol, retries exhausted) or degradable (filings/news missing),
//! and the orchestrator decides which — see `lens-stock`.

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, LensError>;

/// Errors produced by the company-intelligence core
#[derive(Debug, Error)]
pub enum LensError {
    /// Symbol failed the lightweight metadata probe
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// An upstream provider could not serve the request
    #[error("{provider} unavailable: {reason}")]
    UpstreamUnavailable {
        provider: String,
        reason: String,
    },

    /// The bounded fetch loop ran out of attempts
    #[error("Failed to fetch stock data for {symbol} after {attempts} attempts")]
    RetriesExhausted {
        symbol: String,
        attempts: u32,
    },

    /// Source text could not be parsed into the expected shape.
    /// Absorbed at the extraction layer; callers degrade to "not found".
    #[error("Parse failure: {0}")]
    ParseFailure(String),

    /// A provider was constructed without the credentials it needs
    #[error("Missing credentials for {0}")]
    MissingCredentials(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LensError {
    /// Whether a retry of the same operation could plausibly succeed.
    ///
    /// Invalid symbols, parse failures, and configuration problems are
    /// permanent; network-shaped failures are not.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            LensError::UpstreamUnavailable { .. } | LensError::Network(_)
        )
    }
}
