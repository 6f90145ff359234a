//! Yahoo Finance quote provider

use async_trait::async_trait;
use chrono::DateTime;
use lens_core::{
    Granularity, LensError, PricePoint, QuoteProvider, Result, SymbolInfo, Window,
};
use tracing::debug;
use yahoo_finance_api as yahoo;

/// Quote/history client backed by Yahoo Finance
pub struct YahooQuoteClient {}

impl YahooQuoteClient {
    pub fn new() -> Self {
        Self {}
    }

    fn connector() -> Result<yahoo::YahooConnector> {
        yahoo::YahooConnector::new().map_err(|e| LensError::UpstreamUnavailable {
            provider: "yahoo".to_string(),
            reason: e.to_string(),
        })
    }
}

impl Default for YahooQuoteClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for YahooQuoteClient {
    fn clone(&self) -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuoteProvider for YahooQuoteClient {
    /// Validate the symbol by fetching its latest quote. Any failure here
    /// means the symbol cannot be served.
    async fn probe(&self, symbol: &str) -> Result<SymbolInfo> {
        let provider = Self::connector()?;

        let response = provider
            .get_latest_quotes(symbol, "1d")
            .await
            .map_err(|e| LensError::InvalidSymbol(format!("{symbol}: {e}")))?;

        response
            .last_quote()
            .map_err(|e| LensError::InvalidSymbol(format!("{symbol}: {e}")))?;

        Ok(SymbolInfo {
            symbol: symbol.to_uppercase(),
            name: None,
            exchange: None,
        })
    }

    async fn history(
        &self,
        symbol: &str,
        window: Window,
        granularity: Granularity,
    ) -> Result<Vec<PricePoint>> {
        debug!(%symbol, %window, interval = granularity.as_interval(), "requesting price history");

        let provider = Self::connector()?;

        let response = provider
            .get_quote_range(symbol, granularity.as_interval(), window.as_str())
            .await
            .map_err(|e| LensError::UpstreamUnavailable {
                provider: "yahoo".to_string(),
                reason: e.to_string(),
            })?;

        let quotes = response
            .quotes()
            .map_err(|e| LensError::UpstreamUnavailable {
                provider: "yahoo".to_string(),
                reason: e.to_string(),
            })?;

        Ok(quotes
            .iter()
            .map(|q| PricePoint {
                timestamp: DateTime::from_timestamp(q.timestamp as i64, 0)
                    .unwrap_or_else(chrono::Utc::now),
                open: q.open,
                high: q.high,
                low: q.low,
                close: q.close,
                volume: q.volume,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_probe_known_symbol() {
        let client = YahooQuoteClient::new();
        let info = client.probe("AAPL").await.unwrap();
        assert_eq!(info.symbol, "AAPL");
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_probe_unknown_symbol() {
        let client = YahooQuoteClient::new();
        let result = client.probe("INVALID_SYMBOL_12345").await;
        assert!(matches!(result, Err(LensError::InvalidSymbol(_))));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_history_daily() {
        let client = YahooQuoteClient::new();
        let points = client
            .history("AAPL", Window::OneMonth, Granularity::Daily)
            .await
            .unwrap();
        assert!(!points.is_empty());
        assert!(points[0].close > 0.0);
    }
}
