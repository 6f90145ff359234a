//! Stock data fetching with bounded retry
//!
//! The full fetch (probe + history) is retried on transient failures with a
//! delay that grows linearly with the attempt number. A failed probe means
//! the symbol itself is bad and is returned immediately without consuming
//! the retry budget.

use crate::config::AnalysisConfig;
use crate::market::indicators::{percent_change, relative_strength_index, round2, simple_moving_average};
use crate::market::snapshot::{ChartPoint, StockSnapshot, TechnicalIndicators};
use lens_core::{LensError, PricePoint, QuoteProvider, Result, Window};
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{debug, error, warn};

/// Fetches price history and derives a [`StockSnapshot`]
pub struct StockDataFetcher {
    quotes: Arc<dyn QuoteProvider>,
    config: AnalysisConfig,
}

impl StockDataFetcher {
    pub fn new(quotes: Arc<dyn QuoteProvider>, config: AnalysisConfig) -> Self {
        Self { quotes, config }
    }

    /// Fetch a complete snapshot for `symbol` over `window`.
    ///
    /// Returns [`LensError::InvalidSymbol`] when the probe fails,
    /// [`LensError::RetriesExhausted`] when every attempt hits a transient
    /// failure, and never a partial snapshot.
    pub async fn fetch_snapshot(&self, symbol: &str, window: Window) -> Result<StockSnapshot> {
        let max_attempts = self.config.max_fetch_attempts;
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            debug!(%symbol, %window, attempt, max_attempts, "fetching stock data");

            match self.fetch_once(symbol, window).await {
                Ok(snapshot) => return Ok(snapshot),
                Err(e) if !e.is_transient() => return Err(e),
                Err(e) => {
                    warn!(%symbol, attempt, max_attempts, error = %e, "stock data fetch failed");
                    last_error = Some(e);

                    if attempt < max_attempts {
                        sleep(self.config.retry_delay(attempt)).await;
                    }
                }
            }
        }

        error!(%symbol, attempts = max_attempts, error = ?last_error, "stock data fetch exhausted retries");
        Err(LensError::RetriesExhausted {
            symbol: symbol.to_string(),
            attempts: max_attempts,
        })
    }

    async fn fetch_once(&self, symbol: &str, window: Window) -> Result<StockSnapshot> {
        // Validate the symbol before requesting full history. Probe failures
        // are classified as a bad symbol, which is not retryable.
        self.quotes.probe(symbol).await.map_err(|e| match e {
            LensError::InvalidSymbol(_) => e,
            other => LensError::InvalidSymbol(format!("{symbol}: {other}")),
        })?;

        let history = self
            .quotes
            .history(symbol, window, window.granularity())
            .await?;

        if history.is_empty() {
            return Err(LensError::UpstreamUnavailable {
                provider: "quotes".to_string(),
                reason: format!("no data points returned for {symbol}"),
            });
        }

        Ok(self.build_snapshot(symbol, window, &history))
    }

    fn build_snapshot(&self, symbol: &str, window: Window, history: &[PricePoint]) -> StockSnapshot {
        let closes: Vec<f64> = history.iter().map(|p| p.close).collect();

        let current_price = closes[closes.len() - 1];
        // No prior point: the latest close stands in, yielding a 0% change.
        let previous_close = if closes.len() > 1 {
            closes[closes.len() - 2]
        } else {
            current_price
        };

        let high = history.iter().map(|p| p.high).fold(f64::MIN, f64::max);
        let low = history.iter().map(|p| p.low).fold(f64::MAX, f64::min);
        let volume = history[history.len() - 1].volume;
        let average_volume =
            (history.iter().map(|p| p.volume).sum::<u64>() as f64 / history.len() as f64) as u64;

        let chart = history
            .iter()
            .map(|p| ChartPoint {
                timestamp: p.timestamp,
                price: round2(p.close),
                volume: p.volume,
            })
            .collect();

        let indicators = TechnicalIndicators {
            sma_short: simple_moving_average(&closes, self.config.sma_short_window),
            sma_long: simple_moving_average(&closes, self.config.sma_long_window),
            rsi: relative_strength_index(&closes, self.config.rsi_period),
        };

        StockSnapshot {
            symbol: symbol.to_string(),
            window,
            current_price,
            percent_change: percent_change(current_price, previous_close),
            volume,
            average_volume,
            high,
            low,
            chart,
            indicators,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::DateTime;
    use lens_core::{Granularity, SymbolInfo};
    use mockall::mock;
    use std::time::Duration;

    mock! {
        Quotes {}

        #[async_trait]
        impl QuoteProvider for Quotes {
            async fn probe(&self, symbol: &str) -> Result<SymbolInfo>;
            async fn history(
                &self,
                symbol: &str,
                window: Window,
                granularity: Granularity,
            ) -> Result<Vec<PricePoint>>;
        }
    }

    fn fast_config() -> AnalysisConfig {
        AnalysisConfig::builder()
            .retry_delay_base(Duration::from_millis(5))
            .build()
            .unwrap()
    }

    fn info(symbol: &str) -> SymbolInfo {
        SymbolInfo {
            symbol: symbol.to_string(),
            name: None,
            exchange: None,
        }
    }

    fn points(closes: &[f64]) -> Vec<PricePoint> {
        closes
            .iter()
            .enumerate()
            .map(|(i, close)| PricePoint {
                timestamp: DateTime::from_timestamp(1_700_000_000 + i as i64 * 3600, 0).unwrap(),
                open: *close,
                high: close + 1.0,
                low: close - 1.0,
                close: *close,
                volume: 1_000 + i as u64 * 100,
            })
            .collect()
    }

    fn transient() -> LensError {
        LensError::UpstreamUnavailable {
            provider: "quotes".to_string(),
            reason: "connection reset".to_string(),
        }
    }

    #[tokio::test]
    async fn test_invalid_symbol_does_not_consume_retry_budget() {
        let mut quotes = MockQuotes::new();
        quotes
            .expect_probe()
            .times(1)
            .returning(|_| Err(transient()));
        quotes.expect_history().times(0);

        let fetcher = StockDataFetcher::new(Arc::new(quotes), fast_config());
        let result = fetcher.fetch_snapshot("NOPE", Window::FiveDays).await;

        assert!(matches!(result, Err(LensError::InvalidSymbol(_))));
    }

    #[tokio::test]
    async fn test_transient_history_failures_are_retried() {
        let mut quotes = MockQuotes::new();
        quotes
            .expect_probe()
            .times(3)
            .returning(|s| Ok(info(s)));

        let mut calls = 0;
        quotes.expect_history().times(3).returning(move |_, _, _| {
            calls += 1;
            if calls < 3 {
                Err(transient())
            } else {
                Ok(points(&[100.0, 102.0, 101.0]))
            }
        });

        let fetcher = StockDataFetcher::new(Arc::new(quotes), fast_config());
        let snapshot = fetcher
            .fetch_snapshot("AAPL", Window::FiveDays)
            .await
            .unwrap();

        assert_eq!(snapshot.symbol, "AAPL");
        assert!((snapshot.current_price - 101.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_exhausted_retries_name_symbol_and_attempts() {
        let mut quotes = MockQuotes::new();
        quotes.expect_probe().times(3).returning(|s| Ok(info(s)));
        quotes
            .expect_history()
            .times(3)
            .returning(|_, _, _| Err(transient()));

        let fetcher = StockDataFetcher::new(Arc::new(quotes), fast_config());
        let result = fetcher.fetch_snapshot("MSFT", Window::OneMonth).await;

        match result {
            Err(LensError::RetriesExhausted { symbol, attempts }) => {
                assert_eq!(symbol, "MSFT");
                assert_eq!(attempts, 3);
            }
            other => panic!("expected RetriesExhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_snapshot_derivation() {
        let mut quotes = MockQuotes::new();
        quotes.expect_probe().returning(|s| Ok(info(s)));
        quotes
            .expect_history()
            .returning(|_, _, _| Ok(points(&[100.0, 90.0, 99.0])));

        let fetcher = StockDataFetcher::new(Arc::new(quotes), fast_config());
        let snapshot = fetcher
            .fetch_snapshot("AAPL", Window::OneMonth)
            .await
            .unwrap();

        assert!((snapshot.current_price - 99.0).abs() < f64::EPSILON);
        // (99 - 90) / 90 * 100 = 10.0
        assert_eq!(snapshot.percent_change, Some(10.0));
        assert!((snapshot.high - 101.0).abs() < f64::EPSILON);
        assert!((snapshot.low - 89.0).abs() < f64::EPSILON);
        assert_eq!(snapshot.volume, 1_200);
        assert_eq!(snapshot.average_volume, 1_100);
        assert_eq!(snapshot.chart.len(), 3);
        // 3 points average within the clamped short window
        assert!(snapshot.indicators.sma_short.is_some());
        // 14 deltas are not available from 3 points
        assert_eq!(snapshot.indicators.rsi, None);
    }

    #[tokio::test]
    async fn test_single_point_history_yields_zero_change() {
        let mut quotes = MockQuotes::new();
        quotes.expect_probe().returning(|s| Ok(info(s)));
        quotes
            .expect_history()
            .returning(|_, _, _| Ok(points(&[42.0])));

        let fetcher = StockDataFetcher::new(Arc::new(quotes), fast_config());
        let snapshot = fetcher
            .fetch_snapshot("AAPL", Window::OneDay)
            .await
            .unwrap();

        assert_eq!(snapshot.percent_change, Some(0.0));
    }

    #[tokio::test]
    async fn test_empty_history_is_transient_and_exhausts() {
        let mut quotes = MockQuotes::new();
        quotes.expect_probe().times(3).returning(|s| Ok(info(s)));
        quotes.expect_history().times(3).returning(|_, _, _| Ok(Vec::new()));

        let fetcher = StockDataFetcher::new(Arc::new(quotes), fast_config());
        let result = fetcher.fetch_snapshot("AAPL", Window::OneYear).await;

        assert!(matches!(result, Err(LensError::RetriesExhausted { .. })));
    }
}
