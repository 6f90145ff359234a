//! Configuration for analysis operations

use lens_core::{LensError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunable policy for fetching, trend analysis, and prompt assembly
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Maximum attempts for the full stock-data fetch (probe + history)
    pub max_fetch_attempts: u32,

    /// Base delay between fetch attempts; actual delay grows linearly
    /// with the attempt number
    pub retry_delay_base: Duration,

    /// Request timeout for upstream HTTP calls
    pub request_timeout: Duration,

    /// Number of news items folded into a prompt context
    pub news_context_limit: usize,

    /// Number of quarterly filings pulled into trend analysis
    pub trend_quarters: usize,

    /// Absolute percent change above which a trend is called out in the
    /// generated summary
    pub trend_threshold: f64,

    /// Short simple-moving-average window (data points)
    pub sma_short_window: usize,

    /// Long simple-moving-average window (data points)
    pub sma_long_window: usize,

    /// Relative Strength Index lookback (deltas)
    pub rsi_period: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_fetch_attempts: 3,
            retry_delay_base: Duration::from_secs(1),
            request_timeout: Duration::from_secs(30),
            news_context_limit: 5,
            trend_quarters: 4,
            trend_threshold: 10.0,
            sma_short_window: 20,
            sma_long_window: 50,
            rsi_period: 14,
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration builder
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_fetch_attempts == 0 {
            return Err(LensError::Config(
                "max_fetch_attempts must be greater than 0".to_string(),
            ));
        }

        if self.sma_short_window == 0 || self.sma_long_window == 0 || self.rsi_period == 0 {
            return Err(LensError::Config(
                "indicator windows must be greater than 0".to_string(),
            ));
        }

        if self.trend_threshold < 0.0 {
            return Err(LensError::Config(
                "trend_threshold must not be negative".to_string(),
            ));
        }

        Ok(())
    }

    /// Delay before the next attempt after `attempt` failed (1-based).
    /// Linear growth: base × attempt.
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        self.retry_delay_base * attempt
    }
}

/// Builder for [`AnalysisConfig`]
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    max_fetch_attempts: Option<u32>,
    retry_delay_base: Option<Duration>,
    request_timeout: Option<Duration>,
    news_context_limit: Option<usize>,
    trend_quarters: Option<usize>,
    trend_threshold: Option<f64>,
    sma_short_window: Option<usize>,
    sma_long_window: Option<usize>,
    rsi_period: Option<usize>,
}

impl AnalysisConfigBuilder {
    /// Set maximum fetch attempts
    pub fn max_fetch_attempts(mut self, attempts: u32) -> Self {
        self.max_fetch_attempts = Some(attempts);
        self
    }

    /// Set the base retry delay
    pub fn retry_delay_base(mut self, delay: Duration) -> Self {
        self.retry_delay_base = Some(delay);
        self
    }

    /// Set the upstream request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Set the news context cap
    pub fn news_context_limit(mut self, limit: usize) -> Self {
        self.news_context_limit = Some(limit);
        self
    }

    /// Set the number of quarters pulled into trend analysis
    pub fn trend_quarters(mut self, quarters: usize) -> Self {
        self.trend_quarters = Some(quarters);
        self
    }

    /// Set the significance threshold for trend summaries
    pub fn trend_threshold(mut self, threshold: f64) -> Self {
        self.trend_threshold = Some(threshold);
        self
    }

    /// Set the short SMA window
    pub fn sma_short_window(mut self, window: usize) -> Self {
        self.sma_short_window = Some(window);
        self
    }

    /// Set the long SMA window
    pub fn sma_long_window(mut self, window: usize) -> Self {
        self.sma_long_window = Some(window);
        self
    }

    /// Set the RSI lookback period
    pub fn rsi_period(mut self, period: usize) -> Self {
        self.rsi_period = Some(period);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AnalysisConfig> {
        let defaults = AnalysisConfig::default();

        let config = AnalysisConfig {
            max_fetch_attempts: self.max_fetch_attempts.unwrap_or(defaults.max_fetch_attempts),
            retry_delay_base: self.retry_delay_base.unwrap_or(defaults.retry_delay_base),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            news_context_limit: self.news_context_limit.unwrap_or(defaults.news_context_limit),
            trend_quarters: self.trend_quarters.unwrap_or(defaults.trend_quarters),
            trend_threshold: self.trend_threshold.unwrap_or(defaults.trend_threshold),
            sma_short_window: self.sma_short_window.unwrap_or(defaults.sma_short_window),
            sma_long_window: self.sma_long_window.unwrap_or(defaults.sma_long_window),
            rsi_period: self.rsi_period.unwrap_or(defaults.rsi_period),
        };

        config.validate()?;
        Ok(config)
    }
}
