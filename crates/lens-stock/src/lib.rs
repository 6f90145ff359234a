//! Company intelligence core for marketlens
//!
//! Aggregates public-company information and turns it into
//! natural-language analyses:
//!
//! - Stock data fetching with bounded retry and derived indicators
//!   (SMA, RSI) via [`StockDataFetcher`]
//! - Financial metric extraction and quarter-over-quarter trend analysis
//!   from regulatory filings via [`CompanyResearch`]
//! - Orchestration of stock, news, and filings context into LLM-generated
//!   narratives via [`MarketAnalyst`]
//!
//! Upstream services sit behind the provider traits in `lens-core` and the
//! narrative seam in `lens-llm`; production clients live in [`api`].
//! Everything is request-scoped: no shared caches, no cross-request state.
//!
//! # Example
//!
//! ```rust,ignore
//! use lens_stock::{AnalysisConfig, MarketAnalyst};
//! use lens_stock::api::{EdgarClient, NewsApiClient, YahooQuoteClient};
//! use lens_core::{NewsProvider, Window};
//! use lens_llm::OpenAiGenerator;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let analyst = MarketAnalyst::new(
//!         Arc::new(YahooQuoteClient::new()),
//!         Arc::new(EdgarClient::from_env()),
//!         Arc::new(OpenAiGenerator::from_env()?),
//!         AnalysisConfig::default(),
//!     );
//!
//!     let news = NewsApiClient::from_env()?.company_news("Apple", 5).await?;
//!     let result = analyst
//!         .analyze_market("Apple", "AAPL", &news, Window::FiveDays)
//!         .await;
//!     println!("{}", result.analysis.unwrap_or_default());
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod engine;
pub mod filings;
pub mod market;
pub mod prompts;

// Re-export main types for convenience
pub use config::AnalysisConfig;
pub use engine::{AnalysisResult, MarketAnalyst};
pub use filings::{
    CompanyResearch, FilingPeriod, Metric, MetricExtractor, QuarterlyHighlights, ResearchReport,
    SearchResult, TrendAggregator, TrendPoint, TrendReport,
};
pub use market::{StockDataFetcher, StockSnapshot, TechnicalIndicators};
