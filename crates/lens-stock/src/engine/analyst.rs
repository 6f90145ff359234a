//! Market analysis orchestrator
//!
//! Assembles a stock snapshot, a news summary, and a filings summary into
//! one prompt context, hands it to the narrative backend, and returns an
//! [`AnalysisResult`]. Price data is the mandatory anchor: a fetcher
//! failure fails the whole analysis, while filings trouble degrades to a
//! placeholder.

use crate::config::AnalysisConfig;
use crate::engine::result::AnalysisResult;
use crate::filings::CompanyResearch;
use crate::market::{StockDataFetcher, StockSnapshot};
use crate::prompts;
use lens_core::{FilingsProvider, NewsArticle, QuoteProvider, Window};
use lens_llm::{NarrativeGenerator, NarrativeRequest};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Substituted for the filings summary when research is unavailable
const NO_FILINGS_PLACEHOLDER: &str = "No recent SEC filings found.";

/// Sampling temperature for generated narratives
const NARRATIVE_TEMPERATURE: f32 = 0.7;

/// Window used when a caller does not specify one
const DEFAULT_WINDOW: Window = Window::FiveDays;

/// Orchestrates stock, filings, and narrative collaborators into analyses
pub struct MarketAnalyst {
    fetcher: StockDataFetcher,
    research: CompanyResearch,
    narrative: Arc<dyn NarrativeGenerator>,
    config: AnalysisConfig,
}

impl MarketAnalyst {
    /// Wire an analyst from its injected collaborators
    pub fn new(
        quotes: Arc<dyn QuoteProvider>,
        filings: Arc<dyn FilingsProvider>,
        narrative: Arc<dyn NarrativeGenerator>,
        config: AnalysisConfig,
    ) -> Self {
        let fetcher = StockDataFetcher::new(quotes, config.clone());
        let research = CompanyResearch::new(filings, &config);

        Self {
            fetcher,
            research,
            narrative,
            config,
        }
    }

    /// Analyze recent market activity for a company.
    ///
    /// News items are capped before summarization; filings unavailability
    /// is never fatal. A stock-data failure after retry exhaustion fails
    /// the analysis as a whole.
    pub async fn analyze_market(
        &self,
        company_name: &str,
        symbol: &str,
        news: &[NewsArticle],
        window: Window,
    ) -> AnalysisResult {
        info!(%symbol, %window, "starting market analysis");

        let (snapshot, research) = tokio::join!(
            self.fetcher.fetch_snapshot(symbol, window),
            self.research.company_research(symbol, company_name),
        );

        let snapshot = match snapshot {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!(%symbol, error = %e, "market analysis failed");
                return AnalysisResult::failed(format!("Failed to analyze market data: {e}"));
            }
        };

        let sec_summary = match research {
            Ok(report) => report.filing_summary,
            Err(e) => {
                warn!(%symbol, error = %e, "filings research degraded, using placeholder");
                NO_FILINGS_PLACEHOLDER.to_string()
            }
        };

        let news_summary = prompts::summarize_headlines(news, self.config.news_context_limit);

        let prompt = match prompts::render_market_analysis(
            company_name,
            symbol,
            &snapshot,
            &news_summary,
            &sec_summary,
        ) {
            Ok(prompt) => prompt,
            Err(e) => return AnalysisResult::failed(format!("Failed to prepare analysis: {e}")),
        };

        self.generate(prompt, snapshot).await
    }

    /// Answer an ad-hoc financial question about a company.
    ///
    /// Uses the default window for the anchoring snapshot; degrades the
    /// filings context to empty when research fails.
    pub async fn answer_financial_question(
        &self,
        company_name: &str,
        symbol: &str,
        question: &str,
        news: &[NewsArticle],
    ) -> AnalysisResult {
        info!(%symbol, "answering financial question");

        let (snapshot, research) = tokio::join!(
            self.fetcher.fetch_snapshot(symbol, DEFAULT_WINDOW),
            self.research.company_research(symbol, company_name),
        );

        let snapshot = match snapshot {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!(%symbol, error = %e, "financial question failed");
                return AnalysisResult::failed(format!("Could not fetch stock data: {e}"));
            }
        };

        let sec_summary = research.map(|r| r.filing_summary).unwrap_or_default();
        let news_summary = prompts::summarize_articles(news, self.config.news_context_limit);

        let prompt = match prompts::render_financial_question(
            company_name,
            symbol,
            question,
            &snapshot,
            &news_summary,
            &sec_summary,
        ) {
            Ok(prompt) => prompt,
            Err(e) => return AnalysisResult::failed(format!("Failed to prepare analysis: {e}")),
        };

        self.generate(prompt, snapshot).await
    }

    async fn generate(&self, prompt: String, snapshot: StockSnapshot) -> AnalysisResult {
        let request = NarrativeRequest::new(prompt).with_temperature(NARRATIVE_TEMPERATURE);

        match self.narrative.generate(request).await {
            Ok(analysis) => {
                info!(symbol = %snapshot.symbol, "analysis completed");
                AnalysisResult::completed(analysis, snapshot)
            }
            Err(e) => {
                error!(symbol = %snapshot.symbol, error = %e, "narrative generation failed");
                AnalysisResult::failed(format!("Failed to generate analysis: {e}"))
            }
        }
    }
}
