//! Provider trait seams for the upstream collaborators
//!
//! The analysis core never talks to an upstream service directly; it is
//! handed trait objects at construction time. Production wiring injects the
//! HTTP clients from `lens-stock::api`, tests inject doubles.

use crate::error::Result;
use crate::model::{
    Filing, FilingSearchHit, FilingSearchRequest, FilingSections, FormType, Granularity,
    NewsArticle, PricePoint, SymbolInfo, Window,
};
use async_trait::async_trait;

/// Source of quotes and price history for a ticker symbol
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Lightweight metadata probe used to validate a symbol before any
    /// heavier request is made.
    async fn probe(&self, symbol: &str) -> Result<SymbolInfo>;

    /// Time-ordered price/volume history over the requested window.
    async fn history(
        &self,
        symbol: &str,
        window: Window,
        granularity: Granularity,
    ) -> Result<Vec<PricePoint>>;
}

/// Source of company news
#[async_trait]
pub trait NewsProvider: Send + Sync {
    /// Most recent articles matching the query, newest first.
    async fn company_news(&self, query: &str, limit: usize) -> Result<Vec<NewsArticle>>;
}

/// Source of regulatory filings
#[async_trait]
pub trait FilingsProvider: Send + Sync {
    /// Recent filings for a symbol, newest first, restricted to the given
    /// form types (all forms when empty).
    async fn recent_filings(
        &self,
        symbol: &str,
        form_types: &[FormType],
        limit: usize,
    ) -> Result<Vec<Filing>>;

    /// Fetch one filing document and slice out its free-text sections.
    async fn sections(&self, document_url: &str) -> Result<FilingSections>;

    /// Full-text search across filings.
    async fn search(&self, request: &FilingSearchRequest) -> Result<Vec<FilingSearchHit>>;
}
