//! Domain models shared between providers and the analysis core

use crate::error::{LensError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Requested history window for price data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Window {
    /// Last trading day
    #[serde(rename = "1d")]
    OneDay,
    /// Last five trading days
    #[serde(rename = "5d")]
    FiveDays,
    /// Last month
    #[serde(rename = "1mo")]
    OneMonth,
    /// Last three months
    #[serde(rename = "3mo")]
    ThreeMonths,
    /// Last year
    #[serde(rename = "1y")]
    OneYear,
}

/// Sampling granularity of a price series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Granularity {
    /// One point per hour
    Hourly,
    /// One point per trading day
    Daily,
}

impl Window {
    pub fn as_str(&self) -> &'static str {
        match self {
            Window::OneDay => "1d",
            Window::FiveDays => "5d",
            Window::OneMonth => "1mo",
            Window::ThreeMonths => "3mo",
            Window::OneYear => "1y",
        }
    }

    /// Parse a window from its wire form ("1d", "5d", "1mo", "3mo", "1y")
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "1d" => Ok(Window::OneDay),
            "5d" => Ok(Window::FiveDays),
            "1mo" => Ok(Window::OneMonth),
            "3mo" => Ok(Window::ThreeMonths),
            "1y" => Ok(Window::OneYear),
            other => Err(LensError::Config(format!("Invalid period: {other}"))),
        }
    }

    /// Sampling granularity for this window.
    ///
    /// Short windows sample sub-daily so intraday movement is visible;
    /// everything else samples daily. Fixed policy, not user-configurable.
    pub fn granularity(&self) -> Granularity {
        match self {
            Window::OneDay | Window::FiveDays => Granularity::Hourly,
            _ => Granularity::Daily,
        }
    }
}

impl std::fmt::Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Granularity {
    /// Interval string understood by the quote provider ("60m" or "1d")
    pub fn as_interval(&self) -> &'static str {
        match self {
            Granularity::Hourly => "60m",
            Granularity::Daily => "1d",
        }
    }
}

/// Regulatory filing form type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormType {
    /// Annual report
    #[serde(rename = "10-K")]
    Form10K,
    /// Quarterly report
    #[serde(rename = "10-Q")]
    Form10Q,
    /// Current report (material events)
    #[serde(rename = "8-K")]
    Form8K,
}

impl FormType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormType::Form10K => "10-K",
            FormType::Form10Q => "10-Q",
            FormType::Form8K => "8-K",
        }
    }
}

/// One sampled point of a price/volume series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Identity metadata returned by the symbol probe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub symbol: String,
    pub name: Option<String>,
    pub exchange: Option<String>,
}

/// One news record as returned by the news provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    /// Publish timestamp in the provider's wire form (RFC 3339)
    pub published_at: String,
    pub source: String,
}

/// Metadata for one regulatory filing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Filing {
    /// Unique filing identifier assigned by the regulator
    pub accession_number: String,
    /// Form type (10-K, 10-Q, 8-K, ...)
    pub form_type: String,
    /// Date the filing was submitted (YYYY-MM-DD)
    pub filed_date: String,
    /// Reporting period covered by the filing, when present
    pub period_of_report: Option<String>,
    pub description: Option<String>,
    /// URL of the primary document
    pub document_url: String,
}

/// Free-text sections sliced out of one filing document.
///
/// Any section may be absent; extraction degrades per section rather than
/// failing the filing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilingSections {
    pub financial_statements: Option<String>,
    pub management_discussion: Option<String>,
    pub risk_factors: Option<String>,
}

/// Full-text filings search request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilingSearchRequest {
    pub query: String,
    pub symbol: Option<String>,
    pub form_types: Option<Vec<String>>,
    /// YYYY-MM-DD
    pub start_date: Option<String>,
    /// YYYY-MM-DD
    pub end_date: Option<String>,
    /// 1-based page number
    pub page: u32,
}

impl FilingSearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
            ..Default::default()
        }
    }
}

/// One hit from a full-text filings search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilingSearchHit {
    pub accession_number: String,
    pub company_name: Option<String>,
    pub ticker: Option<String>,
    pub form_type: String,
    pub description: Option<String>,
    pub filed_at: Option<String>,
    pub document_url: Option<String>,
}
