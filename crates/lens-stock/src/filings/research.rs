//! Company filings research
//!
//! Organizes a company's recent regulatory filings, generates a
//! human-readable filing summary, extracts quarterly highlights, and runs
//! the quarterly trend pipeline (filings → sections → metric extraction →
//! aggregation).

use crate::config::AnalysisConfig;
use crate::filings::extract::{Metric, MetricExtractor};
use crate::filings::trends::{FilingPeriod, TrendAggregator, TrendReport};
use lens_core::{Filing, FilingSearchHit, FilingSearchRequest, FilingsProvider, FormType, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Form types pulled into company research
const RESEARCH_FORMS: [FormType; 3] = [FormType::Form10K, FormType::Form10Q, FormType::Form8K];

/// Filings fetched per research request
const RESEARCH_FILING_LIMIT: usize = 50;

/// Minimum length for a paragraph to count as substantial
const PARAGRAPH_MIN_CHARS: usize = 100;

/// Key metrics and prose highlights extracted from one quarterly filing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuarterlyHighlights {
    pub metrics: BTreeMap<Metric, String>,
    /// Leading discussion paragraphs from management commentary
    pub highlights: Vec<String>,
    /// Leading risk-factor paragraphs
    pub risks: Vec<String>,
}

/// A company's recent filings, organized and summarized
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchReport {
    /// Filings keyed by form type
    pub filings: BTreeMap<String, Vec<Filing>>,
    /// One-line human-readable summary of recent filing activity
    pub filing_summary: String,
    /// Quarterly trend analysis, when obtainable
    pub trends: Option<TrendReport>,
}

/// One full-text search hit, optionally enriched with quarterly highlights
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub hit: FilingSearchHit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quarterly_highlights: Option<QuarterlyHighlights>,
}

/// Filings research service
pub struct CompanyResearch {
    filings: Arc<dyn FilingsProvider>,
    extractor: MetricExtractor,
    aggregator: TrendAggregator,
    trend_quarters: usize,
}

impl CompanyResearch {
    pub fn new(filings: Arc<dyn FilingsProvider>, config: &AnalysisConfig) -> Self {
        Self {
            filings,
            extractor: MetricExtractor::new(),
            aggregator: TrendAggregator::new(config.trend_threshold),
            trend_quarters: config.trend_quarters,
        }
    }

    /// Research a company: recent filings organized by form type, a filing
    /// summary line, and quarterly trends when the 10-Q pipeline succeeds.
    ///
    /// Trend failures degrade to `trends: None`; a filings-provider failure
    /// is returned to the caller, who decides whether it is fatal.
    pub async fn company_research(
        &self,
        symbol: &str,
        company_name: &str,
    ) -> Result<ResearchReport> {
        info!(%symbol, "fetching recent filings");

        let recent = self
            .filings
            .recent_filings(symbol, &RESEARCH_FORMS, RESEARCH_FILING_LIMIT)
            .await?;

        let mut organized: BTreeMap<String, Vec<Filing>> = RESEARCH_FORMS
            .iter()
            .map(|form| (form.as_str().to_string(), Vec::new()))
            .collect();
        for filing in recent {
            if let Some(bucket) = organized.get_mut(&filing.form_type) {
                bucket.push(filing);
            }
        }

        let filing_summary = generate_filing_summary(&organized, company_name);

        let trends = match self.quarterly_trends(symbol, self.trend_quarters).await {
            Ok(report) => Some(report),
            Err(e) => {
                warn!(%symbol, error = %e, "quarterly trend analysis unavailable");
                None
            }
        };

        Ok(ResearchReport {
            filings: organized,
            filing_summary,
            trends,
        })
    }

    /// Compute quarter-over-quarter trends from the most recent quarterly
    /// filings.
    ///
    /// A failure to list the filings is the dependency failure of the
    /// aggregation and is returned as an error value. Individual filings
    /// whose documents cannot be fetched are skipped.
    pub async fn quarterly_trends(&self, symbol: &str, num_quarters: usize) -> Result<TrendReport> {
        let quarterly = self
            .filings
            .recent_filings(symbol, &[FormType::Form10Q], num_quarters)
            .await?;

        let mut periods = Vec::new();
        for filing in &quarterly {
            let sections = match self.filings.sections(&filing.document_url).await {
                Ok(sections) => sections,
                Err(e) => {
                    warn!(
                        accession = %filing.accession_number,
                        error = %e,
                        "skipping filing with unreadable document"
                    );
                    continue;
                }
            };

            let metrics = self
                .extractor
                .extract_all(sections.financial_statements.as_deref());
            debug!(
                accession = %filing.accession_number,
                extracted = metrics.len(),
                "extracted quarterly metrics"
            );

            periods.push(FilingPeriod {
                period_end: filing
                    .period_of_report
                    .clone()
                    .unwrap_or_else(|| filing.filed_date.clone()),
                metrics,
            });
        }

        Ok(self.aggregator.aggregate(&periods))
    }

    /// Extract metrics and prose highlights from one filing document
    pub async fn quarterly_highlights(&self, document_url: &str) -> Result<QuarterlyHighlights> {
        let sections = self.filings.sections(document_url).await?;

        Ok(QuarterlyHighlights {
            metrics: self
                .extractor
                .extract_all(sections.financial_statements.as_deref()),
            highlights: substantial_paragraphs(sections.management_discussion.as_deref(), 3),
            risks: substantial_paragraphs(sections.risk_factors.as_deref(), 3),
        })
    }

    /// Full-text search across filings. Quarterly hits with a readable
    /// document are enriched with extracted highlights.
    pub async fn search_filings(
        &self,
        request: &FilingSearchRequest,
    ) -> Result<Vec<SearchResult>> {
        let hits = self.filings.search(request).await?;

        let mut results = Vec::with_capacity(hits.len());
        for hit in hits {
            let quarterly_highlights = match (&hit.form_type, &hit.document_url) {
                (form, Some(url)) if form == "10-Q" => {
                    self.quarterly_highlights(url).await.ok()
                }
                _ => None,
            };
            results.push(SearchResult {
                hit,
                quarterly_highlights,
            });
        }

        Ok(results)
    }
}

/// One-line summary of recent filing activity
fn generate_filing_summary(filings: &BTreeMap<String, Vec<Filing>>, company_name: &str) -> String {
    let mut parts = Vec::new();

    if let Some(latest_10k) = filings.get("10-K").and_then(|f| f.first()) {
        let mut line = format!(
            "Most recent annual report (10-K) filed on {}",
            latest_10k.filed_date
        );
        if let Some(period) = &latest_10k.period_of_report {
            line.push_str(&format!(" for period ending {period}"));
        }
        parts.push(line);
    }

    if let Some(quarterly) = filings.get("10-Q").filter(|f| !f.is_empty()) {
        let recent = &quarterly[..quarterly.len().min(3)];
        let mut line = format!(
            "Filed {} quarterly reports (10-Q) in the past year",
            recent.len()
        );
        let periods: Vec<&str> = recent
            .iter()
            .filter_map(|f| f.period_of_report.as_deref())
            .collect();
        if !periods.is_empty() {
            line.push_str(&format!(" for periods ending {}", periods.join(", ")));
        }
        parts.push(line);
    }

    if let Some(events) = filings.get("8-K").filter(|f| !f.is_empty()) {
        parts.push(format!(
            "Filed {} material event notices (8-K) recently",
            events.len().min(5)
        ));
    }

    if parts.is_empty() {
        return format!("No significant SEC filings found for {company_name} in the past year.");
    }

    parts.join(" | ")
}

/// First `limit` paragraphs long enough to carry substance
fn substantial_paragraphs(text: Option<&str>, limit: usize) -> Vec<String> {
    let Some(text) = text else {
        return Vec::new();
    };

    text.split("\n\n")
        .map(str::trim)
        .filter(|p| p.len() > PARAGRAPH_MIN_CHARS)
        .take(limit)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lens_core::{FilingSections, LensError};
    use mockall::mock;

    mock! {
        Filings {}

        #[async_trait]
        impl FilingsProvider for Filings {
            async fn recent_filings(
                &self,
                symbol: &str,
                form_types: &[FormType],
                limit: usize,
            ) -> Result<Vec<Filing>>;
            async fn sections(&self, document_url: &str) -> Result<FilingSections>;
            async fn search(&self, request: &FilingSearchRequest) -> Result<Vec<FilingSearchHit>>;
        }
    }

    fn filing(form: &str, filed: &str, period: Option<&str>, url: &str) -> Filing {
        Filing {
            accession_number: format!("acc-{filed}"),
            form_type: form.to_string(),
            filed_date: filed.to_string(),
            period_of_report: period.map(str::to_string),
            description: None,
            document_url: url.to_string(),
        }
    }

    fn research(provider: MockFilings) -> CompanyResearch {
        CompanyResearch::new(Arc::new(provider), &AnalysisConfig::default())
    }

    fn unavailable() -> LensError {
        LensError::UpstreamUnavailable {
            provider: "sec-edgar".to_string(),
            reason: "HTTP 503".to_string(),
        }
    }

    #[test]
    fn test_filing_summary_formatting() {
        let mut organized: BTreeMap<String, Vec<Filing>> = BTreeMap::new();
        organized.insert(
            "10-K".to_string(),
            vec![filing("10-K", "2024-02-01", Some("2023-12-31"), "u")],
        );
        organized.insert(
            "10-Q".to_string(),
            vec![
                filing("10-Q", "2024-11-01", Some("2024-09-30"), "u"),
                filing("10-Q", "2024-08-01", Some("2024-06-30"), "u"),
            ],
        );
        organized.insert(
            "8-K".to_string(),
            vec![filing("8-K", "2024-10-15", None, "u")],
        );

        let summary = generate_filing_summary(&organized, "Apple");
        assert!(summary.contains("Most recent annual report (10-K) filed on 2024-02-01"));
        assert!(summary.contains("for period ending 2023-12-31"));
        assert!(summary.contains("Filed 2 quarterly reports (10-Q)"));
        assert!(summary.contains("periods ending 2024-09-30, 2024-06-30"));
        assert!(summary.contains("Filed 1 material event notices (8-K)"));
        assert_eq!(summary.matches(" | ").count(), 2);
    }

    #[test]
    fn test_filing_summary_empty() {
        let summary = generate_filing_summary(&BTreeMap::new(), "Tesla");
        assert_eq!(
            summary,
            "No significant SEC filings found for Tesla in the past year."
        );
    }

    #[test]
    fn test_substantial_paragraphs_filters_short_ones() {
        let long = "x".repeat(150);
        let text = format!("short\n\n{long}\n\ntiny\n\n{long}\n\n{long}\n\n{long}");

        let paragraphs = substantial_paragraphs(Some(&text), 3);
        assert_eq!(paragraphs.len(), 3);
        assert!(paragraphs.iter().all(|p| p.len() > 100));

        assert!(substantial_paragraphs(None, 3).is_empty());
    }

    #[tokio::test]
    async fn test_quarterly_trends_pipeline() {
        let mut provider = MockFilings::new();
        provider.expect_recent_filings().returning(|_, _, _| {
            Ok(vec![
                filing("10-Q", "2024-11-01", Some("2024-09-30"), "doc-q0"),
                filing("10-Q", "2024-08-01", Some("2024-06-30"), "doc-q1"),
            ])
        });
        provider.expect_sections().returning(|url| {
            let text = if url == "doc-q0" {
                "Total revenue of $200 million for the quarter."
            } else {
                "Total revenue of $100 million for the quarter."
            };
            Ok(FilingSections {
                financial_statements: Some(text.to_string()),
                ..Default::default()
            })
        });

        let report = research(provider)
            .quarterly_trends("AAPL", 4)
            .await
            .unwrap();

        let series = &report.trends[&Metric::Revenue];
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].period, "2024-09-30");
        assert!((series[0].change - 100.0).abs() < f64::EPSILON);
        assert!(report.summary.contains("Revenue increased by 100.0%"));
    }

    #[tokio::test]
    async fn test_quarterly_trends_dependency_failure() {
        let mut provider = MockFilings::new();
        provider
            .expect_recent_filings()
            .returning(|_, _, _| Err(unavailable()));

        let result = research(provider).quarterly_trends("AAPL", 4).await;
        assert!(matches!(
            result,
            Err(LensError::UpstreamUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_unreadable_document_is_skipped() {
        let mut provider = MockFilings::new();
        provider.expect_recent_filings().returning(|_, _, _| {
            Ok(vec![
                filing("10-Q", "2024-11-01", Some("2024-09-30"), "doc-ok"),
                filing("10-Q", "2024-08-01", Some("2024-06-30"), "doc-bad"),
            ])
        });
        provider.expect_sections().returning(|url| {
            if url == "doc-bad" {
                Err(unavailable())
            } else {
                Ok(FilingSections {
                    financial_statements: Some("Total revenue of $100 million.".to_string()),
                    ..Default::default()
                })
            }
        });

        let report = research(provider)
            .quarterly_trends("AAPL", 4)
            .await
            .unwrap();

        // One period left, so no pairs and no failures
        assert_eq!(report.periods.len(), 1);
        assert!(report.trends[&Metric::Revenue].is_empty());
    }

    #[tokio::test]
    async fn test_company_research_degrades_trends() {
        let mut provider = MockFilings::new();
        provider.expect_recent_filings().returning(|_, forms, _| {
            if matches!(forms, [FormType::Form10Q]) {
                // Trend pipeline fails; research still succeeds
                Err(unavailable())
            } else {
                Ok(vec![filing("10-K", "2024-02-01", Some("2023-12-31"), "u")])
            }
        });

        let report = research(provider)
            .company_research("AAPL", "Apple")
            .await
            .unwrap();

        assert!(report.trends.is_none());
        assert!(report.filing_summary.contains("10-K"));
        assert_eq!(report.filings["10-K"].len(), 1);
    }

    #[tokio::test]
    async fn test_search_enriches_quarterly_hits() {
        let mut provider = MockFilings::new();
        provider.expect_search().returning(|_| {
            Ok(vec![
                FilingSearchHit {
                    accession_number: "a1".to_string(),
                    company_name: Some("Apple Inc".to_string()),
                    ticker: Some("AAPL".to_string()),
                    form_type: "10-Q".to_string(),
                    description: None,
                    filed_at: Some("2024-11-01".to_string()),
                    document_url: Some("doc-q".to_string()),
                },
                FilingSearchHit {
                    accession_number: "a2".to_string(),
                    company_name: None,
                    ticker: None,
                    form_type: "8-K".to_string(),
                    description: None,
                    filed_at: None,
                    document_url: Some("doc-8k".to_string()),
                },
            ])
        });
        provider.expect_sections().returning(|_| {
            Ok(FilingSections {
                financial_statements: Some("Net income of $42 million.".to_string()),
                ..Default::default()
            })
        });

        let results = research(provider)
            .search_filings(&FilingSearchRequest::new("supply chain"))
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        let highlights = results[0].quarterly_highlights.as_ref().unwrap();
        assert_eq!(highlights.metrics[&Metric::NetIncome], "42");
        assert!(results[1].quarterly_highlights.is_none());
    }
}
