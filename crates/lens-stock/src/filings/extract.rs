//! Financial metric extraction from filing text
//!
//! Pulls named figures out of unstructured filing prose by pattern
//! matching. Extraction is a pure function of (text, metric): no side
//! effects, and a miss is an `Option::None`, never an error.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Financial metrics tracked across quarterly filings
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Revenue,
    NetIncome,
    Eps,
    Cash,
}

impl Metric {
    /// All tracked metrics, in reporting order
    pub const ALL: [Metric; 4] = [Metric::Revenue, Metric::NetIncome, Metric::Eps, Metric::Cash];

    /// Human-readable label used in generated summaries
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Revenue => "Revenue",
            Metric::NetIncome => "Net Income",
            Metric::Eps => "EPS",
            Metric::Cash => "Cash",
        }
    }
}

/// Extracts tracked metrics from filing text via per-metric patterns.
///
/// Matching is case-insensitive and the first match in document order wins;
/// no disambiguation between multiple candidate phrases is attempted. The
/// captured value keeps the document's digit grouping (commas intact).
pub struct MetricExtractor {
    revenue: Regex,
    net_income: Regex,
    eps: Regex,
    cash: Regex,
}

impl MetricExtractor {
    pub fn new() -> Self {
        // Static patterns; compilation cannot fail.
        Self {
            revenue: Regex::new(
                r"(?i)Total revenues?\s*(?:of)?\s*\$?([\d,]+(?:\.\d+)?)\s*(?:million|billion)?",
            )
            .unwrap(),
            net_income: Regex::new(
                r"(?i)Net incomes?\s*(?:of)?\s*\$?([\d,]+(?:\.\d+)?)\s*(?:million|billion)?",
            )
            .unwrap(),
            eps: Regex::new(r"(?i)Earnings per shares?\s*(?:of)?\s*\$?([\d,]+(?:\.\d+)?)").unwrap(),
            cash: Regex::new(
                r"(?i)Cash and cash equivalents?\s*(?:of)?\s*\$?([\d,]+(?:\.\d+)?)\s*(?:million|billion)?",
            )
            .unwrap(),
        }
    }

    /// Extract one metric from `text`. Absent text is a miss, not an error.
    pub fn extract(&self, text: Option<&str>, metric: Metric) -> Option<String> {
        let text = text?;
        let pattern = match metric {
            Metric::Revenue => &self.revenue,
            Metric::NetIncome => &self.net_income,
            Metric::Eps => &self.eps,
            Metric::Cash => &self.cash,
        };

        pattern
            .captures(text)
            .map(|captures| captures[1].to_string())
    }

    /// Extract every tracked metric from `text`
    pub fn extract_all(
        &self,
        text: Option<&str>,
    ) -> std::collections::BTreeMap<Metric, String> {
        Metric::ALL
            .iter()
            .filter_map(|metric| {
                self.extract(text, *metric).map(|value| (*metric, value))
            })
            .collect()
    }
}

impl Default for MetricExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_grouped_revenue() {
        let extractor = MetricExtractor::new();
        let text = "The company reported total revenue of $1,234.5 million for the quarter.";

        assert_eq!(
            extractor.extract(Some(text), Metric::Revenue),
            Some("1,234.5".to_string())
        );
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let extractor = MetricExtractor::new();
        let text = "TOTAL REVENUES OF $500 MILLION were recorded.";

        assert_eq!(
            extractor.extract(Some(text), Metric::Revenue),
            Some("500".to_string())
        );
    }

    #[test]
    fn test_first_match_wins() {
        let extractor = MetricExtractor::new();
        let text = "Net income of $10 million, compared to net income of $20 million last year.";

        assert_eq!(
            extractor.extract(Some(text), Metric::NetIncome),
            Some("10".to_string())
        );
    }

    #[test]
    fn test_no_match_yields_none() {
        let extractor = MetricExtractor::new();
        let text = "Nothing numeric to see here.";

        assert_eq!(extractor.extract(Some(text), Metric::Revenue), None);
        assert_eq!(extractor.extract(Some(text), Metric::Cash), None);
    }

    #[test]
    fn test_absent_text_is_a_miss_not_an_error() {
        let extractor = MetricExtractor::new();

        assert_eq!(extractor.extract(None, Metric::Revenue), None);
        assert_eq!(extractor.extract(Some(""), Metric::Eps), None);
    }

    #[test]
    fn test_extract_all() {
        let extractor = MetricExtractor::new();
        let text = "Total revenue of $2,000 million. Net income of $350.2 million. \
                    Earnings per share of $1.25. Cash and cash equivalents of $8,400 million.";

        let metrics = extractor.extract_all(Some(text));
        assert_eq!(metrics.len(), 4);
        assert_eq!(metrics[&Metric::Revenue], "2,000");
        assert_eq!(metrics[&Metric::NetIncome], "350.2");
        assert_eq!(metrics[&Metric::Eps], "1.25");
        assert_eq!(metrics[&Metric::Cash], "8,400");
    }

    #[test]
    fn test_eps_without_currency_suffix() {
        let extractor = MetricExtractor::new();
        let text = "Earnings per share of 0.87 for the period.";

        assert_eq!(
            extractor.extract(Some(text), Metric::Eps),
            Some("0.87".to_string())
        );
    }
}
