//! Quarter-over-quarter trend aggregation
//!
//! Takes the metric values extracted from a run of quarterly filings
//! (most recent first) and computes period-over-period percentage deltas,
//! plus a one-line summary of the significant moves.

use crate::filings::extract::Metric;
use crate::market::indicators::percent_change;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metric values extracted from one filing period.
///
/// Values keep their document form (commas intact); parsing happens at
/// aggregation time. Immutable once extracted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilingPeriod {
    /// Period-end date string (YYYY-MM-DD)
    pub period_end: String,
    /// Extracted metric values; a metric missing from the filing text is
    /// simply absent
    pub metrics: BTreeMap<Metric, String>,
}

/// One computed period-over-period change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Period-end of the more recent filing in the pair
    pub period: String,
    /// Percent change vs. the prior period, rounded to 2 decimals
    pub change: f64,
}

/// Per-metric change series plus a generated summary.
///
/// Recomputed on every aggregation call; never cached or persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendReport {
    /// Change series per metric, most recent pair first
    pub trends: BTreeMap<Metric, Vec<TrendPoint>>,
    /// Human-readable summary of the significant moves
    pub summary: String,
    /// The filing periods the report was computed from
    pub periods: Vec<FilingPeriod>,
}

/// Computes [`TrendReport`]s from extracted filing periods
pub struct TrendAggregator {
    threshold: f64,
}

impl TrendAggregator {
    /// `threshold` is the absolute percent change above which a metric's
    /// latest move is called out in the summary.
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Aggregate `periods` (ordered most recent first) into a report.
    ///
    /// A (current, previous) pair is skipped silently when either value is
    /// missing, either value fails to parse, or the previous value is zero.
    /// Skips never fail the aggregation.
    pub fn aggregate(&self, periods: &[FilingPeriod]) -> TrendReport {
        let mut trends: BTreeMap<Metric, Vec<TrendPoint>> = BTreeMap::new();

        for metric in Metric::ALL {
            let mut series = Vec::new();

            for pair in periods.windows(2) {
                let (current, previous) = (&pair[0], &pair[1]);

                let Some(current_value) =
                    current.metrics.get(&metric).and_then(|v| parse_numeric(v))
                else {
                    continue;
                };
                let Some(previous_value) =
                    previous.metrics.get(&metric).and_then(|v| parse_numeric(v))
                else {
                    continue;
                };

                if let Some(change) = percent_change(current_value, previous_value) {
                    series.push(TrendPoint {
                        period: current.period_end.clone(),
                        change,
                    });
                }
            }

            trends.insert(metric, series);
        }

        let summary = self.summarize(&trends);

        TrendReport {
            trends,
            summary,
            periods: periods.to_vec(),
        }
    }

    /// One clause per metric whose most recent change clears the threshold,
    /// joined with " | ".
    fn summarize(&self, trends: &BTreeMap<Metric, Vec<TrendPoint>>) -> String {
        let mut clauses = Vec::new();

        for metric in Metric::ALL {
            let Some(latest) = trends.get(&metric).and_then(|series| series.first()) else {
                continue;
            };

            if latest.change.abs() > self.threshold {
                let direction = if latest.change > 0.0 {
                    "increased"
                } else {
                    "decreased"
                };
                clauses.push(format!(
                    "{} {} by {:.1}% compared to previous quarter",
                    metric.label(),
                    direction,
                    latest.change.abs()
                ));
            }
        }

        if clauses.is_empty() {
            "No significant quarter-over-quarter changes detected.".to_string()
        } else {
            clauses.join(" | ")
        }
    }
}

/// Parse a document-form numeric string, stripping thousands separators
fn parse_numeric(raw: &str) -> Option<f64> {
    raw.replace(',', "").trim().parse::<f64>().ok()
}
