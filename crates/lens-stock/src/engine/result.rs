//! Terminal analysis result types

use crate::market::StockSnapshot;
use serde::{Deserialize, Serialize};

/// Terminal artifact of a market analysis or financial question.
///
/// Failure states are carried in the value itself; no error crosses the
/// orchestrator boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub success: bool,
    /// Generated narrative, present on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
    /// Human-readable failure message, present on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Snapshot the narrative was generated from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<StockSnapshot>,
}

impl AnalysisResult {
    pub fn completed(analysis: impl Into<String>, stock: StockSnapshot) -> Self {
        Self {
            success: true,
            analysis: Some(analysis.into()),
            error: None,
            stock: Some(stock),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            analysis: None,
            error: Some(message.into()),
            stock: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_result_serialization() {
        let result = AnalysisResult::failed("quotes unreachable");
        let json = serde_json::to_string(&result).unwrap();

        assert!(json.contains("\"success\":false"));
        assert!(json.contains("quotes unreachable"));
        assert!(!json.contains("analysis"));
        assert!(!json.contains("stock"));
    }
}
