//! Stock snapshot types

use chrono::{DateTime, Utc};
use lens_core::Window;
use serde::{Deserialize, Serialize};

/// One plotted point of the price/volume series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartPoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    pub volume: u64,
}

/// Derived technical indicators.
///
/// Each field is absent when the window held too little data to compute it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TechnicalIndicators {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sma_short: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sma_long: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
}

/// Complete view of a symbol over one requested window.
///
/// Built fresh per request from live provider data and never mutated
/// afterwards. Either every field is populated from a successful fetch or
/// the fetch failed as a whole; there is no partial snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockSnapshot {
    pub symbol: String,
    pub window: Window,
    pub current_price: f64,
    /// Change from the previous close, in percent. Absent when the
    /// previous close was zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_change: Option<f64>,
    /// Most recent sampled volume
    pub volume: u64,
    /// Mean volume across the window
    pub average_volume: u64,
    /// Highest high in the window
    pub high: f64,
    /// Lowest low in the window
    pub low: f64,
    pub chart: Vec<ChartPoint>,
    pub indicators: TechnicalIndicators,
}
