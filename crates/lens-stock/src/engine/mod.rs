//! Analysis orchestration

pub mod analyst;
pub mod result;

pub use analyst::MarketAnalyst;
pub use result::AnalysisResult;
