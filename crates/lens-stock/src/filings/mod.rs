//! Filing text analysis: metric extraction, trend aggregation, research

pub mod extract;
pub mod research;
pub mod trends;

pub use extract::{Metric, MetricExtractor};
pub use research::{CompanyResearch, QuarterlyHighlights, ResearchReport, SearchResult};
pub use trends::{FilingPeriod, TrendAggregator, TrendPoint, TrendReport};
