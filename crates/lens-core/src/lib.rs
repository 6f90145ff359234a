//! Core contracts for the marketlens workspace
//!
//! This crate defines what the rest of the workspace agrees on:
//!
//! - the error taxonomy ([`LensError`]) used across every operation
//! - the domain models exchanged with upstream providers
//! - the provider traits ([`QuoteProvider`], [`NewsProvider`],
//!   [`FilingsProvider`]) behind which those providers sit
//!
//! Concrete provider clients live in `lens-stock::api`; the narrative
//! generation seam lives in `lens-llm`.

pub mod error;
pub mod model;
pub mod provider;

pub use error::{LensError, Result};
pub use model::{
    Filing, FilingSearchHit, FilingSearchRequest, FilingSections, FormType, Granularity,
    NewsArticle, PricePoint, SymbolInfo, Window,
};
pub use provider::{FilingsProvider, NewsProvider, QuoteProvider};
