//! NewsAPI-backed news provider

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use lens_core::{LensError, NewsArticle, NewsProvider, Result};
use reqwest::Client;
use serde::Deserialize;
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::debug;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

const NEWSAPI_EVERYTHING_URL: &str = "https://newsapi.org/v2/everything";

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    status: String,
    #[serde(default)]
    articles: Vec<WireArticle>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireArticle {
    source: WireSource,
    title: String,
    description: Option<String>,
    url: String,
    published_at: String,
}

#[derive(Debug, Deserialize)]
struct WireSource {
    name: String,
}

/// News client for the NewsAPI "everything" endpoint
pub struct NewsApiClient {
    client: Client,
    api_key: String,
    rate_limiter: SharedRateLimiter,
}

impl NewsApiClient {
    /// Create a client with the given API key and requests-per-minute quota
    pub fn new(api_key: impl Into<String>, rate_limit: u32) -> Self {
        let quota =
            Quota::per_minute(NonZeroU32::new(rate_limit).unwrap_or(NonZeroU32::new(60).unwrap()));

        Self {
            client: Client::new(),
            api_key: api_key.into(),
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }

    /// Create a client from the `NEWS_API_KEY` environment variable
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("NEWS_API_KEY")
            .map_err(|_| LensError::MissingCredentials("newsapi".to_string()))?;
        Ok(Self::new(api_key, 60))
    }
}

#[async_trait]
impl NewsProvider for NewsApiClient {
    async fn company_news(&self, query: &str, limit: usize) -> Result<Vec<NewsArticle>> {
        self.rate_limiter.until_ready().await;

        debug!(%query, limit, "fetching company news");

        let response = self
            .client
            .get(NEWSAPI_EVERYTHING_URL)
            .query(&[
                ("q", query),
                ("language", "en"),
                ("sortBy", "publishedAt"),
                ("pageSize", &limit.to_string()),
            ])
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LensError::UpstreamUnavailable {
                provider: "newsapi".to_string(),
                reason: format!("HTTP {status}: {body}"),
            });
        }

        let payload: EverythingResponse = response.json().await?;
        if payload.status != "ok" {
            return Err(LensError::UpstreamUnavailable {
                provider: "newsapi".to_string(),
                reason: payload.message.unwrap_or_else(|| payload.status.clone()),
            });
        }

        Ok(payload.articles.into_iter().map(NewsArticle::from).collect())
    }
}

impl From<WireArticle> for NewsArticle {
    fn from(article: WireArticle) -> Self {
        Self {
            title: article.title,
            description: article.description,
            url: article.url,
            published_at: article.published_at,
            source: article.source.name,
        }
    }
}
