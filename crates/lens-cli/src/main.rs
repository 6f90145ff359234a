//! Command-line transport adapter for the marketlens core
//!
//! A thin shell over `lens-stock`: every subcommand wires the injected
//! provider clients into the core and prints the result. Other transports
//! (HTTP, RPC) would consume the same core the same way.

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use lens_core::{FilingSearchRequest, NewsArticle, NewsProvider, Window};
use lens_llm::OpenAiGenerator;
use lens_stock::api::{EdgarClient, NewsApiClient, YahooQuoteClient};
use lens_stock::{AnalysisConfig, CompanyResearch, MarketAnalyst, StockDataFetcher};
use std::sync::Arc;
use tracing::warn;

#[derive(Parser, Debug)]
#[command(name = "marketlens")]
#[command(about = "Company intelligence and market analysis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch a stock snapshot with derived indicators
    Quote {
        symbol: String,
        /// History window: 1d, 5d, 1mo, 3mo, 1y
        #[arg(short, long, default_value = "5d")]
        window: String,
    },

    /// Quarter-over-quarter trends from quarterly filings
    Trends {
        symbol: String,
        #[arg(short, long, default_value_t = 4)]
        quarters: usize,
    },

    /// Recent filings organized by form type, with a summary
    Research {
        symbol: String,
        /// Company display name; defaults to the symbol
        #[arg(long)]
        company: Option<String>,
    },

    /// Generate a market analysis narrative
    Analyze {
        symbol: String,
        #[arg(long)]
        company: Option<String>,
        #[arg(short, long, default_value = "5d")]
        window: String,
    },

    /// Ask a financial question about a company
    Ask {
        symbol: String,
        question: String,
        #[arg(long)]
        company: Option<String>,
    },

    /// Full-text search across filings
    SearchFilings {
        query: String,
        #[arg(short, long)]
        symbol: Option<String>,
        /// Comma-separated form types (e.g. "10-K,10-Q")
        #[arg(long)]
        forms: Option<String>,
        /// YYYY-MM-DD
        #[arg(long)]
        start_date: Option<String>,
        /// YYYY-MM-DD
        #[arg(long)]
        end_date: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    lens_utils::init_tracing();

    let cli = Cli::parse();
    let config = AnalysisConfig::default();

    match cli.command {
        Command::Quote { symbol, window } => {
            let window = Window::parse(&window)?;
            let fetcher = StockDataFetcher::new(Arc::new(YahooQuoteClient::new()), config);
            let snapshot = fetcher.fetch_snapshot(&symbol, window).await?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }

        Command::Trends { symbol, quarters } => {
            let research = CompanyResearch::new(Arc::new(EdgarClient::from_env()), &config);
            let report = research.quarterly_trends(&symbol, quarters).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Command::Research { symbol, company } => {
            let company = company.unwrap_or_else(|| symbol.clone());
            let research = CompanyResearch::new(Arc::new(EdgarClient::from_env()), &config);
            let report = research.company_research(&symbol, &company).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Command::Analyze {
            symbol,
            company,
            window,
        } => {
            let window = Window::parse(&window)?;
            let company = company.unwrap_or_else(|| symbol.clone());
            let news = fetch_news(&company, config.news_context_limit).await;
            let analyst = build_analyst(config)?;

            let result = analyst
                .analyze_market(&company, &symbol, &news, window)
                .await;
            print_result(result)?;
        }

        Command::Ask {
            symbol,
            question,
            company,
        } => {
            let company = company.unwrap_or_else(|| symbol.clone());
            let news = fetch_news(&company, config.news_context_limit).await;
            let analyst = build_analyst(config)?;

            let result = analyst
                .answer_financial_question(&company, &symbol, &question, &news)
                .await;
            print_result(result)?;
        }

        Command::SearchFilings {
            query,
            symbol,
            forms,
            start_date,
            end_date,
            page,
        } => {
            let research = CompanyResearch::new(Arc::new(EdgarClient::from_env()), &config);
            let request = FilingSearchRequest {
                query,
                symbol,
                form_types: forms.map(|f| f.split(',').map(str::to_string).collect()),
                start_date,
                end_date,
                page,
            };
            let results = research.search_filings(&request).await?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
    }

    Ok(())
}

fn build_analyst(config: AnalysisConfig) -> anyhow::Result<MarketAnalyst> {
    let narrative =
        OpenAiGenerator::from_env().context("narrative backend configuration failed")?;

    Ok(MarketAnalyst::new(
        Arc::new(YahooQuoteClient::new()),
        Arc::new(EdgarClient::from_env()),
        Arc::new(narrative),
        config,
    ))
}

/// Fetch news for the prompt context. Missing credentials or provider
/// trouble degrade to an empty context rather than blocking the analysis.
async fn fetch_news(company: &str, limit: usize) -> Vec<NewsArticle> {
    let client = match NewsApiClient::from_env() {
        Ok(client) => client,
        Err(e) => {
            warn!(error = %e, "news provider not configured, continuing without news");
            return Vec::new();
        }
    };

    match client.company_news(company, limit).await {
        Ok(articles) => articles,
        Err(e) => {
            warn!(error = %e, "news fetch failed, continuing without news");
            Vec::new()
        }
    }
}

fn print_result(result: lens_stock::AnalysisResult) -> anyhow::Result<()> {
    if !result.success {
        bail!(
            "{}",
            result
                .error
                .unwrap_or_else(|| "analysis failed".to_string())
        );
    }

    println!("{}", result.analysis.unwrap_or_default());
    if let Some(stock) = result.stock {
        println!();
        println!("{}", serde_json::to_string_pretty(&stock)?);
    }
    Ok(())
}
