//! Prompt templates for narrative generation
//!
//! Templates are MiniJinja; every variable is pre-formatted here so the
//! narrative backend receives plain display-ready text.

use crate::market::StockSnapshot;
use lens_core::{LensError, NewsArticle, Result};
use minijinja::Environment;

const MARKET_ANALYSIS_TEMPLATE: &str = r#"Analyze the market activity for {{ company_name }} ({{ symbol }}) based on the following data:

Stock Data:
- Current Price: ${{ current_price }}
- Price Change: {{ percent_change }}%
- Volume: {{ volume }}
- {{ window }} High: ${{ high }}
- {{ window }} Low: ${{ low }}

Recent News:
{{ news_summary }}

Recent SEC Filings:
{{ sec_summary }}

Provide a comprehensive analysis covering:
1. Key market movements and their likely causes
2. Important news developments and their impact
3. Significant regulatory filings and their implications
4. Overall market sentiment
5. Key takeaways for investors

Keep the analysis clear, factual, and focused on the most important points."#;

const FINANCIAL_QUESTION_TEMPLATE: &str = r#"You are a financial expert analyzing {{ company_name }} ({{ symbol }}).

Current Market Data:
- Current Price: ${{ current_price }}
- Price Change: {{ percent_change }}%
- Volume: {{ volume }}
- {{ window }} High: ${{ high }}
- {{ window }} Low: ${{ low }}

Recent News:
{{ news_summary }}

Recent SEC Filings:
{{ sec_summary }}

Question from a financial professional: {{ question }}

Provide a detailed, professional analysis focusing on:
- Relevant market metrics and their implications
- Impact of recent news and developments
- Insights from recent regulatory filings
- Technical and fundamental factors
- Potential risks and opportunities
- Professional recommendations or considerations

Keep the response concise but thorough, using financial terminology appropriate for a professional audience."#;

/// Render the market analysis prompt
pub fn render_market_analysis(
    company_name: &str,
    symbol: &str,
    snapshot: &StockSnapshot,
    news_summary: &str,
    sec_summary: &str,
) -> Result<String> {
    render(
        MARKET_ANALYSIS_TEMPLATE,
        &snapshot_vars(company_name, symbol, snapshot, news_summary, sec_summary, None),
    )
}

/// Render the ad-hoc financial question prompt
pub fn render_financial_question(
    company_name: &str,
    symbol: &str,
    question: &str,
    snapshot: &StockSnapshot,
    news_summary: &str,
    sec_summary: &str,
) -> Result<String> {
    render(
        FINANCIAL_QUESTION_TEMPLATE,
        &snapshot_vars(
            company_name,
            symbol,
            snapshot,
            news_summary,
            sec_summary,
            Some(question),
        ),
    )
}

/// News context for the analysis prompt: headline and publish time per line
pub fn summarize_headlines(articles: &[NewsArticle], limit: usize) -> String {
    articles
        .iter()
        .take(limit)
        .map(|a| format!("- {} ({})", a.title, a.published_at))
        .collect::<Vec<_>>()
        .join("\n")
}

/// News context for the question prompt: headline and description per line
pub fn summarize_articles(articles: &[NewsArticle], limit: usize) -> String {
    articles
        .iter()
        .take(limit)
        .map(|a| {
            format!(
                "- {}: {}",
                a.title,
                a.description.as_deref().unwrap_or_default()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn snapshot_vars(
    company_name: &str,
    symbol: &str,
    snapshot: &StockSnapshot,
    news_summary: &str,
    sec_summary: &str,
    question: Option<&str>,
) -> serde_json::Value {
    serde_json::json!({
        "company_name": company_name,
        "symbol": symbol,
        "current_price": format!("{:.2}", snapshot.current_price),
        "percent_change": snapshot
            .percent_change
            .map_or_else(|| "n/a".to_string(), |c| format!("{c:.2}")),
        "volume": group_thousands(snapshot.volume),
        "high": format!("{:.2}", snapshot.high),
        "low": format!("{:.2}", snapshot.low),
        "window": snapshot.window.as_str(),
        "news_summary": news_summary,
        "sec_summary": sec_summary,
        "question": question,
    })
}

fn render(template: &str, vars: &serde_json::Value) -> Result<String> {
    let env = Environment::new();
    env.render_str(template, minijinja::value::Value::from_serialize(vars))
        .map_err(|e| LensError::ParseFailure(format!("prompt render failed: {e}")))
}

/// Digit grouping for display (12345678 -> "12,345,678")
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
