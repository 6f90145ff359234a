//! SEC EDGAR filings provider
//!
//! EDGAR is the SEC's public filing system. Fair-access policy allows 10
//! requests per second and requires a User-Agent naming the application and
//! a contact email.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use lens_core::{
    Filing, FilingSearchHit, FilingSearchRequest, FilingSections, FilingsProvider, FormType,
    LensError, Result,
};
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::debug;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

const SEC_BASE_URL: &str = "https://data.sec.gov";
const SEC_COMPANY_TICKERS_URL: &str = "https://www.sec.gov/files/company_tickers.json";
const SEC_FULL_TEXT_SEARCH_URL: &str = "https://efts.sec.gov/LATEST/search-index";

/// How far back recent_filings reaches
const FILING_LOOKBACK_DAYS: i64 = 365;

/// Results per full-text search page
const SEARCH_PAGE_SIZE: u32 = 10;

#[derive(Debug, Deserialize)]
struct CompanySubmissions {
    filings: FilingsData,
}

#[derive(Debug, Deserialize)]
struct FilingsData {
    recent: RecentFilings,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecentFilings {
    accession_number: Vec<String>,
    filing_date: Vec<String>,
    report_date: Vec<Option<String>>,
    form: Vec<String>,
    primary_document: Vec<String>,
    primary_doc_description: Vec<Option<String>>,
}

/// SEC EDGAR client
pub struct EdgarClient {
    client: Client,
    user_agent: String,
    rate_limiter: SharedRateLimiter,
    slicer: SectionSlicer,
}

impl EdgarClient {
    /// Create a client identifying itself with the given application name
    /// and contact email (both required by the SEC).
    pub fn new(app_name: impl Into<String>, contact_email: impl Into<String>) -> Self {
        Self::with_user_agent(format!("{} ({})", app_name.into(), contact_email.into()))
    }

    /// Create from the `SEC_USER_AGENT` environment variable, with a
    /// default identity as fallback.
    pub fn from_env() -> Self {
        let user_agent = std::env::var("SEC_USER_AGENT")
            .unwrap_or_else(|_| "marketlens (marketlens@example.com)".to_string());
        Self::with_user_agent(user_agent)
    }

    fn with_user_agent(user_agent: String) -> Self {
        // SEC allows 10 requests per second
        let quota = Quota::per_second(NonZeroU32::new(10).unwrap());

        Self {
            client: Client::new(),
            user_agent,
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
            slicer: SectionSlicer::new(),
        }
    }

    async fn get_json(&self, url: &str) -> Result<serde_json::Value> {
        self.rate_limiter.until_ready().await;

        let response = self
            .client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LensError::UpstreamUnavailable {
                provider: "sec-edgar".to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        Ok(response.json().await?)
    }

    /// Resolve a ticker symbol to its Central Index Key
    pub async fn get_cik(&self, ticker: &str) -> Result<String> {
        let data = self.get_json(SEC_COMPANY_TICKERS_URL).await?;
        find_cik(&data, ticker).ok_or_else(|| LensError::InvalidSymbol(ticker.to_string()))
    }

    async fn get_submissions(&self, cik: &str) -> Result<CompanySubmissions> {
        let url = format!("{}/submissions/CIK{}.json", SEC_BASE_URL, pad_cik(cik));
        let data = self.get_json(&url).await?;
        Ok(serde_json::from_value(data)?)
    }
}

#[async_trait]
impl FilingsProvider for EdgarClient {
    async fn recent_filings(
        &self,
        symbol: &str,
        form_types: &[FormType],
        limit: usize,
    ) -> Result<Vec<Filing>> {
        let cik = self.get_cik(symbol).await?;
        debug!(%symbol, %cik, "listing recent filings");

        let submissions = self.get_submissions(&cik).await?;
        let cutoff = (Utc::now() - Duration::days(FILING_LOOKBACK_DAYS)).date_naive();

        Ok(collect_filings(
            &submissions.filings.recent,
            &cik,
            form_types,
            limit,
            cutoff,
        ))
    }

    async fn sections(&self, document_url: &str) -> Result<FilingSections> {
        self.rate_limiter.until_ready().await;

        let response = self
            .client
            .get(document_url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LensError::UpstreamUnavailable {
                provider: "sec-edgar".to_string(),
                reason: format!("HTTP {} for {document_url}", response.status()),
            });
        }

        let html = response.text().await?;
        Ok(self.slicer.slice(&strip_html(&html)))
    }

    async fn search(&self, request: &FilingSearchRequest) -> Result<Vec<FilingSearchHit>> {
        let mut params: Vec<(&str, String)> = vec![("q", request.query.clone())];

        if let Some(symbol) = &request.symbol {
            let cik = self.get_cik(symbol).await?;
            params.push(("ciks", pad_cik(&cik)));
        }
        if let Some(forms) = &request.form_types {
            params.push(("forms", forms.join(",")));
        }
        if let Some(start) = &request.start_date {
            params.push(("startdt", start.clone()));
        }
        if let Some(end) = &request.end_date {
            params.push(("enddt", end.clone()));
        }
        if request.page > 1 {
            params.push(("from", ((request.page - 1) * SEARCH_PAGE_SIZE).to_string()));
        }

        self.rate_limiter.until_ready().await;

        let response = self
            .client
            .get(SEC_FULL_TEXT_SEARCH_URL)
            .query(&params)
            .header("User-Agent", &self.user_agent)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LensError::UpstreamUnavailable {
                provider: "sec-edgar".to_string(),
                reason: format!("full-text search returned HTTP {}", response.status()),
            });
        }

        let payload: serde_json::Value = response.json().await?;
        Ok(parse_search_hits(&payload))
    }
}

/// Pad a CIK to the 10 digits EDGAR URLs expect
fn pad_cik(cik: &str) -> String {
    format!("{:0>10}", cik.trim_start_matches('0'))
}

/// Build the archive URL of a filing document
fn filing_document_url(cik: &str, accession_number: &str, document: &str) -> String {
    format!(
        "https://www.sec.gov/Archives/edgar/data/{}/{}/{}",
        cik.trim_start_matches('0'),
        accession_number.replace('-', ""),
        document
    )
}

/// Find a ticker's CIK in the company_tickers.json payload.
/// The `cik_str` field arrives as a number.
fn find_cik(data: &serde_json::Value, ticker: &str) -> Option<String> {
    let ticker_upper = ticker.to_uppercase();
    data.as_object()?.values().find_map(|company| {
        let matches = company
            .get("ticker")
            .and_then(|t| t.as_str())
            .is_some_and(|t| t.to_uppercase() == ticker_upper);
        if !matches {
            return None;
        }
        let cik = company.get("cik_str")?;
        cik.as_u64()
            .map(|n| n.to_string())
            .or_else(|| cik.as_str().map(str::to_string))
    })
}

/// Turn EDGAR's column-oriented recent-filings arrays into Filing records
fn collect_filings(
    recent: &RecentFilings,
    cik: &str,
    form_types: &[FormType],
    limit: usize,
    cutoff: NaiveDate,
) -> Vec<Filing> {
    let mut filings = Vec::new();

    for i in 0..recent.accession_number.len() {
        let form = &recent.form[i];
        if !form_types.is_empty() && !form_types.iter().any(|ft| ft.as_str() == form) {
            continue;
        }

        // Entries are newest first; stop once past the lookback window.
        if let Ok(filed) = NaiveDate::parse_from_str(&recent.filing_date[i], "%Y-%m-%d") {
            if filed < cutoff {
                break;
            }
        }

        filings.push(Filing {
            accession_number: recent.accession_number[i].clone(),
            form_type: form.clone(),
            filed_date: recent.filing_date[i].clone(),
            period_of_report: recent.report_date[i].clone().filter(|d| !d.is_empty()),
            description: recent.primary_doc_description[i].clone(),
            document_url: filing_document_url(
                cik,
                &recent.accession_number[i],
                &recent.primary_document[i],
            ),
        });

        if filings.len() >= limit {
            break;
        }
    }

    filings
}

/// Parse full-text search hits out of the efts response payload
fn parse_search_hits(payload: &serde_json::Value) -> Vec<FilingSearchHit> {
    let Some(hits) = payload
        .pointer("/hits/hits")
        .and_then(serde_json::Value::as_array)
    else {
        return Vec::new();
    };

    hits.iter()
        .filter_map(|hit| {
            let source = hit.get("_source")?;
            let accession_number = source.get("adsh")?.as_str()?.to_string();

            // _id is "<accession>:<document filename>"
            let document_url = hit
                .get("_id")
                .and_then(|id| id.as_str())
                .and_then(|id| id.split_once(':'))
                .zip(first_string_array_entry(source.get("ciks")))
                .map(|((_, document), cik)| filing_document_url(&cik, &accession_number, document));

            Some(FilingSearchHit {
                accession_number,
                company_name: first_string_array_entry(source.get("display_names")),
                ticker: None,
                form_type: source
                    .get("file_type")
                    .and_then(|t| t.as_str())
                    .unwrap_or_default()
                    .to_string(),
                description: source
                    .get("file_description")
                    .and_then(|d| d.as_str())
                    .map(str::to_string),
                filed_at: source
                    .get("file_date")
                    .and_then(|d| d.as_str())
                    .map(str::to_string),
                document_url,
            })
        })
        .collect()
}

fn first_string_array_entry(value: Option<&serde_json::Value>) -> Option<String> {
    value?
        .as_array()?
        .first()?
        .as_str()
        .map(str::to_string)
}

/// Reduce filing HTML to analyzable text. Block-level tags become paragraph
/// breaks so downstream paragraph extraction keeps working.
fn strip_html(html: &str) -> String {
    let block_tags = Regex::new(r"(?i)</?(p|div|br|tr|table|h[1-6])[^>]*>").unwrap();
    let any_tag = Regex::new(r"<[^>]+>").unwrap();
    let spaces = Regex::new(r"[ \t]+").unwrap();
    let blank_lines = Regex::new(r"\n{3,}").unwrap();

    let text = block_tags.replace_all(html, "\n\n");
    let text = any_tag.replace_all(&text, " ");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&#8217;", "'");
    let text = spaces.replace_all(&text, " ");
    blank_lines.replace_all(&text, "\n\n").trim().to_string()
}

/// Slices the standard quarterly-report sections out of filing text
struct SectionSlicer {
    financial_start: Regex,
    mda_start: Regex,
    mda_end: Regex,
    risk_start: Regex,
    risk_end: Regex,
}

impl SectionSlicer {
    fn new() -> Self {
        // Static patterns; compilation cannot fail.
        Self {
            financial_start: Regex::new(r"(?i)item\s*1\.?\s*financial\s+statements").unwrap(),
            mda_start: Regex::new(r"(?i)item\s*2\.?\s*management.?s\s+discussion").unwrap(),
            mda_end: Regex::new(r"(?i)item\s*3\.?\s*quantitative").unwrap(),
            risk_start: Regex::new(r"(?i)item\s*1a\.?\s*risk\s+factors").unwrap(),
            risk_end: Regex::new(r"(?i)item\s*2\.?\s*unregistered").unwrap(),
        }
    }

    fn slice(&self, text: &str) -> FilingSections {
        FilingSections {
            financial_statements: slice_between(text, &self.financial_start, &self.mda_start),
            management_discussion: slice_between(text, &self.mda_start, &self.mda_end),
            risk_factors: slice_between(text, &self.risk_start, &self.risk_end),
        }
    }
}

/// Text between the last `start` heading and the next `end` heading.
/// Headings also appear in the table of contents, so the last occurrence
/// of `start` is the body heading.
fn slice_between(text: &str, start: &Regex, end: &Regex) -> Option<String> {
    let begin = start.find_iter(text).last()?.end();
    let rest = &text[begin..];
    let stop = end.find(rest).map_or(rest.len(), |m| m.start());
    let section = rest[..stop].trim();
    (!section.is_empty()).then(|| section.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_cik() {
        assert_eq!(pad_cik("320193"), "0000320193");
        assert_eq!(pad_cik("0000320193"), "0000320193");
    }

    #[test]
    fn test_filing_document_url() {
        let url = filing_document_url("320193", "0000320193-24-000123", "aapl-20240928.htm");
        assert_eq!(
            url,
            "https://www.sec.gov/Archives/edgar/data/320193/000032019324000123/aapl-20240928.htm"
        );
    }

    #[test]
    fn test_find_cik_handles_numeric_field() {
        let data = serde_json::json!({
            "0": { "cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc." },
            "1": { "cik_str": 789019, "ticker": "MSFT", "title": "Microsoft Corp" }
        });

        assert_eq!(find_cik(&data, "aapl"), Some("320193".to_string()));
        assert_eq!(find_cik(&data, "MSFT"), Some("789019".to_string()));
        assert_eq!(find_cik(&data, "ZZZZ"), None);
    }

    #[test]
    fn test_collect_filings_filters_and_limits() {
        let recent = RecentFilings {
            accession_number: vec![
                "acc-1".to_string(),
                "acc-2".to_string(),
                "acc-3".to_string(),
                "acc-4".to_string(),
            ],
            filing_date: vec![
                "2024-11-01".to_string(),
                "2024-08-01".to_string(),
                "2024-07-15".to_string(),
                "2019-01-01".to_string(),
            ],
            report_date: vec![
                Some("2024-09-30".to_string()),
                Some("2024-06-30".to_string()),
                Some(String::new()),
                Some("2018-12-31".to_string()),
            ],
            form: vec![
                "10-Q".to_string(),
                "10-Q".to_string(),
                "8-K".to_string(),
                "10-Q".to_string(),
            ],
            primary_document: vec![
                "q3.htm".to_string(),
                "q2.htm".to_string(),
                "event.htm".to_string(),
                "old.htm".to_string(),
            ],
            primary_doc_description: vec![None, None, None, None],
        };

        let cutoff = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let filings = collect_filings(&recent, "320193", &[FormType::Form10Q], 10, cutoff);

        // The 8-K is filtered by form, the 2019 filing by the cutoff
        assert_eq!(filings.len(), 2);
        assert_eq!(filings[0].accession_number, "acc-1");
        assert_eq!(filings[0].period_of_report.as_deref(), Some("2024-09-30"));
        assert!(filings[0].document_url.ends_with("q3.htm"));

        let limited = collect_filings(&recent, "320193", &[FormType::Form10Q], 1, cutoff);
        assert_eq!(limited.len(), 1);
    }

    #[test]
    fn test_collect_filings_empty_report_date_is_none() {
        let recent = RecentFilings {
            accession_number: vec!["acc-3".to_string()],
            filing_date: vec!["2024-07-15".to_string()],
            report_date: vec![Some(String::new())],
            form: vec!["8-K".to_string()],
            primary_document: vec!["event.htm".to_string()],
            primary_doc_description: vec![None],
        };

        let cutoff = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let filings = collect_filings(&recent, "320193", &[], 10, cutoff);
        assert_eq!(filings[0].period_of_report, None);
    }

    #[test]
    fn test_strip_html() {
        let html = "<html><body><p>Total revenue of $1,234.5 million.</p>\
                    <div>Net income of &nbsp;$200 million.</div></body></html>";

        let text = strip_html(html);
        assert!(text.contains("Total revenue of $1,234.5 million."));
        assert!(text.contains("Net income of $200 million."));
        assert!(!text.contains('<'));
    }

    #[test]
    fn test_section_slicing_skips_table_of_contents() {
        let text = "\
Item 1. Financial Statements 3\n\n\
Item 2. Management's Discussion and Analysis 10\n\n\
Item 1. Financial Statements\n\n\
Total revenue of $500 million for the quarter.\n\n\
Item 2. Management's Discussion and Analysis\n\n\
Revenue grew on strong demand across all segments this quarter period.\n\n\
Item 3. Quantitative and Qualitative Disclosures";

        let sections = SectionSlicer::new().slice(text);

        let financial = sections.financial_statements.unwrap();
        assert!(financial.contains("Total revenue of $500 million"));
        assert!(!financial.contains("Item 1. Financial Statements 3"));

        let mda = sections.management_discussion.unwrap();
        assert!(mda.contains("strong demand"));
        assert!(!mda.contains("Quantitative"));

        assert!(sections.risk_factors.is_none());
    }

    #[test]
    fn test_parse_search_hits() {
        let payload = serde_json::json!({
            "hits": {
                "hits": [
                    {
                        "_id": "0000320193-24-000123:aapl-20240928.htm",
                        "_source": {
                            "adsh": "0000320193-24-000123",
                            "ciks": ["0000320193"],
                            "display_names": ["Apple Inc.  (AAPL)"],
                            "file_type": "10-Q",
                            "file_date": "2024-11-01"
                        }
                    }
                ]
            }
        });

        let hits = parse_search_hits(&payload);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].accession_number, "0000320193-24-000123");
        assert_eq!(hits[0].form_type, "10-Q");
        assert_eq!(hits[0].filed_at.as_deref(), Some("2024-11-01"));
        assert!(
            hits[0]
                .document_url
                .as_deref()
                .unwrap()
                .ends_with("aapl-20240928.htm")
        );
    }

    #[test]
    fn test_parse_search_hits_tolerates_empty_payload() {
        assert!(parse_search_hits(&serde_json::json!({})).is_empty());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_get_cik_live() {
        let client = EdgarClient::from_env();
        let cik = client.get_cik("AAPL").await.unwrap();
        assert_eq!(cik, "320193");
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_recent_filings_live() {
        let client = EdgarClient::from_env();
        let filings = client
            .recent_filings("AAPL", &[FormType::Form10Q], 3)
            .await
            .unwrap();
        assert!(!filings.is_empty());
        assert!(filings.iter().all(|f| f.form_type == "10-Q"));
    }
}
