use anyhow::{anyhow, bail, Context, Result};
use reqwest::{Client, Url};
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::{HttpSettings, NewsSettings};

/// Where headlines for a symbol live and how to pick them out of the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlineSource {
    /// Page URL; `{symbol}` is replaced with the requested symbol
    pub url_template: String,
    pub selector: String,
}

impl HeadlineSource {
    /// The page URL, with `symbol` percent-encoded as a single path segment
    pub fn url_for(&self, symbol: &str) -> String {
        self.url_template.replace("{symbol}", &encode_segment(symbol))
    }
}

// Url only exposes segment encoding on a full URL, so encode against a dummy one
fn encode_segment(raw: &str) -> String {
    let Ok(mut url) = Url::parse("http://localhost/") else {
        return raw.to_string();
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.clear().push(raw);
    }
    url.path()
        .trim_start_matches('/')
        .replace('&', "%26")
        .replace('=', "%3D")
}

impl From<&NewsSettings> for HeadlineSource {
    fn from(news: &NewsSettings) -> Self {
        Self {
            url_template: news.url.clone(),
            selector: news.selector.clone(),
        }
    }
}

/// Fetches a news page and extracts the text of every selector match
pub struct HeadlineScraper {
    client: Client,
    source: HeadlineSource,
}

impl HeadlineScraper {
    pub fn new(source: HeadlineSource, http: &HttpSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(http.user_agent.as_str())
            .timeout(Duration::from_secs(http.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, source })
    }

    pub async fn headlines(&self, symbol: &str) -> Result<Vec<String>> {
        let url = self.source.url_for(symbol);
        info!("Fetching headlines for {} from {}", symbol, url);

        let html = fetch_html(&self.client, &url).await?;
        let headlines = select_text(&html, &self.source.selector)?;

        debug!("Found {} headlines on {}", headlines.len(), url);
        Ok(headlines)
    }
}

/// GET a page and return its body; any non-success status is an error.
pub async fn fetch_html(client: &Client, url: &str) -> Result<String> {
    let resp = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("request failed for {}", url))?;

    let status = resp.status();
    if !status.is_success() {
        bail!(
            "status code error: {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        );
    }

    resp.text()
        .await
        .with_context(|| format!("failed reading response for {}", url))
}

/// Text of every element matching `selector`, whitespace collapsed.
/// Matches with no visible text are dropped.
pub fn select_text(html: &str, selector: &str) -> Result<Vec<String>> {
    let selector =
        Selector::parse(selector).map_err(|e| anyhow!("invalid selector '{}': {:?}", selector, e))?;
    let document = Html::parse_document(html);

    Ok(document
        .select(&selector)
        .map(|node| {
            node.text()
                .collect::<Vec<_>>()
                .join(" ")
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|text| !text.is_empty())
        .collect())
}
