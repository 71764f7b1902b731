use chrono::NaiveDate;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use super::{DailyBar, DateRange, PriceHistory};
use crate::config::HttpSettings;
use crate::error::ProviderError;

/// Yahoo Finance chart response
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: ChartData,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    result: Option<Vec<ChartResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: Meta,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Meta {
    /// Exchange offset from UTC in seconds; bar timestamps are shifted by it
    /// before taking the calendar date.
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<i64>>>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

/// Daily bars from the Yahoo Finance v8 chart endpoint
pub struct YahooChart {
    client: Client,
    base_url: String,
}

impl YahooChart {
    pub fn new(http: &HttpSettings) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent(http.user_agent.as_str())
            .timeout(Duration::from_secs(http.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: http.yahoo_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn chart_url(&self, symbol: &str, range: DateRange) -> Result<String, ProviderError> {
        // Convert dates to Unix timestamps
        let from_timestamp = range
            .start
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| ProviderError::Parse("Invalid from date".to_string()))?
            .and_utc()
            .timestamp();

        let to_timestamp = range
            .end
            .and_hms_opt(23, 59, 59)
            .ok_or_else(|| ProviderError::Parse("Invalid to date".to_string()))?
            .and_utc()
            .timestamp();

        let mut url = Url::parse(&self.base_url).map_err(|e| {
            ProviderError::Parse(format!("Invalid base URL {}: {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| ProviderError::Parse(format!("Invalid base URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol]);
        url.query_pairs_mut()
            .append_pair("period1", &from_timestamp.to_string())
            .append_pair("period2", &to_timestamp.to_string())
            .append_pair("interval", "1d");

        Ok(url.to_string())
    }
}

impl PriceHistory for YahooChart {
    async fn daily_bars(
        &self,
        symbol: &str,
        range: DateRange,
    ) -> Result<Vec<DailyBar>, ProviderError> {
        info!(
            "Fetching daily bars for {} from {} to {}",
            symbol, range.start, range.end
        );

        let url = self.chart_url(symbol, range)?;
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status { status, url });
        }

        let body = response.text().await?;
        let bars = parse_chart_response(&body, symbol)?;

        debug!("Fetched {} daily bars for {}", bars.len(), symbol);
        Ok(bars)
    }
}

/// Parse a chart API body into bars, oldest first.
///
/// A bar without a finite close fails the whole series rather than being
/// skipped or zeroed.
pub fn parse_chart_response(body: &str, symbol: &str) -> Result<Vec<DailyBar>, ProviderError> {
    let data: YahooChartResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::Parse(format!("Failed to parse chart response: {}", e)))?;

    if let Some(error) = data.chart.error {
        return Err(ProviderError::Api {
            code: error.code,
            description: error.description,
        });
    }

    let result = data
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| ProviderError::NoData(symbol.to_string()))?;

    let timestamps = result.timestamp.unwrap_or_default();
    if timestamps.is_empty() {
        return Err(ProviderError::NoData(symbol.to_string()));
    }
    let offset = result.meta.gmtoffset.unwrap_or(0);

    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::Parse("No quote data".to_string()))?;

    let opens = quote.open.unwrap_or_default();
    let highs = quote.high.unwrap_or_default();
    let lows = quote.low.unwrap_or_default();
    let closes = quote
        .close
        .ok_or_else(|| ProviderError::Parse("No close prices".to_string()))?;
    let volumes = quote.volume.unwrap_or_default();

    let mut bars = Vec::with_capacity(timestamps.len());

    for (index, &timestamp) in timestamps.iter().enumerate() {
        let date = bar_date(timestamp, offset).ok_or_else(|| ProviderError::MalformedBar {
            index,
            reason: format!("invalid timestamp {}", timestamp),
        })?;

        let close = closes
            .get(index)
            .copied()
            .flatten()
            .ok_or_else(|| ProviderError::MalformedBar {
                index,
                reason: format!("missing close price for {}", date),
            })?;
        if !close.is_finite() {
            return Err(ProviderError::MalformedBar {
                index,
                reason: format!("non-finite close price {} for {}", close, date),
            });
        }

        bars.push(DailyBar {
            date,
            open: opens.get(index).copied().flatten(),
            high: highs.get(index).copied().flatten(),
            low: lows.get(index).copied().flatten(),
            close,
            volume: volumes.get(index).copied().flatten(),
        });
    }

    Ok(bars)
}

fn bar_date(timestamp: i64, gmt_offset: i64) -> Option<NaiveDate> {
    chrono::DateTime::from_timestamp(timestamp + gmt_offset, 0).map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn should_skip_online_tests() -> bool {
        std::env::var("TRENDSCOPE_SKIP_ONLINE_TESTS")
            .map(|v| v != "0")
            .unwrap_or(false)
    }

    // Two sessions of a US listing: 2025-01-02 and 2025-01-03, 14:30 UTC opens
    const TWO_BARS: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"symbol": "TSLA", "currency": "USD", "gmtoffset": -18000},
                "timestamp": [1735828200, 1735914600],
                "indicators": {"quote": [{
                    "open": [390.1, 381.5],
                    "high": [392.7, 411.9],
                    "low": [373.0, 379.4],
                    "close": [379.28, 410.44],
                    "volume": [109710700, 95423300]
                }]}
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_parse_chart_response_builds_bars_in_order() {
        let bars = parse_chart_response(TWO_BARS, "TSLA").unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
        assert_eq!(bars[1].date, NaiveDate::from_ymd_opt(2025, 1, 3).unwrap());
        assert_eq!(bars[0].close, 379.28);
        assert_eq!(bars[1].close, 410.44);
        assert_eq!(bars[1].volume, Some(95423300));
        assert_eq!(bars[0].open, Some(390.1));
    }

    #[test]
    fn test_null_close_is_malformed_bar() {
        let body = TWO_BARS.replace("[379.28, 410.44]", "[379.28, null]");
        match parse_chart_response(&body, "TSLA") {
            Err(ProviderError::MalformedBar { index, reason }) => {
                assert_eq!(index, 1);
                assert!(reason.contains("missing close"));
            }
            other => panic!("expected MalformedBar, got {:?}", other),
        }
    }

    #[test]
    fn test_short_close_column_is_malformed_bar() {
        let body = TWO_BARS.replace("[379.28, 410.44]", "[379.28]");
        assert!(matches!(
            parse_chart_response(&body, "TSLA"),
            Err(ProviderError::MalformedBar { index: 1, .. })
        ));
    }

    #[test]
    fn test_api_error_payload() {
        let body = r#"{"chart": {"result": null, "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}}}"#;
        match parse_chart_response(body, "NOPE") {
            Err(ProviderError::Api { code, description }) => {
                assert_eq!(code, "Not Found");
                assert!(description.contains("delisted"));
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_result_is_no_data() {
        let body = r#"{"chart": {"result": [{"meta": {}, "indicators": {"quote": [{}]}}], "error": null}}"#;
        assert!(matches!(
            parse_chart_response(body, "TSLA"),
            Err(ProviderError::NoData(symbol)) if symbol == "TSLA"
        ));
    }

    #[test]
    fn test_garbage_body_is_parse_error() {
        assert!(matches!(
            parse_chart_response("<html>rate limited</html>", "TSLA"),
            Err(ProviderError::Parse(_))
        ));
    }

    #[test]
    fn test_chart_url_includes_range_and_daily_interval() {
        let chart = YahooChart::new(&HttpSettings {
            yahoo_base_url: "https://example.test/".to_string(),
            ..HttpSettings::default()
        })
        .unwrap();
        let range = DateRange {
            start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
        };
        let url = chart.chart_url("TSLA", range).unwrap();
        assert_eq!(
            url,
            "https://example.test/v8/finance/chart/TSLA?period1=1735689600&period2=1736553599&interval=1d"
        );
    }

    #[test]
    fn test_chart_url_escapes_symbol_segment() {
        let chart = YahooChart::new(&HttpSettings {
            yahoo_base_url: "https://example.test".to_string(),
            ..HttpSettings::default()
        })
        .unwrap();
        let range = DateRange {
            start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
        };
        let url = chart.chart_url("BRK/B?x#y", range).unwrap();
        assert!(url.starts_with(
            "https://example.test/v8/finance/chart/BRK%2FB%3Fx%23y?period1=1735689600&"
        ));
        assert_eq!(Url::parse(&url).unwrap().path_segments().unwrap().count(), 4);
    }

    #[tokio::test]
    async fn test_fetch_daily_bars() {
        if should_skip_online_tests() {
            return;
        }

        let chart = YahooChart::new(&HttpSettings::default()).unwrap();
        let range = DateRange {
            start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        };

        let result = chart.daily_bars("TSLA", range).await;
        if let Err(e) = &result {
            eprintln!("Skipping Yahoo daily bars test: {}", e);
            return;
        }
        let bars = result.unwrap();

        assert!(!bars.is_empty());
        assert!(bars.windows(2).all(|w| w[0].date < w[1].date));
        println!("Fetched {} daily bars", bars.len());
    }
}
