use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::indicators::{compute_sma_pair, SmaPair, SmaValue, Trend, WindowPair};
use crate::pricing::{closing_prices, history_range, DateRange, PriceHistory};

/// What to analyse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendRequest {
    pub symbol: String,
    pub windows: WindowPair,
    pub as_of: NaiveDate,
    pub padding_days: u32,
}

/// Short versus long moving average for one symbol
#[derive(Debug, Clone, Serialize)]
pub struct TrendReport {
    pub symbol: String,
    pub as_of: NaiveDate,
    pub range: DateRange,
    pub bars: usize,
    pub latest_close: f64,
    pub short: SmaValue,
    pub long: SmaValue,
    pub trend: Trend,
}

impl TrendReport {
    fn from_pair(request: &TrendRequest, range: DateRange, closes: &[f64], pair: SmaPair) -> Self {
        Self {
            symbol: request.symbol.clone(),
            as_of: request.as_of,
            range,
            bars: closes.len(),
            latest_close: closes.last().copied().unwrap_or(f64::NAN),
            short: pair.short,
            long: pair.long,
            trend: Trend::classify(pair.short.value, pair.long.value),
        }
    }
}

/// Fetch the bars covering the long window and compare both averages.
pub async fn build_trend_report<P: PriceHistory>(
    provider: &P,
    request: &TrendRequest,
) -> Result<TrendReport> {
    let range = history_range(request.as_of, request.windows.required(), request.padding_days);

    let bars = provider
        .daily_bars(&request.symbol, range)
        .await
        .with_context(|| format!("failed to retrieve price data for {}", request.symbol))?;
    let closes = closing_prices(&bars);

    let pair = compute_sma_pair(&closes, request.windows).with_context(|| {
        format!(
            "cannot compute moving averages for {} from {} to {}",
            request.symbol, range.start, range.end
        )
    })?;

    let report = TrendReport::from_pair(request, range, &closes, pair);
    info!(
        "{}: {}-day MA {:.2}, {}-day MA {:.2} ({})",
        report.symbol,
        report.short.window,
        report.short.value,
        report.long.window,
        report.long.value,
        report.trend
    );
    Ok(report)
}
