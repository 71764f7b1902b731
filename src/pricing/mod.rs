// Pricing module - daily price history sources

pub mod csv_file;
pub mod yahoo;

use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::future::Future;

use crate::error::ProviderError;

pub use csv_file::CsvPriceHistory;
pub use yahoo::YahooChart;

/// One trading day's price observation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: f64,
    pub volume: Option<i64>,
}

/// Inclusive calendar date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// A source of daily bars for a symbol.
///
/// Implementations return bars oldest to newest and fail explicitly instead of
/// returning an empty series.
pub trait PriceHistory {
    fn daily_bars(
        &self,
        symbol: &str,
        range: DateRange,
    ) -> impl Future<Output = Result<Vec<DailyBar>, ProviderError>> + Send;
}

/// Date range ending at `as_of` wide enough to hold `long_window` trading days.
///
/// Trading days are roughly 5 of every 7 calendar days; `padding_days` absorbs
/// holidays. Spans reaching past the earliest representable date start there,
/// leaving the window check to report the shortage.
pub fn history_range(as_of: NaiveDate, long_window: usize, padding_days: u32) -> DateRange {
    let span = (long_window as u64).saturating_mul(7).saturating_add(4) / 5;
    let span = span.saturating_add(u64::from(padding_days));
    DateRange {
        start: as_of.checked_sub_days(Days::new(span)).unwrap_or(NaiveDate::MIN),
        end: as_of,
    }
}

/// Closing prices in bar order.
pub fn closing_prices(bars: &[DailyBar]) -> Vec<f64> {
    bars.iter().map(|bar| bar.close).collect()
}
