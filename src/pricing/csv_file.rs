// Offline price history from a CSV export
//
// Expected header: date,close with optional open,high,low,volume columns.
// Dates use YYYY-MM-DD and must be strictly increasing.

use chrono::NaiveDate;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{debug, info};

use super::{DailyBar, DateRange, PriceHistory};
use crate::error::ProviderError;

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    close: Option<f64>,
    #[serde(default)]
    open: Option<f64>,
    #[serde(default)]
    high: Option<f64>,
    #[serde(default)]
    low: Option<f64>,
    #[serde(default)]
    volume: Option<i64>,
}

/// Daily bars read from a local CSV file
pub struct CsvPriceHistory {
    path: PathBuf,
}

impl CsvPriceHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Every bar in the file, oldest first.
    pub fn read_all(&self) -> Result<Vec<DailyBar>, ProviderError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.path)?;

        let mut bars: Vec<DailyBar> = Vec::new();
        for (index, row) in reader.deserialize::<CsvRow>().enumerate() {
            let row = row.map_err(|e| ProviderError::MalformedBar {
                index,
                reason: e.to_string(),
            })?;

            let close = row
                .close
                .filter(|c| c.is_finite())
                .ok_or_else(|| ProviderError::MalformedBar {
                    index,
                    reason: format!("missing or non-finite close price for {}", row.date),
                })?;

            if let Some(prev) = bars.last() {
                if row.date <= prev.date {
                    return Err(ProviderError::MalformedBar {
                        index,
                        reason: format!("date {} does not follow {}", row.date, prev.date),
                    });
                }
            }

            bars.push(DailyBar {
                date: row.date,
                open: row.open,
                high: row.high,
                low: row.low,
                close,
                volume: row.volume,
            });
        }

        debug!("Read {} bars from {}", bars.len(), self.path.display());
        Ok(bars)
    }
}

impl PriceHistory for CsvPriceHistory {
    async fn daily_bars(
        &self,
        symbol: &str,
        range: DateRange,
    ) -> Result<Vec<DailyBar>, ProviderError> {
        info!(
            "Reading daily bars for {} from {} ({} to {})",
            symbol,
            self.path.display(),
            range.start,
            range.end
        );

        let bars: Vec<DailyBar> = self
            .read_all()?
            .into_iter()
            .filter(|bar| range.contains(bar.date))
            .collect();

        if bars.is_empty() {
            return Err(ProviderError::NoData(symbol.to_string()));
        }
        Ok(bars)
    }
}
