//! Output formatting module for CLI display
//!
//! This module handles all terminal output formatting, separating
//! the concerns of data calculation from presentation.

use colored::Colorize;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Style},
    Table, Tabled,
};

use crate::indicators::Trend;
use crate::reports::TrendReport;

const DISCLAIMER: &str =
    "(Remember that this is a simplified example; consider more indicators for a real analysis.)";

/// Headline block as printed before the averages
pub fn format_headlines(headlines: &[String]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", "Recent news headlines:".bold()));
    if headlines.is_empty() {
        out.push_str(&format!("{}\n", "  (no headlines found)".dimmed()));
    }
    for headline in headlines {
        out.push_str(&format!("- {}\n", headline));
    }
    out
}

pub fn trend_sentence(trend: Trend, long_window: usize) -> String {
    let word = match trend {
        Trend::Bullish => "bullish".green().bold(),
        Trend::Bearish => "bearish".red().bold(),
    };
    format!(
        "Short-term trend appears {} relative to the {}-day average.",
        word, long_window
    )
}

/// Averages, trend sentence and disclaimer
pub fn format_trend_report(report: &TrendReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} {}-day MA: {:.2}\n",
        report.symbol.cyan().bold(),
        report.short.window,
        report.short.value
    ));
    out.push_str(&format!(
        "{} {}-day MA: {:.2}\n\n",
        report.symbol.cyan().bold(),
        report.long.window,
        report.long.value
    ));
    out.push_str(&trend_sentence(report.trend, report.long.window));
    out.push_str("\n\n");
    out.push_str(&format!("{}\n", DISCLAIMER.dimmed()));
    out
}

/// JSON document for `report --json`
pub fn format_report_json(
    report: &TrendReport,
    headlines: Option<&[String]>,
    headlines_error: Option<&str>,
) -> serde_json::Result<String> {
    #[derive(Serialize)]
    struct JsonReport<'a> {
        #[serde(flatten)]
        report: &'a TrendReport,
        #[serde(skip_serializing_if = "Option::is_none")]
        headlines: Option<&'a [String]>,
        #[serde(skip_serializing_if = "Option::is_none")]
        headlines_error: Option<&'a str>,
    }

    serde_json::to_string_pretty(&JsonReport {
        report,
        headlines,
        headlines_error,
    })
}

/// Table of the closes that fed an SMA plus the result
pub fn format_sma_table(closes: &[f64], window: usize, sma: f64) -> String {
    #[derive(Tabled)]
    struct WindowRow {
        #[tabled(rename = "#")]
        position: usize,
        #[tabled(rename = "Close")]
        close: String,
    }

    let start = closes.len().saturating_sub(window);
    let rows: Vec<WindowRow> = closes[start..]
        .iter()
        .enumerate()
        .map(|(i, close)| WindowRow {
            position: start + i + 1,
            close: format!("{:.2}", close),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .modify(Columns::new(1..), Alignment::right());

    format!(
        "{}\n{}-observation SMA: {}\n",
        table,
        window,
        format!("{:.2}", sma).bold()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::SmaValue;
    use crate::pricing::DateRange;
    use chrono::NaiveDate;

    fn sample_report(short: f64, long: f64) -> TrendReport {
        let as_of = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        TrendReport {
            symbol: "TSLA".to_string(),
            as_of,
            range: DateRange {
                start: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
                end: as_of,
            },
            bars: 55,
            latest_close: 263.55,
            short: SmaValue {
                window: 20,
                value: short,
            },
            long: SmaValue {
                window: 50,
                value: long,
            },
            trend: Trend::classify(short, long),
        }
    }

    #[test]
    fn test_trend_report_text() {
        colored::control::set_override(false);
        let text = format_trend_report(&sample_report(105.0, 100.0));
        assert!(text.contains("TSLA 20-day MA: 105.00"));
        assert!(text.contains("TSLA 50-day MA: 100.00"));
        assert!(text.contains("Short-term trend appears bullish relative to the 50-day average."));
        assert!(text.contains("simplified example"));
    }

    #[test]
    fn test_tie_prints_bearish() {
        colored::control::set_override(false);
        let text = format_trend_report(&sample_report(100.0, 100.0));
        assert!(text.contains("appears bearish"));
    }

    #[test]
    fn test_headlines_block() {
        colored::control::set_override(false);
        let text = format_headlines(&["First".to_string(), "Second".to_string()]);
        assert_eq!(text, "Recent news headlines:\n- First\n- Second\n");
    }

    #[test]
    fn test_report_json_flattens_report() {
        let headlines = vec!["First".to_string()];
        let json = format_report_json(&sample_report(99.0, 100.0), Some(&headlines), None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["symbol"], "TSLA");
        assert_eq!(value["trend"], "bearish");
        assert_eq!(value["short"]["window"], 20);
        assert_eq!(value["long"]["value"], 100.0);
        assert_eq!(value["range"]["start"], "2025-01-10");
        assert_eq!(value["headlines"][0], "First");
        assert!(value.get("headlines_error").is_none());
    }

    #[test]
    fn test_sma_table_lists_window_positions() {
        colored::control::set_override(false);
        let text = format_sma_table(&[10.0, 20.0, 30.0, 40.0, 50.0], 3, 40.0);
        assert!(text.contains("30.00"));
        assert!(text.contains("50.00"));
        assert!(!text.contains("20.00"));
        assert!(text.contains("3-observation SMA: 40.00"));
    }
}
