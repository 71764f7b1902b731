//! Command dispatcher that routes parsed CLI commands to their handlers.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use colored::Colorize;
use serde_json::json;
use std::path::Path;
use tracing::{info, warn};

use crate::cli::formatters;
use crate::cli::{Cli, Commands, ReportArgs};
use crate::config::Settings;
use crate::indicators::{compute_sma, Trend, WindowPair};
use crate::pricing::{closing_prices, CsvPriceHistory, YahooChart};
use crate::reports::{build_trend_report, TrendReport, TrendRequest};
use crate::scraping::{HeadlineScraper, HeadlineSource};
use crate::ui::progress::{ProgressEvent, ProgressPrinter};

/// Route a parsed command line to its handler
pub async fn dispatch_command(cli: Cli) -> Result<()> {
    let settings = Settings::load(cli.config.as_deref()).context("failed to load settings")?;
    let json_output = cli.json;

    match cli.command {
        None => dispatch_report(ReportArgs::default(), &settings, json_output).await,
        Some(Commands::Report(args)) => dispatch_report(args, &settings, json_output).await,
        Some(Commands::Headlines { symbol }) => {
            let symbol = symbol.unwrap_or_else(|| settings.symbol.clone());
            dispatch_headlines(&symbol, &settings, json_output).await
        }
        Some(Commands::Sma {
            prices,
            window,
            csv,
        }) => {
            let closes = match csv {
                Some(path) => {
                    let bars = CsvPriceHistory::new(&path)
                        .read_all()
                        .with_context(|| format!("failed to read prices from {}", path.display()))?;
                    closing_prices(&bars)
                }
                None => prices,
            };
            dispatch_sma(&closes, window, json_output)
        }
        Some(Commands::Trend { short_ma, long_ma }) => {
            dispatch_trend(short_ma, long_ma, json_output);
            Ok(())
        }
    }
}

async fn dispatch_report(args: ReportArgs, settings: &Settings, json_output: bool) -> Result<()> {
    let ReportArgs {
        symbol,
        short,
        long,
        as_of,
        prices_csv,
        no_news,
    } = args;

    let symbol = symbol.unwrap_or_else(|| settings.symbol.clone());
    let windows = WindowPair::new(
        short.unwrap_or(settings.short_window),
        long.unwrap_or(settings.long_window),
    );
    let as_of = match as_of.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => chrono::Local::now().date_naive(),
    };

    let printer = ProgressPrinter::for_terminal(json_output);

    let mut headlines = None;
    let mut headlines_error = None;
    if !no_news {
        printer.handle_event(&ProgressEvent::Spinner {
            message: format!("Fetching {} headlines...", symbol),
        });
        match fetch_headlines(&symbol, settings).await {
            Ok(found) => {
                if !json_output {
                    printer.suspend(|| println!("{}", formatters::format_headlines(&found)));
                }
                headlines = Some(found);
            }
            Err(e) => {
                // Headlines are informational; the trend check still runs
                warn!("Failed to get headlines for {}: {:#}", symbol, e);
                printer.handle_event(&ProgressEvent::Error {
                    message: format!("Failed to get headlines: {:#}", e),
                });
                if !printer.is_enabled() && !json_output {
                    eprintln!("Failed to get headlines: {:#}", e);
                }
                headlines_error = Some(format!("{:#}", e));
            }
        }
    }

    printer.handle_event(&ProgressEvent::Spinner {
        message: format!("Fetching {} price history...", symbol),
    });
    let request = TrendRequest {
        symbol,
        windows,
        as_of,
        padding_days: settings.padding_days,
    };
    let report = fetch_trend_report(prices_csv.as_deref(), settings, &request).await;
    printer.finish();
    let report = report?;

    if json_output {
        println!(
            "{}",
            formatters::format_report_json(
                &report,
                headlines.as_deref(),
                headlines_error.as_deref()
            )?
        );
    } else {
        print!("{}", formatters::format_trend_report(&report));
    }
    Ok(())
}

async fn fetch_trend_report(
    prices_csv: Option<&Path>,
    settings: &Settings,
    request: &TrendRequest,
) -> Result<TrendReport> {
    match prices_csv {
        Some(path) => {
            info!("Using offline prices from {}", path.display());
            build_trend_report(&CsvPriceHistory::new(path), request).await
        }
        None => {
            let chart = YahooChart::new(&settings.http).context("Failed to build HTTP client")?;
            build_trend_report(&chart, request).await
        }
    }
}

async fn fetch_headlines(symbol: &str, settings: &Settings) -> Result<Vec<String>> {
    let scraper = HeadlineScraper::new(HeadlineSource::from(&settings.news), &settings.http)?;
    scraper.headlines(symbol).await
}

async fn dispatch_headlines(symbol: &str, settings: &Settings, json_output: bool) -> Result<()> {
    let printer = ProgressPrinter::for_terminal(json_output);
    printer.handle_event(&ProgressEvent::Spinner {
        message: format!("Fetching {} headlines...", symbol),
    });
    let headlines = fetch_headlines(symbol, settings).await;
    printer.finish();
    let headlines =
        headlines.with_context(|| format!("failed to fetch headlines for {}", symbol))?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "symbol": symbol,
                "headlines": headlines,
            }))?
        );
    } else {
        print!("{}", formatters::format_headlines(&headlines));
    }
    Ok(())
}

fn dispatch_sma(closes: &[f64], window: usize, json_output: bool) -> Result<()> {
    let sma = compute_sma(closes, window)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "window": window,
                "observations": closes.len(),
                "sma": sma,
            }))?
        );
    } else {
        print!("{}", formatters::format_sma_table(closes, window, sma));
    }
    Ok(())
}

fn dispatch_trend(short_ma: f64, long_ma: f64, json_output: bool) {
    let trend = Trend::classify(short_ma, long_ma);

    if json_output {
        println!(
            "{}",
            json!({
                "short_ma": short_ma,
                "long_ma": long_ma,
                "trend": trend,
            })
        );
    } else {
        println!(
            "Short MA {:.2} vs long MA {:.2}: {}",
            short_ma,
            long_ma,
            match trend {
                Trend::Bullish => trend.as_str().green().bold(),
                Trend::Bearish => trend.as_str().red().bold(),
            }
        );
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}'. Use YYYY-MM-DD", raw))
}
