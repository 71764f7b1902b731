use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod formatters;

#[derive(Parser)]
#[command(name = "trendscope")]
#[command(
    version,
    about = "Stock headlines and a short/long moving average trend check"
)]
#[command(
    long_about = "Scrape recent news headlines for a stock symbol, fetch its daily closing prices, and compare a short simple moving average against a long one to report a bullish or bearish short-term trend."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Output results in JSON format
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Settings file (defaults to $TRENDSCOPE_CONFIG or <config dir>/trendscope/config.toml)
    #[arg(long = "config", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Headlines plus short vs long moving average trend (the default)
    Report(ReportArgs),

    /// Print news headlines for a symbol
    Headlines {
        /// Stock symbol (defaults to the configured symbol)
        symbol: Option<String>,
    },

    /// Simple moving average of the last N closes
    Sma {
        /// Closing prices, oldest first
        #[arg(allow_negative_numbers = true, required_unless_present = "csv")]
        prices: Vec<f64>,

        /// Number of trailing closes to average
        #[arg(short, long)]
        window: usize,

        /// Read closes from a CSV file (date,close columns) instead
        #[arg(long, value_name = "PATH", conflicts_with = "prices")]
        csv: Option<PathBuf>,
    },

    /// Classify a short and a long moving average as bullish or bearish
    Trend {
        /// Short window average
        #[arg(allow_negative_numbers = true)]
        short_ma: f64,

        /// Long window average
        #[arg(allow_negative_numbers = true)]
        long_ma: f64,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct ReportArgs {
    /// Stock symbol (defaults to the configured symbol)
    pub symbol: Option<String>,

    /// Short moving average window, in trading days
    #[arg(long)]
    pub short: Option<usize>,

    /// Long moving average window, in trading days
    #[arg(long)]
    pub long: Option<usize>,

    /// Last date of the price history (YYYY-MM-DD, defaults to today)
    #[arg(long, value_name = "DATE")]
    pub as_of: Option<String>,

    /// Read daily bars from a CSV file instead of Yahoo Finance
    #[arg(long, value_name = "PATH")]
    pub prices_csv: Option<PathBuf>,

    /// Skip fetching news headlines
    #[arg(long)]
    pub no_news: bool,
}
