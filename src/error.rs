//! Error handling for trendscope
//!
//! Defines the typed errors raised by the indicator core, the price providers
//! and the settings loader, and a unified Result type using anyhow for
//! context chaining at the command level.

use std::path::PathBuf;
use thiserror::Error;

/// Failures of the moving average calculator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndicatorError {
    #[error("invalid window: {0} (must be a positive number of observations)")]
    InvalidWindow(usize),

    #[error("insufficient data: a {window}-observation window needs {window} closes, only {available} available")]
    InsufficientData { window: usize, available: usize },
}

/// Failures of a price history source
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("status code error: {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("price source error: {code} - {description}")]
    Api { code: String, description: String },

    #[error("no price data returned for {0}")]
    NoData(String),

    #[error("malformed bar at index {index}: {reason}")]
    MalformedBar { index: usize, reason: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Failures while loading settings
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result type alias for command-level operations
pub type Result<T> = anyhow::Result<T>;
