//! Trendscope - stock headlines and moving average trend checks
//!
//! This library provides the simple moving average calculator, the
//! short/long trend rule, daily price history sources and the headline
//! scraper used by the `trendscope` command line tool.

pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod indicators;
pub mod pricing;
pub mod reports;
pub mod scraping;
pub mod ui;
