// Reports module - moving average trend report

pub mod trend;

pub use trend::{build_trend_report, TrendReport, TrendRequest};
