//! Price indicators
//!
//! The simple moving average calculator and the short/long trend rule built
//! on top of it. Nothing here performs I/O.

pub mod signal;
pub mod sma;

pub use signal::Trend;
pub use sma::{compute_sma, compute_sma_pair, SmaPair, SmaValue, WindowPair};
