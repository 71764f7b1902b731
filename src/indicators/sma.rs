use serde::{Deserialize, Serialize};

use crate::error::IndicatorError;

/// Arithmetic mean of the last `window` closes of `series`.
///
/// `series` must be ordered oldest to newest; it is never re-sorted.
/// NaN and infinite values propagate through the sum unchanged.
///
/// # Errors
/// * [`IndicatorError::InvalidWindow`] when `window` is zero
/// * [`IndicatorError::InsufficientData`] when `series` holds fewer than `window` values
///
/// # Examples
/// ```
/// use trendscope::indicators::compute_sma;
///
/// let closes = [10.0, 20.0, 30.0, 40.0, 50.0];
/// assert_eq!(compute_sma(&closes, 3).unwrap(), 40.0);
/// ```
pub fn compute_sma(series: &[f64], window: usize) -> Result<f64, IndicatorError> {
    if window == 0 {
        return Err(IndicatorError::InvalidWindow(window));
    }
    if series.len() < window {
        return Err(IndicatorError::InsufficientData {
            window,
            available: series.len(),
        });
    }

    let sum: f64 = series[series.len() - window..].iter().sum();
    Ok(sum / window as f64)
}

/// Short and long lookback windows compared by the trend check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowPair {
    pub short: usize,
    pub long: usize,
}

impl WindowPair {
    pub fn new(short: usize, long: usize) -> Self {
        Self { short, long }
    }

    /// The larger of the two windows, i.e. how many closes a pair needs.
    pub fn required(&self) -> usize {
        self.short.max(self.long)
    }
}

/// A computed average together with the window it covers
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SmaValue {
    pub window: usize,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SmaPair {
    pub short: SmaValue,
    pub long: SmaValue,
}

/// Compute both averages of a [`WindowPair`] over the same series.
pub fn compute_sma_pair(series: &[f64], windows: WindowPair) -> Result<SmaPair, IndicatorError> {
    let short = compute_sma(series, windows.short)?;
    let long = compute_sma(series, windows.long)?;
    Ok(SmaPair {
        short: SmaValue {
            window: windows.short,
            value: short,
        },
        long: SmaValue {
            window: windows.long,
            value: long,
        },
    })
}
