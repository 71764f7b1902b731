use serde::Serialize;
use std::fmt;

/// Direction of the short average relative to the long one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Bullish,
    Bearish,
}

impl Trend {
    /// Bullish only when the short average is strictly above the long one.
    /// Equal averages (and NaN comparisons) are bearish.
    pub fn classify(short_ma: f64, long_ma: f64) -> Self {
        if short_ma > long_ma {
            Trend::Bullish
        } else {
            Trend::Bearish
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Bullish => "bullish",
            Trend::Bearish => "bearish",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
