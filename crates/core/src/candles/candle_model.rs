//! Candle domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{DAY_MS, HOUR_MS, WEEK_MS};
use crate::errors::ValidationError;

/// One OHLC bar of price over a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candle {
    /// Bucket start, epoch milliseconds.
    pub bucket_start: i64,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
}

/// Chart timeframes offered to the UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "8h")]
    EightHours,
    #[default]
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "1w")]
    OneWeek,
}

impl Timeframe {
    pub fn bucket_ms(&self) -> i64 {
        match self {
            Timeframe::FourHours => 4 * HOUR_MS,
            Timeframe::EightHours => 8 * HOUR_MS,
            Timeframe::OneDay => DAY_MS,
            Timeframe::OneWeek => WEEK_MS,
        }
    }

    /// Minimum number of bars rendered for this timeframe.
    pub fn min_lookback_buckets(&self) -> usize {
        match self {
            Timeframe::FourHours | Timeframe::EightHours => 90,
            Timeframe::OneDay => 60,
            Timeframe::OneWeek => 26,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::FourHours => "4h",
            Timeframe::EightHours => "8h",
            Timeframe::OneDay => "1d",
            Timeframe::OneWeek => "1w",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "4h" => Ok(Timeframe::FourHours),
            "8h" => Ok(Timeframe::EightHours),
            "1d" => Ok(Timeframe::OneDay),
            "1w" => Ok(Timeframe::OneWeek),
            _ => Err(ValidationError::UnknownTimeframe(s.to_string())),
        }
    }
}

/// Bars for one timeframe plus the change over the whole span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandleSeries {
    pub timeframe: Timeframe,
    pub candles: Vec<Candle>,
    pub change_percent: Decimal,
}
