//! Candles module - OHLC reconstruction from the ledger.

mod candle_aggregator;
mod candle_model;

pub use candle_aggregator::{build_candle_series, build_candles, change_percent};
pub use candle_model::{Candle, CandleSeries, Timeframe};
