//! Rebuilds OHLC bars from the transaction log.
//!
//! The log only holds deltas, so the valuation at the start of the window is
//! recovered by subtracting every delta inside the window from the current
//! valuation, then the window is replayed forward bucket by bucket. When a
//! zero floor was hit inside the window the recovered starting valuation is
//! only approximate; that loss is accepted.

use rust_decimal::Decimal;

use super::candle_model::{Candle, CandleSeries, Timeframe};
use crate::ledger::{LedgerState, Transaction};
use crate::utils::time_utils::floor_to_bucket;

/// Price scale: valuation units carry four implied decimal places.
const PRICE_SCALE: u32 = 4;

fn to_price(valuation_uc: i64) -> Decimal {
    Decimal::new(valuation_uc, PRICE_SCALE)
}

/// Builds one bar per bucket from the earliest needed bucket up to the bucket containing `now_ms`.
///
/// The window covers at least `min_lookback_buckets` bars and is widened to
/// reach the oldest transaction. Transactions may be passed in any order.
/// A non-positive `bucket_ms` yields no bars.
pub fn build_candles(
    current_valuation: i64,
    transactions: &[Transaction],
    bucket_ms: i64,
    min_lookback_buckets: usize,
    now_ms: i64,
) -> Vec<Candle> {
    if bucket_ms <= 0 {
        return Vec::new();
    }

    let mut ascending: Vec<&Transaction> = transactions.iter().collect();
    ascending.sort_by_key(|tx| tx.timestamp);

    let end_bucket = floor_to_bucket(now_ms, bucket_ms);
    let earliest_bucket = ascending
        .first()
        .map(|tx| floor_to_bucket(tx.timestamp, bucket_ms))
        .unwrap_or(end_bucket);
    let covered_buckets = (end_bucket.saturating_sub(earliest_bucket) / bucket_ms + 1).max(1);
    let span_buckets = i64::try_from(min_lookback_buckets)
        .unwrap_or(i64::MAX)
        .max(covered_buckets);
    let start_bucket = end_bucket.saturating_sub(bucket_ms.saturating_mul(span_buckets - 1));

    let mut valuation = ascending
        .iter()
        .filter(|tx| tx.timestamp >= start_bucket)
        .fold(current_valuation, |acc, tx| acc.saturating_sub(tx.delta))
        .max(0);

    let mut next_tx = ascending.partition_point(|tx| tx.timestamp < start_bucket);
    let mut candles = Vec::with_capacity(usize::try_from(span_buckets).unwrap_or(0));
    let mut bucket = start_bucket;
    while bucket <= end_bucket {
        let bucket_end = bucket.saturating_add(bucket_ms);
        let open = valuation;
        let mut high = open;
        let mut low = open;

        while let Some(tx) = ascending.get(next_tx).filter(|tx| tx.timestamp < bucket_end) {
            valuation = valuation.saturating_add(tx.delta).max(0);
            high = high.max(valuation);
            low = low.min(valuation);
            next_tx += 1;
        }

        candles.push(Candle {
            bucket_start: bucket,
            open: to_price(open),
            high: to_price(high),
            low: to_price(low),
            close: to_price(valuation),
        });

        if bucket_end <= bucket {
            break;
        }
        bucket = bucket_end;
    }

    candles
}

/// Percentage change from the first bar's open to the last bar's close.
///
/// Zero when there are fewer than two bars or the first open is not positive.
pub fn change_percent(candles: &[Candle]) -> Decimal {
    let (Some(first), Some(last)) = (candles.first(), candles.last()) else {
        return Decimal::ZERO;
    };
    if candles.len() < 2 || first.open <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    ((last.close - first.open) / first.open * Decimal::ONE_HUNDRED).round_dp(2)
}

/// Bars and change for a ledger in one of the preset timeframes.
pub fn build_candle_series(state: &LedgerState, timeframe: Timeframe, now_ms: i64) -> CandleSeries {
    let candles = build_candles(
        state.valuation,
        &state.transactions,
        timeframe.bucket_ms(),
        timeframe.min_lookback_buckets(),
        now_ms,
    );
    CandleSeries {
        timeframe,
        change_percent: change_percent(&candles),
        candles,
    }
}
