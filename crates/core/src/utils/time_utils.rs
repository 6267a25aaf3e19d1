use chrono::{DateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

/// Default reference timezone for the market calendar and hour buckets.
/// The offset in force is looked up per instant, so daylight saving is honoured.
pub const DEFAULT_MARKET_TZ: Tz = chrono_tz::Europe::London;

/// Floors an epoch-millisecond timestamp to the start of its bucket.
///
/// Uses euclidean division so instants before the epoch land in the bucket
/// that contains them rather than the next one.
pub fn floor_to_bucket(ts_ms: i64, bucket_ms: i64) -> i64 {
    ts_ms.div_euclid(bucket_ms) * bucket_ms
}

/// Converts epoch milliseconds to a UTC datetime, if representable.
pub fn utc_from_millis(ts_ms: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(ts_ms)
}

/// Offset (local minus UTC) in milliseconds in force in `tz` at the given instant.
///
/// Instants outside chrono's representable range report a zero offset.
pub fn offset_ms_at(tz: Tz, instant_ms: i64) -> i64 {
    match utc_from_millis(instant_ms) {
        Some(utc) => {
            let offset = tz.offset_from_utc_datetime(&utc.naive_utc()).fix();
            i64::from(offset.local_minus_utc()) * 1000
        }
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_handles_negative_timestamps() {
        assert_eq!(floor_to_bucket(3_599_999, 3_600_000), 0);
        assert_eq!(floor_to_bucket(3_600_000, 3_600_000), 3_600_000);
        assert_eq!(floor_to_bucket(-1, 3_600_000), -3_600_000);
    }

    #[test]
    fn london_offset_follows_daylight_saving() {
        // 2024-01-15T12:00:00Z is GMT, 2024-07-15T12:00:00Z is BST.
        let winter = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let summer = Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap();
        assert_eq!(offset_ms_at(DEFAULT_MARKET_TZ, winter.timestamp_millis()), 0);
        assert_eq!(
            offset_ms_at(DEFAULT_MARKET_TZ, summer.timestamp_millis()),
            3_600_000
        );
    }
}
