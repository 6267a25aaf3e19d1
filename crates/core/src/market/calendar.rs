//! Market calendar for a single civil timezone.
//!
//! The market is closed every day between 04:00 and 12:00 local time and
//! open otherwise. Hour buckets used for decay accounting are local-hour
//! boundaries converted back to instants, so the offset in force is looked
//! up for every instant queried.

use chrono::Timelike;
use chrono_tz::Tz;

use crate::constants::{HOUR_MS, MARKET_CLOSED_FROM_HOUR, MARKET_CLOSED_UNTIL_HOUR};
use crate::utils::time_utils::{floor_to_bucket, offset_ms_at, utc_from_millis, DEFAULT_MARKET_TZ};

/// Maximum refinement passes when mapping a local wall-clock time to an instant.
const WALL_CLOCK_PASSES: usize = 2;

/// Longest run of local hours a single DST change can skip.
const MAX_SKIPPED_HOURS: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketCalendar {
    tz: Tz,
}

impl Default for MarketCalendar {
    fn default() -> Self {
        Self::new(DEFAULT_MARKET_TZ)
    }
}

impl MarketCalendar {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Returns `true` unless the local hour at `instant_ms` is inside the closed window.
    pub fn is_open(&self, instant_ms: i64) -> bool {
        let Some(utc) = utc_from_millis(instant_ms) else {
            return true;
        };
        let hour = utc.with_timezone(&self.tz).hour();
        !(MARKET_CLOSED_FROM_HOUR..MARKET_CLOSED_UNTIL_HOUR).contains(&hour)
    }

    /// Local wall-clock reading, expressed as milliseconds on a UTC-like axis.
    pub fn instant_to_wall_clock(&self, instant_ms: i64) -> i64 {
        instant_ms + offset_ms_at(self.tz, instant_ms)
    }

    /// Maps a local wall-clock reading back to an instant.
    ///
    /// The offset depends on the instant we are looking for, so it is found
    /// by fixed-point iteration. Local times skipped or repeated by a DST
    /// change have no unique answer; the iteration settles on one of the
    /// candidates and stops after two passes either way.
    pub fn wall_clock_to_instant(&self, wall_ms: i64) -> i64 {
        self.resolve_wall_clock(wall_ms, offset_ms_at(self.tz, wall_ms))
    }

    fn resolve_wall_clock(&self, wall_ms: i64, seed_offset_ms: i64) -> i64 {
        let mut guess = wall_ms - seed_offset_ms;
        for _ in 0..WALL_CLOCK_PASSES {
            let next_guess = wall_ms - offset_ms_at(self.tz, guess);
            if next_guess == guess {
                break;
            }
            guess = next_guess;
        }
        guess
    }

    /// Instant at which the local hour containing `instant_ms` started.
    ///
    /// Never later than `instant_ms`.
    pub fn hour_bucket_start(&self, instant_ms: i64) -> i64 {
        let offset = offset_ms_at(self.tz, instant_ms);
        let wall = floor_to_bucket(instant_ms + offset, HOUR_MS);
        let start = self.resolve_wall_clock(wall, offset);
        if start > instant_ms {
            wall - offset
        } else {
            start
        }
    }

    /// Instant at which the next local hour starts.
    ///
    /// Always later than `instant_ms`. When the next local hour does not
    /// exist (spring forward) the first hour after the gap is returned.
    pub fn next_hour_bucket_start(&self, instant_ms: i64) -> i64 {
        let offset = offset_ms_at(self.tz, instant_ms);
        let wall = floor_to_bucket(instant_ms + offset, HOUR_MS);
        (1..=MAX_SKIPPED_HOURS + 1)
            .map(|hours| self.resolve_wall_clock(wall + hours * HOUR_MS, offset))
            .find(|&candidate| candidate > instant_ms)
            .unwrap_or(instant_ms + HOUR_MS)
    }

    /// Counts local hour boundaries in `(last_bucket_ms, current_bucket_ms]`
    /// at which the market is open.
    pub fn count_open_buckets_between(&self, last_bucket_ms: i64, current_bucket_ms: i64) -> u32 {
        if current_bucket_ms <= last_bucket_ms {
            return 0;
        }

        let last_wall = self.instant_to_wall_clock(last_bucket_ms);
        let current_wall = self.instant_to_wall_clock(current_bucket_ms);

        let mut open_buckets = 0;
        let mut wall = last_wall + HOUR_MS;
        while wall <= current_wall {
            if self.is_open(self.wall_clock_to_instant(wall)) {
                open_buckets += 1;
            }
            wall += HOUR_MS;
        }
        open_buckets
    }
}
