/// Valuation units per one unit of price (10000 UC = 1.0000 U$)
pub const UC_PER_PRICE_UNIT: i64 = 10_000;

/// Valuation every new ledger starts from
pub const INITIAL_VALUATION_UC: i64 = 10_000;

/// Number of most recent transactions kept in a ledger document
pub const MAX_LEDGER_TRANSACTIONS: usize = 2_000;

/// Decay charged for each open market hour
pub const DECAY_PER_OPEN_HOUR_UC: i64 = 5;

/// First local hour of the daily closed window (inclusive)
pub const MARKET_CLOSED_FROM_HOUR: u32 = 4;

/// Local hour at which the market opens again (exclusive end of the closed window)
pub const MARKET_CLOSED_UNTIL_HOUR: u32 = 12;

/// Delay added after an hour boundary before the scheduler wakes up
pub const DECAY_WAKE_GRACE_MS: u64 = 2_000;

/// Account used when the deployment serves a single user
pub const DEFAULT_ACCOUNT_ID: &str = "me";

pub const HOUR_MS: i64 = 60 * 60 * 1000;
pub const DAY_MS: i64 = 24 * HOUR_MS;
pub const WEEK_MS: i64 = 7 * DAY_MS;
