//! Hourly decay catch-up.
//!
//! Each pass charges every open market hour elapsed since the persisted
//! watermark in one aggregated transaction and moves the watermark to the
//! current hour bucket. The open-hour count is always derived from the stored
//! watermark, so a failed or repeated pass never double charges.

use log::{debug, info};
use std::sync::Arc;

use super::decay_model::DecayOutcome;
use crate::clock::Clock;
use crate::constants::DECAY_PER_OPEN_HOUR_UC;
use crate::errors::Result;
use crate::ledger::{update_ledger, DocumentStore, LedgerState, Transaction};
use crate::market::MarketCalendar;
use crate::tax::{apply_tax, DeltaKind};

/// Applies one catch-up step to `state` as of `current_bucket`.
///
/// The watermark is never moved backwards: a `current_bucket` at or before
/// the stored watermark leaves the ledger untouched.
pub fn apply_decay_catch_up(
    state: &mut LedgerState,
    calendar: &MarketCalendar,
    current_bucket: i64,
    now_ms: i64,
) -> DecayOutcome {
    let Some(watermark) = state.decay_watermark else {
        state.decay_watermark = Some(current_bucket);
        return DecayOutcome::Bootstrapped {
            watermark: current_bucket,
        };
    };

    if current_bucket <= watermark {
        return DecayOutcome::UpToDate { watermark };
    }

    let open_buckets = calendar.count_open_buckets_between(watermark, current_bucket);
    state.decay_watermark = Some(current_bucket);
    if open_buckets == 0 {
        return DecayOutcome::WatermarkAdvanced {
            watermark: current_bucket,
        };
    }

    let delta = -DECAY_PER_OPEN_HOUR_UC * i64::from(open_buckets);
    // Decay is a loss and passes through untaxed; the rule still gets the final say.
    let tax = apply_tax(DeltaKind::Decay, delta, state.valuation);
    let valuation = state.apply_effective_delta(tax.effective_delta);
    let transaction = Transaction::new(
        now_ms,
        tax.effective_delta,
        format!("Decay x{}", open_buckets),
    );
    state.push_transaction(transaction.clone());

    DecayOutcome::Charged {
        open_buckets,
        delta: tax.effective_delta,
        valuation,
        watermark: current_bucket,
        transaction,
    }
}

pub struct DecayService {
    store: Arc<dyn DocumentStore>,
    calendar: MarketCalendar,
    clock: Arc<dyn Clock>,
}

impl DecayService {
    pub fn new(store: Arc<dyn DocumentStore>, calendar: MarketCalendar, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            calendar,
            clock,
        }
    }

    pub fn calendar(&self) -> &MarketCalendar {
        &self.calendar
    }

    /// Current instant and the start of the next local hour, in epoch milliseconds.
    pub fn next_boundary(&self) -> (i64, i64) {
        let now = self.clock.now_ms();
        (now, self.calendar.next_hour_bucket_start(now))
    }

    /// Runs one catch-up pass for `account_id` inside a single atomic read-modify-write.
    ///
    /// On error nothing was written; calling again later is always safe.
    pub async fn run_decay_catch_up(&self, account_id: &str) -> Result<DecayOutcome> {
        let now = self.clock.now_ms();
        let current_bucket = self.calendar.hour_bucket_start(now);
        let calendar = self.calendar;

        let outcome = update_ledger(self.store.as_ref(), account_id, move |state| {
            apply_decay_catch_up(state, &calendar, current_bucket, now)
        })
        .await?;

        match &outcome {
            DecayOutcome::Charged {
                open_buckets,
                delta,
                valuation,
                ..
            } => info!(
                "Decay charged {} open hour(s) to {}: {} UC, valuation now {}",
                open_buckets, account_id, delta, valuation
            ),
            DecayOutcome::Bootstrapped { watermark } => {
                info!("Decay tracking started for {} at {}", account_id, watermark)
            }
            other => debug!("Decay pass for {}: {:?}", account_id, other),
        }
        Ok(outcome)
    }
}
