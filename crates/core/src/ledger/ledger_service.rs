use async_trait::async_trait;
use log::{debug, info};
use std::sync::Arc;
use tokio::sync::oneshot;

use super::ledger_event::LedgerEvent;
use super::ledger_model::{AppliedDelta, LedgerState};
use super::ledger_traits::{DocumentMutation, DocumentStore, LedgerServiceTrait};
use crate::candles::{build_candle_series, CandleSeries, Timeframe};
use crate::clock::Clock;
use crate::errors::{Error, Result, ValidationError};
use crate::tax::DeltaKind;

/// Runs `update` on the ledger of `account_id` inside one atomic read-modify-write.
///
/// The stored document is parsed with defaults, mutated, and merged back so
/// fields that do not belong to the ledger survive. Whatever `update` returns
/// is handed back once the write has committed.
pub async fn update_ledger<T, F>(store: &dyn DocumentStore, account_id: &str, update: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&mut LedgerState) -> T + Send + 'static,
{
    let (result_tx, result_rx) = oneshot::channel();
    let mutation: DocumentMutation = Box::new(move |previous| {
        let mut state = LedgerState::from_document(previous.as_ref());
        let result = update(&mut state);
        let next = state.merge_into_document(previous);
        // The receiver only goes away if the caller was cancelled.
        let _ = result_tx.send(result);
        Ok(next)
    });

    store.atomic_read_modify_write(account_id, mutation).await?;
    result_rx
        .await
        .map_err(|_| Error::Unexpected("ledger update finished without a result".to_string()))
}

pub struct LedgerService {
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
}

impl LedgerService {
    pub fn new(store: Arc<dyn DocumentStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }
}

#[async_trait]
impl LedgerServiceTrait for LedgerService {
    fn get_state(&self, account_id: &str) -> Result<LedgerState> {
        let document = self.store.load_document(account_id)?;
        Ok(LedgerState::from_document(document.as_ref()))
    }

    async fn apply_delta(
        &self,
        account_id: &str,
        kind: DeltaKind,
        label: &str,
        delta: i64,
    ) -> Result<AppliedDelta> {
        let label = label.trim().to_string();
        if label.is_empty() {
            return Err(ValidationError::MissingField("label".to_string()).into());
        }

        let timestamp = self.clock.now_ms();
        let applied = update_ledger(self.store.as_ref(), account_id, move |state| {
            state.record_delta(kind, &label, delta, timestamp)
        })
        .await?;

        if applied.tax.was_taxed {
            debug!(
                "Taxed {} delta for {}: {} -> {}",
                kind, account_id, delta, applied.tax.effective_delta
            );
        }
        info!(
            "Applied {} to {}: {:+} UC, valuation now {}",
            applied.transaction.label, account_id, applied.tax.effective_delta, applied.valuation
        );
        Ok(applied)
    }

    async fn apply_event(&self, account_id: &str, event: LedgerEvent) -> Result<AppliedDelta> {
        event.validate()?;
        self.apply_delta(account_id, event.kind(), &event.label(), event.delta())
            .await
    }

    fn get_candles(&self, account_id: &str, timeframe: Timeframe) -> Result<CandleSeries> {
        let state = self.get_state(account_id)?;
        Ok(build_candle_series(&state, timeframe, self.clock.now_ms()))
    }
}
