use async_trait::async_trait;
use serde_json::Value;

use crate::candles::{CandleSeries, Timeframe};
use crate::errors::Result;
use crate::ledger::ledger_event::LedgerEvent;
use crate::ledger::ledger_model::{AppliedDelta, LedgerState};
use crate::tax::DeltaKind;

/// Computes the document to persist from the current one (`None` when absent).
pub type DocumentMutation = Box<dyn FnOnce(Option<Value>) -> Result<Value> + Send + 'static>;

/// Persisted per-account documents with an atomic read-modify-write.
///
/// `atomic_read_modify_write` must behave as one all-or-nothing step under
/// concurrent callers: two writers never observe the same prior document and
/// both commit. If the mutation returns an error, nothing is written; if it
/// returns the stored document unchanged, the write may be skipped.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    fn load_document(&self, key: &str) -> Result<Option<Value>>;

    /// Runs `mutation` against the stored document and persists its result.
    /// Returns the persisted document.
    async fn atomic_read_modify_write(&self, key: &str, mutation: DocumentMutation)
        -> Result<Value>;
}

/// Trait for ledger service operations
#[async_trait]
pub trait LedgerServiceTrait: Send + Sync {
    fn get_state(&self, account_id: &str) -> Result<LedgerState>;
    async fn apply_delta(
        &self,
        account_id: &str,
        kind: DeltaKind,
        label: &str,
        delta: i64,
    ) -> Result<AppliedDelta>;
    async fn apply_event(&self, account_id: &str, event: LedgerEvent) -> Result<AppliedDelta>;
    fn get_candles(&self, account_id: &str, timeframe: Timeframe) -> Result<CandleSeries>;
}
