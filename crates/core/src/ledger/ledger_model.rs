//! Ledger domain models and the persisted document mapping.

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::constants::{INITIAL_VALUATION_UC, MAX_LEDGER_TRANSACTIONS};
use crate::tax::{apply_tax, DeltaKind, TaxOutcome};

const FIELD_VALUATION: &str = "valuation";
const FIELD_TRANSACTIONS: &str = "transactions";
const FIELD_DECAY_WATERMARK: &str = "decayWatermark";

// Field names written by the first version of the app.
const LEGACY_FIELD_VALUATION: &str = "marketCapUC";
const LEGACY_FIELD_TRANSACTIONS: &str = "tx";
const LEGACY_FIELD_DECAY_WATERMARK: &str = "lastDecayHourTs";

/// A single valuation change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(alias = "ts")]
    pub timestamp: i64,
    #[serde(alias = "deltaUC")]
    pub delta: i64,
    pub label: String,
}

impl Transaction {
    pub fn new(timestamp: i64, delta: i64, label: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp,
            delta,
            label: label.into(),
        }
    }
}

/// Valuation, bounded transaction log (newest first) and decay watermark of one account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LedgerState {
    pub valuation: i64,
    pub transactions: Vec<Transaction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decay_watermark: Option<i64>,
}

impl Default for LedgerState {
    fn default() -> Self {
        Self {
            valuation: INITIAL_VALUATION_UC,
            transactions: Vec::new(),
            decay_watermark: None,
        }
    }
}

/// Outcome of a taxed delta recorded on the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppliedDelta {
    pub kind: DeltaKind,
    pub requested_delta: i64,
    pub tax: TaxOutcome,
    pub transaction: Transaction,
    pub valuation: i64,
}

impl LedgerState {
    /// Reads a stored document, substituting defaults for anything missing or malformed.
    ///
    /// Never fails: an absent document, a non-object document, fields of the
    /// wrong type and unparsable transactions all fall back to the defaults.
    pub fn from_document(document: Option<&Value>) -> Self {
        let Some(object) = document.and_then(Value::as_object) else {
            if let Some(other) = document {
                if !other.is_null() {
                    warn!("Ledger document is not an object, using defaults");
                }
            }
            return Self::default();
        };

        let valuation = field(object, FIELD_VALUATION, LEGACY_FIELD_VALUATION)
            .and_then(integer_value)
            .map(|v| v.max(0))
            .unwrap_or(INITIAL_VALUATION_UC);

        let transactions = field(object, FIELD_TRANSACTIONS, LEGACY_FIELD_TRANSACTIONS)
            .and_then(Value::as_array)
            .map(|entries| parse_transactions(entries.as_slice()))
            .unwrap_or_default();

        let decay_watermark = field(object, FIELD_DECAY_WATERMARK, LEGACY_FIELD_DECAY_WATERMARK)
            .and_then(integer_value);

        Self {
            valuation,
            transactions,
            decay_watermark,
        }
    }

    /// Writes the ledger fields into `previous`, keeping any unrelated fields it holds.
    pub fn merge_into_document(&self, previous: Option<Value>) -> Value {
        let mut object = match previous {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };
        for legacy in [
            LEGACY_FIELD_VALUATION,
            LEGACY_FIELD_TRANSACTIONS,
            LEGACY_FIELD_DECAY_WATERMARK,
        ] {
            object.remove(legacy);
        }

        object.insert(FIELD_VALUATION.to_string(), Value::from(self.valuation));
        object.insert(
            FIELD_TRANSACTIONS.to_string(),
            Value::Array(
                self.transactions
                    .iter()
                    .map(|tx| {
                        serde_json::json!({
                            "id": tx.id,
                            "timestamp": tx.timestamp,
                            "delta": tx.delta,
                            "label": tx.label,
                        })
                    })
                    .collect(),
            ),
        );
        match self.decay_watermark {
            Some(watermark) => {
                object.insert(FIELD_DECAY_WATERMARK.to_string(), Value::from(watermark));
            }
            None => {
                object.remove(FIELD_DECAY_WATERMARK);
            }
        }
        Value::Object(object)
    }

    /// Adds `delta` to the valuation, flooring the result at zero.
    pub fn apply_effective_delta(&mut self, delta: i64) -> i64 {
        self.valuation = self.valuation.saturating_add(delta).max(0);
        self.valuation
    }

    /// Prepends a transaction and drops the oldest ones beyond the cap.
    pub fn push_transaction(&mut self, transaction: Transaction) {
        self.transactions.insert(0, transaction);
        self.transactions.truncate(MAX_LEDGER_TRANSACTIONS);
    }

    /// Taxes `delta`, applies it and logs it as one transaction.
    pub fn record_delta(
        &mut self,
        kind: DeltaKind,
        label: &str,
        delta: i64,
        timestamp: i64,
    ) -> AppliedDelta {
        let tax = apply_tax(kind, delta, self.valuation);
        let valuation = self.apply_effective_delta(tax.effective_delta);
        let label = if tax.was_taxed {
            format!("{} (taxed)", label)
        } else {
            label.to_string()
        };
        let transaction = Transaction::new(timestamp, tax.effective_delta, label);
        self.push_transaction(transaction.clone());

        AppliedDelta {
            kind,
            requested_delta: delta,
            tax,
            transaction,
            valuation,
        }
    }

    /// Transactions sorted by ascending timestamp, ready for replay.
    pub fn transactions_ascending(&self) -> Vec<Transaction> {
        let mut sorted = self.transactions.clone();
        sorted.sort_by_key(|tx| tx.timestamp);
        sorted
    }
}

fn field<'a>(object: &'a Map<String, Value>, name: &str, legacy: &str) -> Option<&'a Value> {
    object.get(name).or_else(|| object.get(legacy))
}

fn integer_value(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.is_finite()).map(|f| f.round() as i64))
}

fn parse_transactions(entries: &[Value]) -> Vec<Transaction> {
    let mut skipped = 0usize;
    let mut transactions: Vec<Transaction> = entries
        .iter()
        .filter_map(|entry| match serde_json::from_value::<Transaction>(entry.clone()) {
            Ok(tx) => Some(tx),
            Err(_) => {
                skipped += 1;
                None
            }
        })
        .collect();
    if skipped > 0 {
        warn!("Skipped {} malformed ledger transactions", skipped);
    }
    transactions.truncate(MAX_LEDGER_TRANSACTIONS);
    transactions
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_document_yields_initial_state() {
        let state = LedgerState::from_document(None);
        assert_eq!(state.valuation, INITIAL_VALUATION_UC);
        assert!(state.transactions.is_empty());
        assert_eq!(state.decay_watermark, None);
    }

    #[test]
    fn malformed_fields_fall_back_to_defaults() {
        let doc = json!({
            "valuation": "lots",
            "transactions": { "not": "an array" },
            "decayWatermark": "yesterday",
        });
        assert_eq!(LedgerState::from_document(Some(&doc)), LedgerState::default());

        let not_an_object = json!([1, 2, 3]);
        assert_eq!(
            LedgerState::from_document(Some(&not_an_object)),
            LedgerState::default()
        );
    }

    #[test]
    fn malformed_transactions_are_skipped_individually() {
        let doc = json!({
            "valuation": 12000,
            "transactions": [
                { "id": "a", "timestamp": 2, "delta": 100, "label": "Goal complete" },
                { "id": "b", "timestamp": "soon", "delta": 1, "label": "bad" },
                { "id": "c", "timestamp": 1, "delta": -5, "label": "Decay x1" },
            ],
        });
        let state = LedgerState::from_document(Some(&doc));
        assert_eq!(state.valuation, 12000);
        let ids: Vec<_> = state.transactions.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn negative_valuation_is_clamped() {
        let doc = json!({ "valuation": -40 });
        assert_eq!(LedgerState::from_document(Some(&doc)).valuation, 0);
    }

    #[test]
    fn legacy_field_names_are_read_and_replaced_on_write() {
        let doc = json!({
            "marketCapUC": 15000,
            "lastDecayHourTs": 3_600_000,
            "tx": [{ "id": "x", "ts": 10, "deltaUC": 400, "label": "Goal complete" }],
            "goals": [{ "id": "g1" }],
        });
        let state = LedgerState::from_document(Some(&doc));
        assert_eq!(state.valuation, 15000);
        assert_eq!(state.decay_watermark, Some(3_600_000));
        assert_eq!(state.transactions[0].timestamp, 10);
        assert_eq!(state.transactions[0].delta, 400);

        let written = state.merge_into_document(Some(doc));
        assert_eq!(written["valuation"], 15000);
        assert_eq!(written["decayWatermark"], 3_600_000);
        assert_eq!(written["transactions"][0]["timestamp"], 10);
        assert_eq!(written["goals"][0]["id"], "g1");
        assert!(written.get("marketCapUC").is_none());
        assert!(written.get("tx").is_none());
    }

    #[test]
    fn record_delta_marks_taxed_transactions() {
        let mut state = LedgerState {
            valuation: 100_000,
            ..LedgerState::default()
        };
        let applied = state.record_delta(DeltaKind::Good, "Good habit hold", 100, 1_000);
        assert_eq!(applied.tax.effective_delta, 75);
        assert_eq!(applied.transaction.label, "Good habit hold (taxed)");
        assert_eq!(state.valuation, 100_075);
        assert_eq!(state.transactions.len(), 1);
    }

    #[test]
    fn losses_floor_valuation_at_zero() {
        let mut state = LedgerState {
            valuation: 30,
            ..LedgerState::default()
        };
        let applied = state.record_delta(DeltaKind::Goal, "Goal failed", -200, 1);
        assert_eq!(applied.valuation, 0);
        assert_eq!(applied.transaction.delta, -200);
    }

    #[test]
    fn log_is_capped_newest_first() {
        let mut state = LedgerState::default();
        for i in 0..(MAX_LEDGER_TRANSACTIONS as i64 + 5) {
            state.push_transaction(Transaction::new(i, 1, "Buy"));
        }
        assert_eq!(state.transactions.len(), MAX_LEDGER_TRANSACTIONS);
        assert_eq!(state.transactions[0].timestamp, MAX_LEDGER_TRANSACTIONS as i64 + 4);
        assert_eq!(state.transactions.last().map(|t| t.timestamp), Some(5));
    }
}
