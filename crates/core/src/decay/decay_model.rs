//! Decay domain models.

use serde::{Deserialize, Serialize};

use crate::ledger::Transaction;

/// What one catch-up pass did to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum DecayOutcome {
    /// First pass for this ledger: the watermark was set, nothing was charged.
    #[serde(rename_all = "camelCase")]
    Bootstrapped { watermark: i64 },
    /// No hour boundary was crossed since the last pass.
    #[serde(rename_all = "camelCase")]
    UpToDate { watermark: i64 },
    /// Only closed hours elapsed: the watermark moved, nothing was charged.
    #[serde(rename_all = "camelCase")]
    WatermarkAdvanced { watermark: i64 },
    /// Open hours elapsed and were charged as a single transaction.
    #[serde(rename_all = "camelCase")]
    Charged {
        open_buckets: u32,
        delta: i64,
        valuation: i64,
        watermark: i64,
        transaction: Transaction,
    },
}

impl DecayOutcome {
    pub fn watermark(&self) -> i64 {
        match self {
            DecayOutcome::Bootstrapped { watermark }
            | DecayOutcome::UpToDate { watermark }
            | DecayOutcome::WatermarkAdvanced { watermark }
            | DecayOutcome::Charged { watermark, .. } => *watermark,
        }
    }

    pub fn open_buckets(&self) -> u32 {
        match self {
            DecayOutcome::Charged { open_buckets, .. } => *open_buckets,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SchedulerPhase {
    /// Waiting for the next hour boundary.
    Idle,
    /// Inside an atomic catch-up.
    Applying,
    Stopped,
}

/// Snapshot of the decay scheduler published after every transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerStatus {
    pub account_id: String,
    pub phase: SchedulerPhase,
    pub passes: u64,
    pub last_run_at: Option<i64>,
    pub last_outcome: Option<DecayOutcome>,
    pub last_error: Option<String>,
    pub consecutive_failures: u32,
    /// Set after a failed pass and cleared by the next successful one.
    pub degraded: bool,
    pub next_wake_at: Option<i64>,
}

impl SchedulerStatus {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            phase: SchedulerPhase::Idle,
            passes: 0,
            last_run_at: None,
            last_outcome: None,
            last_error: None,
            consecutive_failures: 0,
            degraded: false,
            next_wake_at: None,
        }
    }
}
