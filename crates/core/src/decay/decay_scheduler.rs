//! Background driver for the decay catch-up.
//!
//! Runs one pass immediately, then sleeps until the next local hour boundary
//! plus a small grace period. Status is published on a watch channel.

use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::decay_model::{SchedulerPhase, SchedulerStatus};
use super::decay_service::DecayService;
use crate::constants::DECAY_WAKE_GRACE_MS;

pub struct DecayScheduler {
    service: Arc<DecayService>,
    account_id: String,
    grace: Duration,
}

impl DecayScheduler {
    pub fn new(service: Arc<DecayService>, account_id: impl Into<String>) -> Self {
        Self {
            service,
            account_id: account_id.into(),
            grace: Duration::from_millis(DECAY_WAKE_GRACE_MS),
        }
    }

    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    /// Spawns the loop on the current tokio runtime.
    pub fn start(self) -> DecaySchedulerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (status_tx, status_rx) = watch::channel(SchedulerStatus::new(self.account_id.clone()));
        let task = tokio::spawn(self.run(shutdown_rx, status_tx));
        DecaySchedulerHandle {
            shutdown_tx,
            status_rx,
            task,
        }
    }

    async fn run(
        self,
        mut shutdown_rx: watch::Receiver<bool>,
        status_tx: watch::Sender<SchedulerStatus>,
    ) {
        info!(
            "Decay scheduler started for {} (grace {} ms)",
            self.account_id,
            self.grace.as_millis()
        );

        loop {
            if *shutdown_rx.borrow() {
                break;
            }

            status_tx.send_modify(|s| s.phase = SchedulerPhase::Applying);
            let result = self.service.run_decay_catch_up(&self.account_id).await;

            let (now, next_boundary) = self.service.next_boundary();
            let grace_ms = i64::try_from(self.grace.as_millis()).unwrap_or(i64::MAX);
            // Sleep at least the grace period even if the boundary is not ahead of us.
            let wake_at = next_boundary.max(now).saturating_add(grace_ms);
            let delay = Duration::from_millis(u64::try_from(wake_at - now).unwrap_or(0));

            status_tx.send_modify(|s| {
                s.phase = SchedulerPhase::Idle;
                s.passes += 1;
                s.last_run_at = Some(now);
                s.next_wake_at = Some(wake_at);
                match &result {
                    Ok(outcome) => {
                        s.last_outcome = Some(outcome.clone());
                        s.last_error = None;
                        s.consecutive_failures = 0;
                        s.degraded = false;
                    }
                    Err(e) => {
                        s.last_error = Some(e.to_string());
                        s.consecutive_failures += 1;
                        s.degraded = true;
                    }
                }
            });

            if let Err(e) = &result {
                warn!(
                    "Decay pass for {} failed, retrying at next boundary: {}",
                    self.account_id, e
                );
            }

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        status_tx.send_modify(|s| s.phase = SchedulerPhase::Stopped);
        info!("Decay scheduler stopped for {}", self.account_id);
    }
}

/// Owner of a running scheduler. Dropping it also stops the loop.
pub struct DecaySchedulerHandle {
    shutdown_tx: watch::Sender<bool>,
    status_rx: watch::Receiver<SchedulerStatus>,
    task: JoinHandle<()>,
}

impl DecaySchedulerHandle {
    pub fn status(&self) -> SchedulerStatus {
        self.status_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SchedulerStatus> {
        self.status_rx.clone()
    }

    /// Signals shutdown and waits for an in-flight pass to finish.
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.task.await {
            warn!("Decay scheduler task ended abnormally: {}", e);
        }
    }
}
