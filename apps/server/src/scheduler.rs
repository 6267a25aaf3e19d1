//! Background decay scheduler for the server's account.
//!
//! Catches up immediately on start, then wakes at every local hour boundary
//! plus the configured grace period.

use std::sync::Arc;
use tracing::{info, warn};
use youinc_core::decay::DecayScheduler;

use crate::config::Config;
use crate::main_lib::AppState;

/// Starts the decay scheduler unless disabled by configuration.
pub fn start_decay_scheduler(state: &Arc<AppState>, config: &Config) {
    if !config.decay_scheduler {
        info!("Decay scheduler disabled by YOUINC_DECAY_SCHEDULER");
        return;
    }

    let mut slot = state.decay_scheduler();
    if slot.is_some() {
        warn!("Decay scheduler already running");
        return;
    }
    let handle = DecayScheduler::new(state.decay_service.clone(), state.account_id.clone())
        .with_grace(config.decay_grace)
        .start();
    *slot = Some(handle);
}

/// Stops the scheduler and waits for an in-flight pass to finish.
pub async fn stop_decay_scheduler(state: &AppState) {
    let handle = state.decay_scheduler().take();
    if let Some(handle) = handle {
        handle.stop().await;
    }
}
