//! Decay module - hourly valuation decay during open market hours.

mod decay_model;
mod decay_scheduler;
mod decay_service;

pub use decay_model::{DecayOutcome, SchedulerPhase, SchedulerStatus};
pub use decay_scheduler::{DecayScheduler, DecaySchedulerHandle};
pub use decay_service::{apply_decay_catch_up, DecayService};
