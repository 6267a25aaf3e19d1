use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::Config;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use youinc_core::clock::{Clock, SystemClock};
use youinc_core::decay::{DecaySchedulerHandle, DecayService};
use youinc_core::ledger::{LedgerService, LedgerServiceTrait};
use youinc_core::market::MarketCalendar;
use youinc_storage_sqlite::{db, LedgerDocumentRepository};

pub struct AppState {
    pub account_id: String,
    pub calendar: MarketCalendar,
    pub clock: Arc<dyn Clock>,
    pub ledger_service: Arc<dyn LedgerServiceTrait>,
    pub decay_service: Arc<DecayService>,
    /// Set once the background decay scheduler is running.
    pub decay_scheduler: Mutex<Option<DecaySchedulerHandle>>,
}

impl AppState {
    pub fn decay_scheduler(&self) -> MutexGuard<'_, Option<DecaySchedulerHandle>> {
        self.decay_scheduler
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

pub fn init_tracing() {
    let log_format = std::env::var("YOUINC_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    build_state_with_clock(config, Arc::new(SystemClock)).await
}

/// Opens the database and wires the services around `clock`.
pub async fn build_state_with_clock(
    config: &Config,
    clock: Arc<dyn Clock>,
) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer(pool.clone());

    let ledger_repository = Arc::new(LedgerDocumentRepository::new(pool.clone(), writer));
    let calendar = MarketCalendar::new(config.market_tz);
    tracing::info!(
        "Market calendar in {} for account {}",
        calendar.timezone(),
        config.account_id
    );

    let ledger_service: Arc<dyn LedgerServiceTrait> = Arc::new(LedgerService::new(
        ledger_repository.clone(),
        clock.clone(),
    ));
    let decay_service = Arc::new(DecayService::new(
        ledger_repository,
        calendar,
        clock.clone(),
    ));

    Ok(Arc::new(AppState {
        account_id: config.account_id.clone(),
        calendar,
        clock,
        ledger_service,
        decay_service,
        decay_scheduler: Mutex::new(None),
    }))
}
