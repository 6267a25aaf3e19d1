use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState, models::DecayStatusResponse};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use youinc_core::decay::DecayOutcome;

/// Runs one catch-up pass now. Safe to call at any time; a pass that finds
/// no new hour boundary changes nothing.
async fn run_decay(State(state): State<Arc<AppState>>) -> ApiResult<Json<DecayOutcome>> {
    let outcome = state
        .decay_service
        .run_decay_catch_up(&state.account_id)
        .await?;
    Ok(Json(outcome))
}

async fn decay_status(State(state): State<Arc<AppState>>) -> Json<DecayStatusResponse> {
    let status = state.decay_scheduler().as_ref().map(|handle| handle.status());
    Json(DecayStatusResponse {
        enabled: status.is_some(),
        degraded: status.as_ref().is_some_and(|s| s.degraded),
        status,
    })
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ledger/decay", post(run_decay))
        .route("/ledger/decay/status", get(decay_status))
}
