use std::sync::Arc;

use crate::{
    error::ApiResult,
    main_lib::AppState,
    models::{ApplyDeltaRequest, CandlesQuery},
};
use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    routing::{get, post},
    Json, Router,
};
use youinc_core::candles::{CandleSeries, Timeframe};
use youinc_core::ledger::{AppliedDelta, LedgerEvent, LedgerState};
use youinc_core::tax::DeltaKind;

async fn get_ledger(State(state): State<Arc<AppState>>) -> ApiResult<Json<LedgerState>> {
    let ledger = state.ledger_service.get_state(&state.account_id)?;
    Ok(Json(ledger))
}

async fn apply_event(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LedgerEvent>, JsonRejection>,
) -> ApiResult<Json<AppliedDelta>> {
    let Json(event) = payload?;
    let applied = state
        .ledger_service
        .apply_event(&state.account_id, event)
        .await?;
    Ok(Json(applied))
}

async fn apply_delta(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ApplyDeltaRequest>, JsonRejection>,
) -> ApiResult<Json<AppliedDelta>> {
    let Json(request) = payload?;
    let kind: DeltaKind = request.kind.parse()?;
    let applied = state
        .ledger_service
        .apply_delta(&state.account_id, kind, &request.label, request.delta)
        .await?;
    Ok(Json(applied))
}

async fn get_candles(
    State(state): State<Arc<AppState>>,
    query: Result<Query<CandlesQuery>, QueryRejection>,
) -> ApiResult<Json<CandleSeries>> {
    let Query(query) = query?;
    let timeframe = match query.timeframe.as_deref() {
        Some(raw) => raw.parse::<Timeframe>()?,
        None => Timeframe::default(),
    };
    let series = state
        .ledger_service
        .get_candles(&state.account_id, timeframe)?;
    Ok(Json(series))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ledger", get(get_ledger))
        .route("/ledger/events", post(apply_event))
        .route("/ledger/deltas", post(apply_delta))
        .route("/ledger/candles", get(get_candles))
}
