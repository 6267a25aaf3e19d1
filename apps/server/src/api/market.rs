use std::sync::Arc;

use crate::{
    error::ApiResult,
    main_lib::AppState,
    models::{MarketStatusQuery, MarketStatusResponse, TaxPreviewRequest, TaxPreviewResponse},
};
use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    routing::{get, post},
    Json, Router,
};
use youinc_core::tax::{apply_tax, price_from_valuation, tax_multiplier, DeltaKind};

/// Taxes a proposed delta without touching the ledger.
async fn preview_tax(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TaxPreviewRequest>, JsonRejection>,
) -> ApiResult<Json<TaxPreviewResponse>> {
    let Json(request) = payload?;
    let kind: DeltaKind = request.kind.parse()?;
    let valuation = match request.valuation {
        Some(v) => v.max(0),
        None => state.ledger_service.get_state(&state.account_id)?.valuation,
    };
    let price = price_from_valuation(valuation);

    Ok(Json(TaxPreviewResponse {
        valuation,
        price,
        multiplier: tax_multiplier(kind, price),
        outcome: apply_tax(kind, request.delta, valuation),
    }))
}

async fn market_status(
    State(state): State<Arc<AppState>>,
    query: Result<Query<MarketStatusQuery>, QueryRejection>,
) -> ApiResult<Json<MarketStatusResponse>> {
    let Query(query) = query?;
    let at = query.at.unwrap_or_else(|| state.clock.now_ms());
    let calendar = &state.calendar;

    Ok(Json(MarketStatusResponse {
        at,
        timezone: calendar.timezone().name().to_string(),
        open: calendar.is_open(at),
        hour_bucket_start: calendar.hour_bucket_start(at),
        next_hour_bucket_start: calendar.next_hour_bucket_start(at),
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tax/preview", post(preview_tax))
        .route("/market/status", get(market_status))
}
