//! Request and response bodies of the HTTP API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use youinc_core::decay::SchedulerStatus;
use youinc_core::tax::TaxOutcome;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyDeltaRequest {
    pub kind: String,
    pub label: String,
    pub delta: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandlesQuery {
    pub timeframe: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxPreviewRequest {
    pub kind: String,
    pub delta: i64,
    /// Valuation to tax against; the ledger's current valuation when absent.
    pub valuation: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxPreviewResponse {
    pub valuation: i64,
    pub price: Decimal,
    pub multiplier: Decimal,
    #[serde(flatten)]
    pub outcome: TaxOutcome,
}

#[derive(Debug, Default, Deserialize)]
pub struct MarketStatusQuery {
    pub at: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketStatusResponse {
    pub at: i64,
    pub timezone: String,
    pub open: bool,
    pub hour_bucket_start: i64,
    pub next_hour_bucket_start: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecayStatusResponse {
    pub enabled: bool,
    pub degraded: bool,
    pub status: Option<SchedulerStatus>,
}
