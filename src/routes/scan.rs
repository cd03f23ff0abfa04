use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use utoipa::IntoParams;
use validator::{Validate, ValidationError};

use crate::business_logic::freshness::FreshnessPolicy;
use crate::errors::AppError;
use crate::models::reversal::{ReversalHit, ScanResponse};
use crate::services::scan::{ScanEngine, Timeframe};
use crate::services::universe::universe_symbols;
use crate::state::AppState;

pub const SUPPORTED_TIMEFRAMES: [&str; 2] = ["15m", "2d"];

#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
pub struct ScanQuery {
    /// Timeframe to scan. Supported: 15m (intraday), 2d (2-day synthetic).
    #[serde(default = "default_timeframe")]
    #[validate(custom(function = "validate_timeframe"))]
    #[param(example = "15m", default = "15m")]
    pub timeframe: String,
}

fn default_timeframe() -> String {
    "15m".to_string()
}

pub fn validate_timeframe(value: &str) -> Result<(), ValidationError> {
    if Timeframe::parse(value).is_some() {
        return Ok(());
    }

    let mut error = ValidationError::new("unsupported_timeframe");
    error.message = Some(
        format!(
            "timeframe must be one of: {}",
            SUPPORTED_TIMEFRAMES.join(", ")
        )
        .into(),
    );
    Err(error)
}

/// Run (or serve from cache) a full-universe scan and report the latest
/// reversal per symbol. Result order is worker completion order, not
/// universe order.
#[utoipa::path(
    get,
    path = "/scan",
    params(ScanQuery),
    responses(
        (status = 200, description = "Latest outside reversals across the universe", body = ScanResponse),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    )
)]
pub async fn get_scan(
    State(state): State<AppState>,
    Query(query): Query<ScanQuery>,
) -> Result<Json<ScanResponse>, AppError> {
    query
        .validate()
        .map_err(|err| AppError::Validation(err.to_string()))?;

    let timeframe = Timeframe::parse(&query.timeframe).ok_or_else(|| {
        AppError::Validation(format!(
            "timeframe must be one of: {}",
            SUPPORTED_TIMEFRAMES.join(", ")
        ))
    })?;

    if let Some(reversals) = state.cache.get(timeframe).await {
        return Ok(Json(ScanResponse {
            reversals,
            cached: true,
        }));
    }

    let symbols = universe_symbols(&state.config);
    let scanned = symbols.len();
    let engine = ScanEngine::new(state.yahoo.clone(), &state.config);
    let outcome = engine.scan(symbols, timeframe).await;

    if !outcome.failures.is_empty() {
        tracing::info!(
            "scan finished with {} of {} symbols skipped on errors",
            outcome.failures.len(),
            scanned
        );
    }

    let policy = match timeframe {
        Timeframe::Intraday15m => FreshnessPolicy::report_intraday(&state.config),
        Timeframe::DailyTwoBar => FreshnessPolicy::report_two_day(&state.config),
    };
    let now = Utc::now();
    let reversals: Vec<ReversalHit> = outcome
        .detections
        .iter()
        .map(|detection| detection.to_hit(policy.is_fresh(detection.event.time, now)))
        .collect();

    state.cache.put(timeframe, reversals.clone()).await;

    Ok(Json(ScanResponse {
        reversals,
        cached: false,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_timeframe_accepts_supported() {
        for timeframe in SUPPORTED_TIMEFRAMES {
            assert!(validate_timeframe(timeframe).is_ok());
        }
    }

    #[test]
    fn validate_timeframe_rejects_unknown() {
        let error = validate_timeframe("1h").unwrap_err();
        assert_eq!(error.code, "unsupported_timeframe");
    }
}
