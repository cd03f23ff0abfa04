use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::errors::AppError;
use crate::models::reversal::CronResponse;
use crate::routes::scan::{validate_timeframe, SUPPORTED_TIMEFRAMES};
use crate::services::monitor::MonitorService;
use crate::services::scan::Timeframe;
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
pub struct CronQuery {
    /// Timeframe to scan and notify on. Supported: 15m, 2d.
    #[serde(default = "default_timeframe")]
    #[validate(custom(function = "validate_timeframe"))]
    #[param(example = "2d", default = "2d")]
    pub timeframe: String,
}

fn default_timeframe() -> String {
    "2d".to_string()
}

/// On-demand notify pass: scan the universe and alert on detections inside
/// the timeframe's notify window.
#[utoipa::path(
    get,
    path = "/cron",
    params(CronQuery),
    responses(
        (status = 200, description = "Notify pass summary", body = CronResponse),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    )
)]
pub async fn run_cron(
    State(state): State<AppState>,
    Query(query): Query<CronQuery>,
) -> Result<Json<CronResponse>, AppError> {
    query
        .validate()
        .map_err(|err| AppError::Validation(err.to_string()))?;

    let timeframe = Timeframe::parse(&query.timeframe).ok_or_else(|| {
        AppError::Validation(format!(
            "timeframe must be one of: {}",
            SUPPORTED_TIMEFRAMES.join(", ")
        ))
    })?;

    let monitor = MonitorService::new(
        state.yahoo.clone(),
        state.notifier.clone(),
        (*state.config).clone(),
    );
    let summary = monitor.notify_pass(timeframe).await;

    Ok(Json(CronResponse {
        ok: true,
        scanned: summary.scanned,
        notified: summary.notified,
    }))
}
