use chrono::{SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Direction of an outside reversal, inferred from the triggering bar's own
/// close-vs-open relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Bullish,
    Bearish,
}

impl Direction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Bullish => "bullish",
            Self::Bearish => "bearish",
        }
    }
}

/// One detected outside-reversal occurrence within a bar sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct ReversalEvent {
    /// Position of the triggering bar in the scanned sequence
    pub index: usize,
    /// Triggering bar's open time (epoch ms)
    pub time: i64,
    pub direction: Direction,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Ohlc {
    pub o: f64,
    pub h: f64,
    pub l: f64,
    pub c: f64,
}

/// Per-symbol scan result entry: the most recent detection for that symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReversalHit {
    pub symbol: String,
    /// Timeframe label ("15m" or "2D")
    pub timeframe: String,
    pub direction: Direction,
    /// Detection time as RFC 3339 (the raw instant, for client-side filtering)
    pub time: String,
    pub ohlc: Ohlc,
    /// Whether the detection met the report freshness policy at scan time
    pub fresh: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ScanResponse {
    pub reversals: Vec<ReversalHit>,
    /// True when this response was served from the result cache
    pub cached: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CronResponse {
    pub ok: bool,
    /// Symbols visited this pass
    pub scanned: usize,
    /// Alerts delivered this pass
    pub notified: usize,
}

/// Format an epoch-ms detection time for the HTTP boundary.
pub fn format_time_iso(time_ms: i64) -> String {
    match Utc.timestamp_millis_opt(time_ms).single() {
        Some(dt) => dt.to_rfc3339_opts(SecondsFormat::Millis, true),
        None => time_ms.to_string(),
    }
}
