use std::time::Duration;

use chrono::{DateTime, Local, Timelike, Utc};

use crate::business_logic::config::ScreenerConfig;

/// Decides whether a detection timestamp is recent enough to report or
/// notify on.
///
/// The source deployment grew three distinct windows for conceptually the same
/// "scan then report if recent" operation; they are kept as independent named
/// policies rather than collapsed into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreshnessPolicy {
    /// Detection must fall within the trailing window of "now".
    Rolling(Duration),
    /// Detection must fall at or after midnight of the current local
    /// calendar day.
    SinceLocalMidnight,
}

impl FreshnessPolicy {
    /// Alert window for the intraday (15m) notify pass.
    pub fn notify_intraday(config: &ScreenerConfig) -> Self {
        Self::Rolling(Duration::from_secs(config.notify_intraday_window_mins * 60))
    }

    /// Alert window for the daily/2-bar notify pass.
    pub fn notify_two_day(config: &ScreenerConfig) -> Self {
        Self::Rolling(Duration::from_secs(
            config.notify_two_day_window_days * 24 * 60 * 60,
        ))
    }

    /// Dashboard window for intraday results.
    pub fn report_intraday(config: &ScreenerConfig) -> Self {
        Self::Rolling(Duration::from_secs(config.report_intraday_window_mins * 60))
    }

    /// Dashboard window for daily/2-bar results: a calendar-day cutoff, not a
    /// rolling one.
    pub fn report_two_day(_config: &ScreenerConfig) -> Self {
        Self::SinceLocalMidnight
    }

    pub fn is_fresh(&self, detection_ms: i64, now: DateTime<Utc>) -> bool {
        match self {
            Self::Rolling(window) => {
                let cutoff = now.timestamp_millis() - window.as_millis() as i64;
                detection_ms >= cutoff
            }
            Self::SinceLocalMidnight => {
                let local = now.with_timezone(&Local);
                let since_midnight_ms =
                    i64::from(local.time().num_seconds_from_midnight()) * 1_000;
                detection_ms >= now.timestamp_millis() - since_midnight_ms
            }
        }
    }
}
