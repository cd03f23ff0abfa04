use std::sync::Arc;

use chrono::Utc;
use tokio::time::{interval, Duration};

use crate::business_logic::config::ScreenerConfig;
use crate::business_logic::freshness::FreshnessPolicy;
use crate::services::notifier::WebhookNotifier;
use crate::services::scan::{BarSource, ScanEngine, Timeframe};
use crate::services::universe::universe_symbols;

#[derive(Debug, Clone, Copy)]
pub struct NotifyPassSummary {
    /// Symbols visited this pass
    pub scanned: usize,
    /// Alerts delivered this pass
    pub notified: usize,
}

/// Background notify service: periodically scans the universe on the
/// daily/2-bar timeframe and alerts on detections inside the notify window.
/// The same pass runs on demand through the cron route, on either timeframe.
pub struct MonitorService<S> {
    engine: ScanEngine<S>,
    notifier: Arc<WebhookNotifier>,
    config: ScreenerConfig,
}

impl<S: BarSource> MonitorService<S> {
    pub fn new(source: Arc<S>, notifier: Arc<WebhookNotifier>, config: ScreenerConfig) -> Self {
        Self {
            engine: ScanEngine::new(source, &config),
            notifier,
            config,
        }
    }

    /// Run notify passes forever on the configured interval.
    pub async fn run(&self) {
        let mut ticker = interval(Duration::from_secs(self.config.monitor_interval_secs.max(1)));

        loop {
            ticker.tick().await;

            let summary = self.notify_pass(Timeframe::DailyTwoBar).await;
            tracing::info!(
                "notify pass done: {} symbols scanned, {} alerts sent",
                summary.scanned,
                summary.notified
            );
        }
    }

    /// One scan-then-notify pass over the full universe. Only detections
    /// inside the timeframe's notify window are alerted; repeated passes rely
    /// on window sizing, not dedup state, to avoid stale alerts.
    pub async fn notify_pass(&self, timeframe: Timeframe) -> NotifyPassSummary {
        let symbols = universe_symbols(&self.config);
        let scanned = symbols.len();

        let policy = match timeframe {
            Timeframe::Intraday15m => FreshnessPolicy::notify_intraday(&self.config),
            Timeframe::DailyTwoBar => FreshnessPolicy::notify_two_day(&self.config),
        };

        let outcome = self.engine.scan(symbols, timeframe).await;
        if !outcome.failures.is_empty() {
            tracing::debug!(
                "notify pass skipped {} symbols on errors",
                outcome.failures.len()
            );
        }

        let now = Utc::now();
        let mut notified = 0;
        for detection in &outcome.detections {
            if policy.is_fresh(detection.event.time, now) {
                self.notifier.notify(&detection.to_hit(true)).await;
                notified += 1;
            }
        }

        NotifyPassSummary { scanned, notified }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::scan::testing::{reversal_bars, StaticSource};

    fn config(symbols: &str) -> ScreenerConfig {
        ScreenerConfig {
            symbols_csv: Some(symbols.to_string()),
            concurrency: 2,
            ..ScreenerConfig::default()
        }
    }

    #[tokio::test]
    async fn notifies_only_fresh_detections() {
        let now_ms = Utc::now().timestamp_millis();
        let mut source = StaticSource::default();
        // Inside the 20-minute intraday notify window.
        source.bars.insert("AAPL".to_string(), reversal_bars(now_ms));
        // Far outside every window.
        source.bars.insert("MSFT".to_string(), reversal_bars(1_000_000));

        let monitor = MonitorService::new(
            Arc::new(source),
            Arc::new(WebhookNotifier::new(None)),
            config("AAPL,MSFT"),
        );

        let summary = monitor.notify_pass(Timeframe::Intraday15m).await;
        assert_eq!(summary.scanned, 2);
        assert_eq!(summary.notified, 1);
    }

    #[tokio::test]
    async fn empty_universe_scans_nothing() {
        let monitor = MonitorService::new(
            Arc::new(StaticSource::default()),
            Arc::new(WebhookNotifier::new(None)),
            config(" "),
        );

        let summary = monitor.notify_pass(Timeframe::DailyTwoBar).await;
        assert_eq!(summary.scanned, 0);
        assert_eq!(summary.notified, 0);
    }
}
