use std::env;

/// Configuration parameters for the outside-reversal screener
#[derive(Debug, Clone)]
pub struct ScreenerConfig {
    /// Address to bind the HTTP server to
    pub bind: String,
    /// HTTP port
    pub port: u16,
    /// Concurrent upstream fetches per scan; trades latency against
    /// upstream rate-limit risk
    pub concurrency: usize,
    /// Seconds a completed scan is served from cache
    pub cache_ttl_secs: u64,
    /// Per-symbol fetch timeout in seconds
    pub fetch_timeout_secs: u64,
    /// Notify window for intraday detections, in minutes
    pub notify_intraday_window_mins: u64,
    /// Notify window for 2-day detections, in days
    pub notify_two_day_window_days: u64,
    /// Dashboard window for intraday detections, in minutes
    pub report_intraday_window_mins: u64,
    /// Seconds between background notify passes
    pub monitor_interval_secs: u64,
    /// Webhook endpoint for alerts; unset disables notification
    pub webhook_url: Option<String>,
    /// Comma-separated symbol override for the scan universe
    pub symbols_csv: Option<String>,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 3000,
            concurrency: 10,
            cache_ttl_secs: 60,
            fetch_timeout_secs: 8,
            notify_intraday_window_mins: 20,
            notify_two_day_window_days: 3,
            report_intraday_window_mins: 30,
            monitor_interval_secs: 300,
            webhook_url: None,
            symbols_csv: None,
        }
    }
}

impl ScreenerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind: env_str("BIND", &defaults.bind),
            port: env_u16("PORT", defaults.port),
            concurrency: env_usize("SCAN_CONCURRENCY", defaults.concurrency).max(1),
            cache_ttl_secs: env_u64("SCAN_CACHE_TTL_SECS", defaults.cache_ttl_secs),
            fetch_timeout_secs: env_u64("FETCH_TIMEOUT_SECS", defaults.fetch_timeout_secs),
            notify_intraday_window_mins: env_u64(
                "NOTIFY_INTRADAY_WINDOW_MINS",
                defaults.notify_intraday_window_mins,
            ),
            notify_two_day_window_days: env_u64(
                "NOTIFY_TWO_DAY_WINDOW_DAYS",
                defaults.notify_two_day_window_days,
            ),
            report_intraday_window_mins: env_u64(
                "REPORT_INTRADAY_WINDOW_MINS",
                defaults.report_intraday_window_mins,
            ),
            monitor_interval_secs: env_u64(
                "MONITOR_INTERVAL_SECS",
                defaults.monitor_interval_secs,
            ),
            webhook_url: env_opt("SLACK_WEBHOOK_URL"),
            symbols_csv: env_opt("SP500_SYMBOLS_CSV"),
        }
    }
}

fn env_str(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_opt(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_u16(name: &str, default: u16) -> u16 {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_windows() {
        let config = ScreenerConfig::default();
        assert_eq!(config.concurrency, 10);
        assert_eq!(config.cache_ttl_secs, 60);
        assert_eq!(config.notify_intraday_window_mins, 20);
        assert_eq!(config.notify_two_day_window_days, 3);
        assert_eq!(config.report_intraday_window_mins, 30);
        assert!(config.webhook_url.is_none());
    }
}
