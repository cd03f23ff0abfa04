use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tokio::time::timeout;

use crate::business_logic::config::ScreenerConfig;
use crate::business_logic::reversal::{aggregate_two_day, detect_outside_reversals};
use crate::models::bar::Bar;
use crate::models::reversal::{format_time_iso, Ohlc, ReversalEvent, ReversalHit};
use crate::services::yahoo::FetchError;

/// Timeframes the screener scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeframe {
    /// 15-minute intraday bars, scanned as-is
    Intraday15m,
    /// Daily bars collapsed into overlapping 2-day synthetic bars
    DailyTwoBar,
}

impl Timeframe {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "15m" => Some(Self::Intraday15m),
            "2d" | "2D" => Some(Self::DailyTwoBar),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Intraday15m => "15m",
            Self::DailyTwoBar => "2D",
        }
    }
}

/// Upstream seam for the scan engine, so tests can run it against canned bar
/// sequences instead of the live chart API.
pub trait BarSource: Send + Sync + 'static {
    fn fetch_intraday(
        &self,
        symbol: &str,
    ) -> impl Future<Output = Result<Vec<Bar>, FetchError>> + Send;

    fn fetch_daily(
        &self,
        symbol: &str,
    ) -> impl Future<Output = Result<Vec<Bar>, FetchError>> + Send;
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("fetch timed out after {0:?}")]
    Timeout(Duration),
}

/// The most recent reversal found for one symbol.
#[derive(Debug, Clone)]
pub struct Detection {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub event: ReversalEvent,
}

impl Detection {
    pub fn to_hit(&self, fresh: bool) -> ReversalHit {
        ReversalHit {
            symbol: self.symbol.clone(),
            timeframe: self.timeframe.label().to_string(),
            direction: self.event.direction,
            time: format_time_iso(self.event.time),
            ohlc: Ohlc {
                o: self.event.open,
                h: self.event.high,
                l: self.event.low,
                c: self.event.close,
            },
            fresh,
        }
    }
}

/// One symbol the scan could not process. Kept internally so failure
/// isolation stays observable; the outward-facing result reports successes
/// only.
#[derive(Debug)]
pub struct SymbolFailure {
    pub symbol: String,
    pub error: ScanError,
}

#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub detections: Vec<Detection>,
    pub failures: Vec<SymbolFailure>,
}

/// Bounded-concurrency fan-out over the symbol universe.
///
/// A fixed pool of workers drains one shared queue, so load balances
/// naturally as faster symbols finish sooner. Every fetch is bounded by the
/// configured per-symbol timeout, and any per-symbol failure is recorded and
/// skipped; one bad symbol never aborts the scan.
pub struct ScanEngine<S> {
    source: Arc<S>,
    concurrency: usize,
    fetch_timeout: Duration,
}

impl<S: BarSource> ScanEngine<S> {
    pub fn new(source: Arc<S>, config: &ScreenerConfig) -> Self {
        Self {
            source,
            concurrency: config.concurrency.max(1),
            fetch_timeout: Duration::from_secs(config.fetch_timeout_secs),
        }
    }

    /// Scan the given symbols, returning the latest detection per symbol.
    ///
    /// Detections land in worker completion order, which need not match the
    /// input order. Dropping the returned future aborts the workers, so a
    /// cancelled invocation stops claiming new symbols.
    pub async fn scan(&self, symbols: Vec<String>, timeframe: Timeframe) -> ScanOutcome {
        let queue = Arc::new(Mutex::new(VecDeque::from(symbols)));
        let detections: Arc<Mutex<Vec<Detection>>> = Arc::new(Mutex::new(Vec::new()));
        let failures: Arc<Mutex<Vec<SymbolFailure>>> = Arc::new(Mutex::new(Vec::new()));

        let mut workers = JoinSet::new();
        for _ in 0..self.concurrency {
            let queue = queue.clone();
            let detections = detections.clone();
            let failures = failures.clone();
            let source = self.source.clone();
            let fetch_timeout = self.fetch_timeout;

            workers.spawn(async move {
                loop {
                    // Atomic remove-and-return; the lock never spans an await.
                    let symbol = { queue.lock().await.pop_front() };
                    let Some(symbol) = symbol else {
                        break;
                    };

                    match process_symbol(&*source, &symbol, timeframe, fetch_timeout).await {
                        Ok(Some(event)) => {
                            detections.lock().await.push(Detection {
                                symbol,
                                timeframe,
                                event,
                            });
                        }
                        Ok(None) => {}
                        Err(error) => {
                            tracing::debug!("scan skipped {}: {}", symbol, error);
                            failures.lock().await.push(SymbolFailure { symbol, error });
                        }
                    }
                }
            });
        }

        while workers.join_next().await.is_some() {}

        let outcome = ScanOutcome {
            detections: std::mem::take(&mut *detections.lock().await),
            failures: std::mem::take(&mut *failures.lock().await),
        };
        outcome
    }
}

/// Fetch, optionally aggregate, detect. Returns the most recent event, if
/// any; every error stays scoped to this one symbol.
async fn process_symbol<S: BarSource>(
    source: &S,
    symbol: &str,
    timeframe: Timeframe,
    fetch_timeout: Duration,
) -> Result<Option<ReversalEvent>, ScanError> {
    let bars = match timeframe {
        Timeframe::Intraday15m => timeout(fetch_timeout, source.fetch_intraday(symbol))
            .await
            .map_err(|_| ScanError::Timeout(fetch_timeout))??,
        Timeframe::DailyTwoBar => {
            let daily = timeout(fetch_timeout, source.fetch_daily(symbol))
                .await
                .map_err(|_| ScanError::Timeout(fetch_timeout))??;
            aggregate_two_day(&daily)
        }
    };

    Ok(detect_outside_reversals(&bars).pop())
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::Mutex;

    use super::BarSource;
    use crate::models::bar::Bar;
    use crate::services::yahoo::FetchError;

    /// Canned bar source: fixed sequences per symbol, optional forced
    /// failures, and a call log for exactly-once assertions.
    #[derive(Default)]
    pub struct StaticSource {
        pub bars: HashMap<String, Vec<Bar>>,
        pub failing: Vec<String>,
        pub calls: Mutex<Vec<String>>,
    }

    impl StaticSource {
        fn fetch(&self, symbol: &str) -> Result<Vec<Bar>, FetchError> {
            self.calls
                .lock()
                .expect("call log poisoned")
                .push(symbol.to_string());
            if self.failing.iter().any(|s| s == symbol) {
                return Err(FetchError::Status(reqwest::StatusCode::NOT_FOUND));
            }
            Ok(self.bars.get(symbol).cloned().unwrap_or_default())
        }
    }

    impl BarSource for StaticSource {
        fn fetch_intraday(
            &self,
            symbol: &str,
        ) -> impl Future<Output = Result<Vec<Bar>, FetchError>> + Send {
            let result = self.fetch(symbol);
            async move { result }
        }

        fn fetch_daily(
            &self,
            symbol: &str,
        ) -> impl Future<Output = Result<Vec<Bar>, FetchError>> + Send {
            let result = self.fetch(symbol);
            async move { result }
        }
    }

    pub fn bar(time: i64, open: f64, high: f64, low: f64, close: f64) -> Bar {
        Bar {
            time,
            open,
            high,
            low,
            close,
            volume: 1_000.0,
        }
    }

    /// Two bars forming one bearish outside reversal at `time`.
    pub fn reversal_bars(time: i64) -> Vec<Bar> {
        vec![
            bar(time - 900_000, 10.0, 12.0, 9.0, 11.0),
            bar(time, 11.0, 14.0, 8.0, 9.0),
        ]
    }
}
