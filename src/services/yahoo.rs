use reqwest::header::USER_AGENT;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::models::bar::Bar;
use crate::services::scan::BarSource;

const YAHOO_CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const BROWSER_USER_AGENT: &str = "Mozilla/5.0";

/// Slight future padding on period2, matching upstream behavior for the
/// still-forming bar.
const FUTURE_PAD_SECS: i64 = 5 * 60;
const INTRADAY_LOOKBACK_SECS: i64 = 2 * 24 * 60 * 60;
const DAILY_LOOKBACK_DAYS: i64 = 120;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("upstream request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("upstream returned status {0}")]
    Status(StatusCode),
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartNode,
}

#[derive(Debug, Deserialize)]
struct ChartNode {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    #[serde(default)]
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteBlock>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteBlock {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Clone)]
pub struct YahooClient {
    client: reqwest::Client,
}

impl Default for YahooClient {
    fn default() -> Self {
        Self::new()
    }
}

impl YahooClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Fetch 15m bars covering roughly the last two days.
    pub async fn fetch_intraday_15m(&self, symbol: &str) -> Result<Vec<Bar>, FetchError> {
        let now = chrono::Utc::now().timestamp();
        self.fetch_chart(symbol, "15m", now - INTRADAY_LOOKBACK_SECS, now + FUTURE_PAD_SECS)
            .await
    }

    /// Fetch daily bars covering roughly the last 120 calendar days.
    pub async fn fetch_daily(&self, symbol: &str) -> Result<Vec<Bar>, FetchError> {
        let now = chrono::Utc::now().timestamp();
        let period1 = now - DAILY_LOOKBACK_DAYS * 24 * 60 * 60;
        self.fetch_chart(symbol, "1d", period1, now + FUTURE_PAD_SECS).await
    }

    async fn fetch_chart(
        &self,
        symbol: &str,
        interval: &str,
        period1: i64,
        period2: i64,
    ) -> Result<Vec<Bar>, FetchError> {
        let url = format!(
            "{YAHOO_CHART_URL}/{symbol}?interval={interval}&period1={period1}&period2={period2}"
        );

        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let payload = response.json::<ChartResponse>().await?;
        Ok(bars_from_chart(payload))
    }
}

impl BarSource for YahooClient {
    fn fetch_intraday(
        &self,
        symbol: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Bar>, FetchError>> + Send {
        self.fetch_intraday_15m(symbol)
    }

    fn fetch_daily(
        &self,
        symbol: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Bar>, FetchError>> + Send {
        YahooClient::fetch_daily(self, symbol)
    }
}

/// Flatten the chart payload into bars. Missing result or timestamp arrays
/// decode to an empty sequence, missing fields to 0, and rows with non-finite
/// prices are dropped before they can reach the detector.
fn bars_from_chart(payload: ChartResponse) -> Vec<Bar> {
    let Some(result) = payload.chart.result.and_then(|mut r| {
        if r.is_empty() {
            None
        } else {
            Some(r.remove(0))
        }
    }) else {
        return Vec::new();
    };

    let Some(timestamps) = result.timestamp else {
        return Vec::new();
    };
    let Some(quote) = result.indicators.quote.first() else {
        return Vec::new();
    };

    timestamps
        .iter()
        .enumerate()
        .map(|(i, &t)| Bar {
            time: t * 1_000,
            open: field(&quote.open, i),
            high: field(&quote.high, i),
            low: field(&quote.low, i),
            close: field(&quote.close, i),
            volume: field(&quote.volume, i),
        })
        .filter(Bar::is_finite)
        .collect()
}

fn field(values: &[Option<f64>], i: usize) -> f64 {
    values.get(i).copied().flatten().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> Vec<Bar> {
        bars_from_chart(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn decodes_chart_payload_into_bars() {
        let bars = decode(
            r#"{
                "chart": {
                    "result": [{
                        "timestamp": [100, 200],
                        "indicators": {
                            "quote": [{
                                "open": [10.0, 11.0],
                                "high": [12.0, 14.0],
                                "low": [9.0, 8.0],
                                "close": [11.0, 9.0],
                                "volume": [1000.0, null]
                            }]
                        }
                    }]
                }
            }"#,
        );

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].time, 100_000);
        assert_eq!(bars[0].open, 10.0);
        assert_eq!(bars[1].high, 14.0);
        // null volume ingests as zero
        assert_eq!(bars[1].volume, 0.0);
    }

    #[test]
    fn drops_rows_with_null_prices() {
        let bars = decode(
            r#"{
                "chart": {
                    "result": [{
                        "timestamp": [100, 200, 300],
                        "indicators": {
                            "quote": [{
                                "open": [10.0, null, 12.0],
                                "high": [12.0, 13.0, 14.0],
                                "low": [9.0, 8.0, 7.0],
                                "close": [11.0, 9.0, 13.0],
                                "volume": [1.0, 1.0, 1.0]
                            }]
                        }
                    }]
                }
            }"#,
        );

        // the middle row has a null open, which ingests as 0.0 and stays
        // finite; only non-finite prices are dropped
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[1].open, 0.0);
    }

    #[test]
    fn missing_result_decodes_to_empty() {
        assert!(decode(r#"{"chart": {"result": null}}"#).is_empty());
        assert!(decode(r#"{"chart": {"result": []}}"#).is_empty());
        assert!(decode(r#"{"chart": {"result": [{"timestamp": null, "indicators": {"quote": []}}]}}"#).is_empty());
    }
}
