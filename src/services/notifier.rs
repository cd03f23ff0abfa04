use serde_json::json;

use crate::models::reversal::ReversalHit;

/// Fire-and-forget webhook alerts. Without a configured URL every call is a
/// no-op; delivery failures are logged and dropped, never retried within a
/// scan and never surfaced to the caller.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: Option<String>,
}

impl WebhookNotifier {
    pub fn new(url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }

    pub async fn notify(&self, hit: &ReversalHit) {
        let Some(url) = &self.url else {
            return;
        };

        let text = alert_text(hit);
        let body = json!({ "text": text });

        match self.client.post(url).json(&body).send().await {
            Ok(response) if !response.status().is_success() => {
                tracing::warn!(
                    "webhook for {} returned status {}",
                    hit.symbol,
                    response.status()
                );
            }
            Ok(_) => {}
            Err(error) => {
                tracing::warn!("webhook for {} failed: {}", hit.symbol, error);
            }
        }
    }
}

fn alert_text(hit: &ReversalHit) -> String {
    format!(
        "Outside reversal ({}) detected for {} on {} at {}",
        hit.direction.label(),
        hit.symbol,
        hit.timeframe,
        hit.time
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::reversal::{Direction, Ohlc};

    #[test]
    fn alert_text_is_one_line_and_human_readable() {
        let hit = ReversalHit {
            symbol: "AAPL".to_string(),
            timeframe: "15m".to_string(),
            direction: Direction::Bearish,
            time: "2024-01-02T15:30:00.000Z".to_string(),
            ohlc: Ohlc {
                o: 1.0,
                h: 2.0,
                l: 0.5,
                c: 0.8,
            },
            fresh: true,
        };
        assert_eq!(
            alert_text(&hit),
            "Outside reversal (bearish) detected for AAPL on 15m at 2024-01-02T15:30:00.000Z"
        );
    }
}
