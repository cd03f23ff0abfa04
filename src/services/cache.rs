use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::models::reversal::ReversalHit;
use crate::services::scan::Timeframe;

#[derive(Debug, Clone)]
struct CacheEntry {
    timeframe: Timeframe,
    hits: Vec<ReversalHit>,
    captured_at: Instant,
}

/// Single-slot result cache bounding upstream call volume under frequent
/// polling. The slot is replaced wholesale on every completed scan and is
/// tagged with the timeframe it holds; a request for the other timeframe is
/// a miss. No single-flight guard: concurrent misses may each trigger a
/// scan, which is accepted behavior.
#[derive(Debug)]
pub struct ScanCache {
    ttl: Duration,
    slot: RwLock<Option<CacheEntry>>,
}

impl ScanCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(None),
        }
    }

    /// Cached hits for this timeframe, if captured within the TTL.
    pub async fn get(&self, timeframe: Timeframe) -> Option<Vec<ReversalHit>> {
        let slot = self.slot.read().await;
        slot.as_ref()
            .filter(|entry| entry.timeframe == timeframe)
            .filter(|entry| entry.captured_at.elapsed() < self.ttl)
            .map(|entry| entry.hits.clone())
    }

    pub async fn put(&self, timeframe: Timeframe, hits: Vec<ReversalHit>) {
        let mut slot = self.slot.write().await;
        *slot = Some(CacheEntry {
            timeframe,
            hits,
            captured_at: Instant::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::reversal::{Direction, Ohlc};

    fn hit(symbol: &str) -> ReversalHit {
        ReversalHit {
            symbol: symbol.to_string(),
            timeframe: "15m".to_string(),
            direction: Direction::Bullish,
            time: "1970-01-01T00:00:00.000Z".to_string(),
            ohlc: Ohlc {
                o: 1.0,
                h: 2.0,
                l: 0.5,
                c: 1.5,
            },
            fresh: true,
        }
    }

    #[tokio::test]
    async fn serves_identical_hits_within_ttl() {
        let cache = ScanCache::new(Duration::from_secs(60));
        assert!(cache.get(Timeframe::Intraday15m).await.is_none());

        cache.put(Timeframe::Intraday15m, vec![hit("AAPL")]).await;
        let first = cache.get(Timeframe::Intraday15m).await.unwrap();
        let second = cache.get(Timeframe::Intraday15m).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first[0].symbol, "AAPL");
    }

    #[tokio::test]
    async fn expired_slot_misses() {
        let cache = ScanCache::new(Duration::ZERO);
        cache.put(Timeframe::Intraday15m, vec![hit("AAPL")]).await;
        assert!(cache.get(Timeframe::Intraday15m).await.is_none());
    }

    #[tokio::test]
    async fn other_timeframe_misses() {
        let cache = ScanCache::new(Duration::from_secs(60));
        cache.put(Timeframe::Intraday15m, vec![hit("AAPL")]).await;
        assert!(cache.get(Timeframe::DailyTwoBar).await.is_none());
    }
}
