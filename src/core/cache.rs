//! In-memory cache for the parsed daily fixing.

use crate::core::feed::DailyRateData;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

struct CacheEntry {
    data: DailyRateData,
    expires_at: Instant,
}

/// Single-slot cache: there is only ever one current fixing, so a keyed map
/// would be overkill. The entry expires when the next fixing is due.
pub struct FeedCache {
    inner: Mutex<Option<CacheEntry>>,
}

impl FeedCache {
    pub fn new() -> Self {
        FeedCache {
            inner: Mutex::new(None),
        }
    }

    pub async fn get(&self) -> Option<DailyRateData> {
        let slot = self.inner.lock().await;
        match slot.as_ref() {
            Some(entry) if entry.expires_at > Instant::now() => {
                debug!("Feed cache HIT for fixing {}", entry.data.date);
                Some(entry.data.clone())
            }
            Some(entry) => {
                debug!("Feed cache entry for {} expired", entry.data.date);
                None
            }
            None => {
                debug!("Feed cache MISS");
                None
            }
        }
    }

    pub async fn put(&self, data: DailyRateData, ttl: Duration) {
        let mut slot = self.inner.lock().await;
        debug!("Feed cache PUT for fixing {}", data.date);
        *slot = Some(CacheEntry {
            data,
            expires_at: Instant::now() + ttl,
        });
    }
}

impl Default for FeedCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::feed::parse_daily_feed;

    fn fixture() -> DailyRateData {
        parse_daily_feed("13 Oct 2025 #199\nCountry|Currency|Amount|Code|Rate").unwrap()
    }

    #[tokio::test]
    async fn test_cache_get_put() {
        let cache = FeedCache::new();
        assert!(cache.get().await.is_none());

        cache.put(fixture(), Duration::from_secs(60)).await;
        assert_eq!(cache.get().await, Some(fixture()));
    }

    #[tokio::test]
    async fn test_cache_entry_expires() {
        let cache = FeedCache::new();
        cache.put(fixture(), Duration::from_millis(10)).await;

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(cache.get().await.is_none());
    }
}
