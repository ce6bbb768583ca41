//! Czech National Bank daily fixing provider.

use crate::core::cache::FeedCache;
use crate::core::feed::{DailyRateData, RateFeedProvider, parse_daily_feed};
use crate::providers::util::{seconds_until, with_retry};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://www.cnb.cz";

/// Path of the daily fixing text file on the CNB site.
pub const DAILY_FIXING_PATH: &str = "/en/financial-markets/foreign-exchange-market/central-bank-exchange-rate-fixing/central-bank-exchange-rate-fixing/daily.txt";

// The fixing is declared at 14:30 Prague time; 13:30 UTC is close enough for
// cache expiry in both CET and CEST.
const FIXING_REFRESH_HOUR_UTC: u32 = 13;
const FIXING_REFRESH_MINUTE: u32 = 30;

pub struct CnbProvider {
    base_url: String,
    cache: Arc<FeedCache>,
}

impl CnbProvider {
    pub fn new(base_url: &str, cache: Arc<FeedCache>) -> Self {
        CnbProvider {
            base_url: base_url.to_string(),
            cache,
        }
    }
}

#[async_trait]
impl RateFeedProvider for CnbProvider {
    async fn fetch_daily(&self) -> Result<DailyRateData> {
        if let Some(cached) = self.cache.get().await {
            return Ok(cached);
        }

        let url = format!("{}{}", self.base_url, DAILY_FIXING_PATH);
        debug!("Requesting the daily fixing from {}", url);

        let client = reqwest::Client::builder().user_agent("kurzy/1.0").build()?;
        let response = with_retry(|| async { client.get(&url).send().await }, 3, 500)
            .await
            .context("Failed to fetch the daily fixing")?;

        let response_text = response
            .text()
            .await
            .context("Failed to read the daily fixing body")?;

        if response_text.trim().is_empty() {
            return Err(anyhow!("Received an empty daily fixing feed"));
        }

        let data = parse_daily_feed(&response_text).with_context(|| {
            format!(
                "Failed to parse the daily fixing feed. Response: '{}'",
                response_text.lines().next().unwrap_or_default()
            )
        })?;

        debug!(
            "Fetched fixing for {} with {} currencies",
            data.date,
            data.rates.len()
        );

        // Keep the snapshot until the next fixing is declared
        let ttl_seconds = match seconds_until(FIXING_REFRESH_HOUR_UTC, FIXING_REFRESH_MINUTE) {
            Ok(ttl) => ttl,
            Err(e) => {
                warn!(
                    "Failed calculating the fixing refresh TTL: {}. Using fallback 1 day",
                    e
                );
                24 * 60 * 60
            }
        };
        self.cache
            .put(data.clone(), Duration::from_secs(ttl_seconds))
            .await;

        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SAMPLE_FEED: &str = "13 Oct 2025 #199\n\
        Country|Currency|Amount|Code|Rate\n\
        Australia|dollar|1|AUD|13.707\n\
        EMU|euro|1|EUR|24.320\n";

    async fn create_cnb_mock_server(mock_response: &str, status_code: u16) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(DAILY_FIXING_PATH))
            .respond_with(ResponseTemplate::new(status_code).set_body_string(mock_response))
            .mount(&mock_server)
            .await;
        mock_server
    }

    #[tokio::test]
    async fn test_successful_fixing_fetch() {
        let mock_server = create_cnb_mock_server(SAMPLE_FEED, 200).await;
        let provider = CnbProvider::new(&mock_server.uri(), Arc::new(FeedCache::new()));

        let data = provider.fetch_daily().await.unwrap();

        assert_eq!(data.date.to_string(), "2025-10-13");
        assert_eq!(data.rates.len(), 2);
        assert_eq!(data.rates[1].code, "EUR");
        assert_eq!(data.rates[1].rate, 24.320);
    }

    #[tokio::test]
    async fn test_second_fetch_is_served_from_cache() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(DAILY_FIXING_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE_FEED))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = CnbProvider::new(&mock_server.uri(), Arc::new(FeedCache::new()));
        let first = provider.fetch_daily().await.unwrap();
        let second = provider.fetch_daily().await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_malformed_feed_is_an_error() {
        let mock_server = create_cnb_mock_server("unexpected payload..", 200).await;
        let provider = CnbProvider::new(&mock_server.uri(), Arc::new(FeedCache::new()));

        let result = provider.fetch_daily().await;

        assert!(result.is_err());
        let message = result.unwrap_err().to_string();
        assert!(
            message.contains("Failed to parse the daily fixing feed"),
            "{message}"
        );
    }

    #[tokio::test]
    async fn test_empty_feed_is_an_error() {
        let mock_server = create_cnb_mock_server("", 200).await;
        let provider = CnbProvider::new(&mock_server.uri(), Arc::new(FeedCache::new()));

        let result = provider.fetch_daily().await;

        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "Received an empty daily fixing feed"
        );
    }
}
