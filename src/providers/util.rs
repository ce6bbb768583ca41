use anyhow::{Error, Result, anyhow};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Retries an async operation with configurable attempts and delays
///
/// # Parameters
/// - `operation`: Closure returning a future
/// - `retries`: Number of retry attempts (total runs = 1 initial + retries)
/// - `delay_ms`: Milliseconds between retry attempts
///
/// # Returns
/// Either the successful result or the error after all attempts
pub async fn with_retry<F, Fut, T>(
    mut operation: F,
    retries: usize,
    delay_ms: u64,
) -> Result<T, Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, reqwest::Error>>,
{
    let mut attempt = 1;
    loop {
        match operation().await.map_err(anyhow::Error::from) {
            Ok(val) => return Ok(val),
            Err(err) => {
                if attempt > retries {
                    return Err(err);
                }
                debug!(
                    "Attempt {}/{} failed: {}. Retrying...",
                    attempt, retries, err
                );
                attempt += 1;
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

/// Seconds from now until the next occurrence of `hour:minute` UTC. Used to
/// align cache expiry with the daily fixing publication.
pub fn seconds_until(hour: u32, minute: u32) -> Result<u64> {
    let now = chrono::Utc::now();
    let today = now
        .date_naive()
        .and_hms_opt(hour, minute, 0)
        .ok_or_else(|| anyhow!("Invalid refresh time {hour}:{minute}"))?
        .and_utc();

    let target = if today > now {
        today
    } else {
        today + chrono::Duration::days(1)
    };

    // Clamp to at least a minute so a fetch right at the boundary still caches
    Ok((target - now).num_seconds().max(60) as u64)
}
