//! Bounded readiness polling.
//!
//! DOM-mutating actions (scroll, click, navigation) render asynchronously.
//! Instead of sleeping a fixed duration, callers poll an observable condition
//! until it holds or the [`SettlePolicy`] timeout elapses.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::driver::PageDriver;
use crate::error::DriverError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlePolicy {
    pub timeout: Duration,
    pub interval: Duration,
}

impl SettlePolicy {
    #[must_use]
    pub fn from_millis(timeout_ms: u64, interval_ms: u64) -> Self {
        Self {
            timeout: Duration::from_millis(timeout_ms),
            interval: Duration::from_millis(interval_ms.max(1)),
        }
    }
}

/// Polls `query_all(selector)` until more than `baseline` elements match.
///
/// Returns `Some(count)` once the condition holds, or `None` if the timeout
/// elapsed first. The condition is always checked at least once.
///
/// # Errors
///
/// Propagates any [`DriverError`] from the underlying query.
pub async fn wait_for_count_above<D>(
    driver: &mut D,
    selector: &str,
    baseline: usize,
    policy: SettlePolicy,
) -> Result<Option<usize>, DriverError>
where
    D: PageDriver,
{
    let deadline = Instant::now() + policy.timeout;
    loop {
        let count = driver.query_all(selector).await?.len();
        if count > baseline {
            return Ok(Some(count));
        }
        if Instant::now() >= deadline {
            tracing::debug!(
                selector,
                baseline,
                timeout_ms = duration_ms(policy.timeout),
                "settle poll timed out"
            );
            return Ok(None);
        }
        tokio::time::sleep(policy.interval).await;
    }
}

/// Runs `operation` with an upper bound on wall-clock time.
///
/// # Errors
///
/// Returns [`DriverError::Timeout`] naming `what` if `limit` elapses first,
/// otherwise whatever `operation` returned.
pub async fn with_timeout<T, Fut>(
    what: &str,
    limit: Duration,
    operation: Fut,
) -> Result<T, DriverError>
where
    Fut: Future<Output = Result<T, DriverError>>,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result,
        Err(_) => Err(DriverError::Timeout {
            what: what.to_owned(),
            after_ms: duration_ms(limit),
        }),
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
