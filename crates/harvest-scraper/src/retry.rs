//! Per-item retry policy for detail-page extraction.
//!
//! Only navigation failures (including navigation timeouts) are retried. A
//! page that loaded but could not be read will fail the same way again.
//! The default policy performs no retries.

use std::time::Duration;

use crate::error::ScraperError;

const MAX_DELAY_MS: u64 = 60_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetryPolicy {
    /// Additional attempts after the first failure.
    pub max_retries: u32,
    /// Base delay for exponential backoff: `backoff_base_ms * 2^attempt`.
    pub backoff_base_ms: u64,
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_retries: u32, backoff_base_ms: u64) -> Self {
        Self {
            max_retries,
            backoff_base_ms,
        }
    }

    /// Sleep before retry number `attempt + 1`, capped at 60 s with ±25 % jitter.
    ///
    /// | Attempt | Sleep before next attempt |
    /// |---------|---------------------------|
    /// | 0       | base × 2⁰ ± 25 %         |
    /// | 1       | base × 2¹ ± 25 %         |
    /// | 2       | base × 2² ± 25 %         |
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let computed = self
            .backoff_base_ms
            .saturating_mul(1u64 << attempt.min(10));
        let capped = computed.min(MAX_DELAY_MS);
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
        Duration::from_millis(delay_ms)
    }
}

/// Returns `true` for errors worth another attempt after a backoff delay.
///
/// **Retriable:** [`ScraperError::DetailNavigationFailed`], which covers both
/// driver navigation errors and navigation timeouts.
///
/// **Not retriable:** everything else, notably
/// [`ScraperError::DetailExtractionFailed`] where the page did load.
pub(crate) fn is_retriable(err: &ScraperError) -> bool {
    matches!(err, ScraperError::DetailNavigationFailed { .. })
}
