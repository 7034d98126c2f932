//! Exponential backoff with jitter for Yakoa reads.

use std::time::Duration;

use rand::Rng;

use crate::config::RetryConfig;

/// Wait before the retry that follows failed attempt `failed` (1-based).
///
/// Doubles from `base_delay_ms` per failure up to `max_delay_ms`, plus up to
/// a tenth of jitter.
pub fn retry_delay(config: &RetryConfig, failed: u32) -> Duration {
    let Some(exponent) = failed.checked_sub(1) else {
        return Duration::ZERO;
    };

    let ceiling = config.max_delay_ms;
    let step = 1u64.checked_shl(exponent).unwrap_or(u64::MAX);
    let delay_ms = config.base_delay_ms.saturating_mul(step).min(ceiling);

    let spread = delay_ms / 10;
    let extra = if spread == 0 {
        0
    } else {
        rand::thread_rng().gen_range(0..spread)
    };
    Duration::from_millis(delay_ms + extra)
}
