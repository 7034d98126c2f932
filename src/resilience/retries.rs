//! Retry logic for idempotent outbound calls.
//!
//! Only Yakoa reads go through here. Contract writes and Yakoa registrations
//! are never retried: a duplicate submission is worse than a reported failure.

use std::future::Future;

use reqwest::StatusCode;

use crate::config::RetryConfig;
use crate::resilience::backoff::retry_delay;

/// Whether an upstream outcome is worth another attempt.
///
/// Connection errors and 502/503/504 are retryable, 429 too. Everything else
/// is a real answer.
pub fn is_retryable(status: Option<StatusCode>, network_error: bool) -> bool {
    if network_error {
        return true;
    }
    matches!(
        status,
        Some(StatusCode::TOO_MANY_REQUESTS)
            | Some(StatusCode::BAD_GATEWAY)
            | Some(StatusCode::SERVICE_UNAVAILABLE)
            | Some(StatusCode::GATEWAY_TIMEOUT)
    )
}

/// Run `op` until it succeeds, fails permanently, or attempts run out.
///
/// `should_retry` classifies an error.
pub async fn with_retries<T, E, F, Fut, R>(
    config: &RetryConfig,
    operation: &'static str,
    mut op: F,
    should_retry: R,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    R: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let max_attempts = if config.enabled { config.max_attempts.max(1) } else { 1 };
    let mut attempt = 0;

    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_attempts && should_retry(&e) => {
                let delay = retry_delay(config, attempt);
                tracing::info!(operation, attempt, delay = ?delay, error = %e, "Retrying request");
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_config(max_attempts: u32) -> RetryConfig {
        RetryConfig {
            enabled: true,
            max_attempts,
            base_delay_ms: 1,
            max_delay_ms: 5,
        }
    }

    #[test]
    fn test_retryable_classification() {
        assert!(is_retryable(None, true));
        assert!(is_retryable(Some(StatusCode::SERVICE_UNAVAILABLE), false));
        assert!(is_retryable(Some(StatusCode::TOO_MANY_REQUESTS), false));
        assert!(!is_retryable(Some(StatusCode::NOT_FOUND), false));
        assert!(!is_retryable(Some(StatusCode::INTERNAL_SERVER_ERROR), false));
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, String> = with_retries(
            &fast_config(3),
            "test",
            || async {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < 2 { Err("flaky".to_string()) } else { Ok(n) }
            },
            |_| true,
        )
        .await;

        assert_eq!(result, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_error_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), String> = with_retries(
            &fast_config(5),
            "test",
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("not found".to_string())
            },
            |_| false,
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_disabled_means_single_attempt() {
        let calls = AtomicU32::new(0);
        let mut config = fast_config(5);
        config.enabled = false;

        let _: Result<(), String> = with_retries(
            &config,
            "test",
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("down".to_string())
            },
            |_| true,
        )
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
