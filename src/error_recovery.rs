// src/error_recovery.rs
//! Retry with exponential backoff for transient API failures.

use crate::error::AppError;
use std::time::Duration;

/// Retries an async operation with exponential backoff.
///
/// Only errors for which [`AppError::is_retryable`] holds are retried;
/// anything else is returned after the first attempt.
pub async fn retry_with_backoff<F, T, Fut>(
    mut operation: F,
    max_attempts: u32,
    initial_delay: Duration,
    max_delay: Duration,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, AppError>>,
{
    let mut delay = initial_delay;
    let mut last_error = None;

    for attempt in 1..=max_attempts {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if !e.is_retryable() => return Err(e),
            Err(e) => {
                if attempt < max_attempts {
                    log::warn!(
                        "Attempt {} failed ({}), retrying after {:?}",
                        attempt,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;

                    // Exponential backoff with cap
                    delay = std::cmp::min(delay * 2, max_delay);
                }
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| AppError::InternalError {
        message: "Retry failed with no error".to_string(),
        source: None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfluenceErrorCode;
    use std::cell::Cell;

    fn service_error(status: u16) -> AppError {
        AppError::ConfluenceService {
            code: ConfluenceErrorCode::from_http_status(status),
            message: format!("HTTP {}", status),
            status: reqwest::StatusCode::from_u16(status).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_retries_rate_limited_until_success() {
        let calls = Cell::new(0u32);
        let result = retry_with_backoff(
            || {
                calls.set(calls.get() + 1);
                let attempt = calls.get();
                async move {
                    if attempt < 3 {
                        Err(service_error(429))
                    } else {
                        Ok(attempt)
                    }
                }
            },
            3,
            Duration::from_millis(1),
            Duration::from_millis(2),
        )
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_permanent_errors_are_not_retried() {
        let calls = Cell::new(0u32);
        let result: Result<(), AppError> = retry_with_backoff(
            || {
                calls.set(calls.get() + 1);
                async { Err(service_error(404)) }
            },
            3,
            Duration::from_millis(1),
            Duration::from_millis(2),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let calls = Cell::new(0u32);
        let result: Result<(), AppError> = retry_with_backoff(
            || {
                calls.set(calls.get() + 1);
                async { Err(service_error(503)) }
            },
            2,
            Duration::from_millis(1),
            Duration::from_millis(2),
        )
        .await;

        match result {
            Err(AppError::ConfluenceService { code, .. }) => {
                assert_eq!(code, ConfluenceErrorCode::ServerError(503))
            }
            other => panic!("expected the last service error, got {:?}", other),
        }
        assert_eq!(calls.get(), 2);
    }
}
