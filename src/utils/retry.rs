//! Retry utilities with exponential backoff for resilient API calls.

use std::time::Duration;
use tokio::time::sleep;

/// Configuration for retry behavior
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    /// Maximum number of attempts, first try included
    pub max_attempts: u32,
    /// Initial delay between retries
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Maximum total time to spend sleeping between retries
    pub max_total_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
            max_total_delay: Duration::from_secs(30),
        }
    }
}

/// Transient errors that should trigger a retry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransientError {
    /// Network connectivity issues or request timeout
    Network,
    /// Server error (5xx)
    ServerError,
    /// Too many requests (429)
    TooManyRequests,
}

/// Classification hook deciding which failures are worth retrying
pub trait Retryable {
    /// Returns the transient class of this error, or `None` if permanent
    fn transient(&self) -> Option<TransientError>;
}

/// Execute an async operation, retrying transient failures with backoff
///
/// Permanent errors return immediately; transient ones retry until the
/// attempt or delay budget runs out, at which point the last error is
/// returned.
pub async fn with_retry<T, E, F, Fut>(config: RetryConfig, mut operation: F) -> Result<T, E>
where
    E: Retryable + std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
{
    let mut attempts = 0;
    let mut total_delay = Duration::ZERO;

    loop {
        attempts += 1;

        match operation().await {
            Ok(value) => {
                if attempts > 1 {
                    tracing::info!("operation succeeded on attempt {}", attempts);
                }
                return Ok(value);
            }
            Err(error) => {
                let Some(transient) = error.transient() else {
                    return Err(error);
                };

                let delay = if attempts == 1 {
                    config.initial_delay
                } else {
                    let exp_delay = config.initial_delay.as_secs_f64()
                        * config.backoff_multiplier.powf(attempts as f64 - 1.0);
                    Duration::from_secs_f64(exp_delay.min(config.max_delay.as_secs_f64()))
                };
                total_delay += delay;

                if attempts >= config.max_attempts || total_delay >= config.max_total_delay {
                    tracing::warn!("giving up after {} attempts: {}", attempts, error);
                    return Err(error);
                }

                tracing::debug!(
                    "transient error on attempt {}: {:?}, retrying in {:?}",
                    attempts,
                    transient,
                    delay
                );
                sleep(delay).await;
            }
        }
    }
}

/// Retry configuration for the wiki API and article fetches
pub fn api_retry_config() -> RetryConfig {
    RetryConfig {
        max_attempts: 3,
        initial_delay: Duration::from_secs(1),
        max_delay: Duration::from_secs(10),
        backoff_multiplier: 2.0,
        max_total_delay: Duration::from_secs(30),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug)]
    enum TestError {
        Transient,
        Permanent,
    }

    impl std::fmt::Display for TestError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{:?}", self)
        }
    }

    impl Retryable for TestError {
        fn transient(&self) -> Option<TransientError> {
            match self {
                TestError::Transient => Some(TransientError::Network),
                TestError::Permanent => None,
            }
        }
    }

    fn fast_config(max_attempts: u32) -> RetryConfig {
        RetryConfig {
            max_attempts,
            initial_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(50),
            backoff_multiplier: 2.0,
            max_total_delay: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn test_retry_success_first_try() {
        let call_count = Rc::new(RefCell::new(0));

        let result: Result<&str, TestError> = {
            let call_count = call_count.clone();
            with_retry(fast_config(3), move || {
                let call_count = call_count.clone();
                async move {
                    *call_count.borrow_mut() += 1;
                    Ok("success")
                }
            })
        }
        .await;

        assert_eq!(result.unwrap(), "success");
        assert_eq!(*call_count.borrow(), 1);
    }

    #[tokio::test]
    async fn test_retry_success_after_transient_failures() {
        let call_count = Rc::new(RefCell::new(0));

        let result = {
            let call_count = call_count.clone();
            with_retry(fast_config(4), move || {
                let call_count = call_count.clone();
                async move {
                    *call_count.borrow_mut() += 1;
                    if *call_count.borrow() < 3 {
                        Err(TestError::Transient)
                    } else {
                        Ok("success")
                    }
                }
            })
        }
        .await;

        assert_eq!(result.unwrap(), "success");
        assert_eq!(*call_count.borrow(), 3);
    }

    #[tokio::test]
    async fn test_retry_returns_permanent_error_immediately() {
        let call_count = Rc::new(RefCell::new(0));

        let result: Result<&str, TestError> = {
            let call_count = call_count.clone();
            with_retry(fast_config(5), move || {
                let call_count = call_count.clone();
                async move {
                    *call_count.borrow_mut() += 1;
                    Err(TestError::Permanent)
                }
            })
        }
        .await;

        assert!(matches!(result, Err(TestError::Permanent)));
        assert_eq!(*call_count.borrow(), 1);
    }

    #[tokio::test]
    async fn test_retry_exhausts_attempts() {
        let call_count = Rc::new(RefCell::new(0));

        let result: Result<&str, TestError> = {
            let call_count = call_count.clone();
            with_retry(fast_config(3), move || {
                let call_count = call_count.clone();
                async move {
                    *call_count.borrow_mut() += 1;
                    Err(TestError::Transient)
                }
            })
        }
        .await;

        assert!(matches!(result, Err(TestError::Transient)));
        assert_eq!(*call_count.borrow(), 3);
    }
}
