//! Utility modules supporting search and fetch operations.
//!
//! - [`HttpClient`]: reqwest wrapper with the crate user agent and timeouts
//! - [`with_retry`]: bounded exponential backoff for transient failures
//! - [`Retryable`]: classification hook errors implement to opt into retry

mod http;
mod retry;

pub use http::HttpClient;
pub use retry::{api_retry_config, with_retry, Retryable, RetryConfig, TransientError};
