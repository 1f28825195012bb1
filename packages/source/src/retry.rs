//! HTTP retry helpers for transient errors.
//!
//! Fetchers call [`send_text`] instead of `reqwest::RequestBuilder::send()`
//! directly, so every request gets the same bounded retry with exponential
//! backoff for transient failures (timeouts, connection resets, server
//! errors, rate limiting).
//!
//! ```ignore
//! let body = retry::send_text(&policy, &url, || client.get(&url).query(&params)).await?;
//! ```

use std::time::Duration;

use crate::FetchError;

/// How many times, and how patiently, a request is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one. `0` disables retrying.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each subsequent retry.
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// A policy that sends each request exactly once.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
        }
    }

    /// Backoff before retry number `attempt` (1-based).
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(1u32 << attempt.saturating_sub(1).min(16))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(500),
        }
    }
}

/// Sends an HTTP request and returns the response body as a `String`.
///
/// The `build_request` closure is called on each attempt to construct a
/// fresh [`reqwest::RequestBuilder`] (builders are consumed by `.send()`).
/// `url` is only used for log lines and error values.
///
/// Retries connection errors, timeouts, HTTP 429 and HTTP 5xx. Never
/// retries other 4xx responses.
///
/// # Errors
///
/// Returns [`FetchError::Unreachable`] if no response arrives (or the body
/// cannot be read) and [`FetchError::Status`] for a non-success status after
/// all retries.
#[allow(clippy::future_not_send)]
pub async fn send_text<F>(
    policy: &RetryPolicy,
    url: &str,
    build_request: F,
) -> Result<String, FetchError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let response = send_inner(policy, url, &build_request).await?;
    response
        .text()
        .await
        .map_err(|source| FetchError::Unreachable {
            url: url.to_string(),
            source,
        })
}

/// Core retry loop. Returns the first response with a success status.
#[allow(clippy::future_not_send)]
async fn send_inner<F>(
    policy: &RetryPolicy,
    url: &str,
    build_request: &F,
) -> Result<reqwest::Response, FetchError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let mut attempt = 0;

    loop {
        if attempt > 0 {
            let delay = policy.delay_for(attempt);
            log::warn!("  retry {attempt}/{} in {delay:?}...", policy.max_retries);
            tokio::time::sleep(delay).await;
        }
        let retries_left = attempt < policy.max_retries;
        attempt += 1;

        match build_request().send().await {
            Err(e) => {
                if is_transient(&e) && retries_left {
                    log::warn!("  transient error: {e}");
                    continue;
                }
                return Err(FetchError::Unreachable {
                    url: url.to_string(),
                    source: e,
                });
            }
            Ok(response) => {
                let status = response.status();

                if status.is_success() {
                    return Ok(response);
                }

                // 429 and 5xx are worth another try; everything else is permanent.
                let retryable =
                    status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
                if retryable && retries_left {
                    log::warn!("  HTTP {status} from {url}");
                    continue;
                }

                return Err(FetchError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                });
            }
        }
    }
}

/// Returns `true` if the error is likely transient and worth retrying.
fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect() || e.is_request()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles() {
        let policy = RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        };
        assert_eq!(policy.delay_for(1), Duration::from_millis(500));
        assert_eq!(policy.delay_for(2), Duration::from_secs(1));
        assert_eq!(policy.delay_for(3), Duration::from_secs(2));
    }

    #[test]
    fn none_policy_never_waits() {
        let policy = RetryPolicy::none();
        assert_eq!(policy.max_retries, 0);
        assert_eq!(policy.delay_for(1), Duration::ZERO);
    }
}
