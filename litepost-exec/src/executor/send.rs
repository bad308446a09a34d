use std::time::{Duration, Instant, SystemTime};

use crate::executor::http::{HttpClient, HttpError, HttpRequestParts, HttpResponseParts};
use crate::executor::types::HttpConfig;
use crate::retry::{decide_retry, RetryConfig, RetryDecision, RetryReason};

pub(crate) struct Sent {
    pub response: HttpResponseParts,
    pub attempts: usize,
    /// Time spent on the attempt that produced `response`.
    pub elapsed: Duration,
    /// Wall time across every attempt, backoff included.
    pub total: Duration,
}

pub(crate) struct SendFailure {
    pub attempts: usize,
    pub error: HttpError,
}

/// Send `parts`, retrying retryable statuses and transient transport errors.
/// Running out of attempts on a status still yields that last response.
/// Statuses are not retried for non-idempotent methods unless configured.
pub(crate) async fn send_with_retry(
    http: &dyn HttpClient,
    parts: &HttpRequestParts,
    http_cfg: &HttpConfig,
    retry: &RetryConfig,
) -> Result<Sent, SendFailure> {
    let status_retries = retry.retries_status_for(&parts.method);
    let first_started = Instant::now();
    let mut attempt = 0usize;
    loop {
        attempt += 1;
        let started = Instant::now();
        let result = http
            .send(parts.clone(), http_cfg.timeout, http_cfg.max_response_bytes)
            .await;
        let elapsed = started.elapsed();

        let decision = match &result {
            Ok(_) if !status_retries => RetryDecision::Stop {
                reason: RetryReason::NotRetryable,
            },
            Ok(resp) => decide_retry(
                retry,
                attempt,
                Some(resp.status),
                Some(&resp.headers),
                false,
                SystemTime::now(),
                || fastrand::u64(..),
            ),
            Err(e) => decide_retry(
                retry,
                attempt,
                None,
                None,
                e.is_transient(),
                SystemTime::now(),
                || fastrand::u64(..),
            ),
        };

        match (decision, result) {
            (RetryDecision::RetryAfter { delay, reason }, _) => {
                tracing::debug!(attempt, ?reason, delay_ms = delay.as_millis() as u64, "retrying request");
                tokio::time::sleep(delay).await;
            }
            (RetryDecision::Stop { .. }, Ok(response)) => {
                return Ok(Sent {
                    response,
                    attempts: attempt,
                    elapsed,
                    total: first_started.elapsed(),
                })
            }
            (RetryDecision::Stop { .. }, Err(error)) => {
                return Err(SendFailure {
                    attempts: attempt,
                    error,
                })
            }
        }
    }
}
