use std::collections::BTreeSet;
use std::time::Duration;

/// Retry policy for the network stage.
///
/// `max_attempts` counts the initial call, so the default of 4 means up to
/// three retries. Retryable statuses are only retried for idempotent methods
/// unless `retry_non_idempotent` is set; transport failures are retried for
/// every method.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub retry_statuses: BTreeSet<u16>,
    pub base_delay: Duration,
    pub factor: f64,
    pub max_delay: Duration,
    pub max_attempts: usize,
    pub retry_non_idempotent: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            retry_statuses: [429u16, 502, 503, 504].into_iter().collect(),
            base_delay: Duration::from_secs(1),
            factor: 2.0,
            max_delay: Duration::from_secs(30),
            max_attempts: 4,
            retry_non_idempotent: false,
        }
    }
}

impl RetryConfig {
    /// A single attempt, never retried.
    pub fn disabled() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// `retries` extra attempts after the first one.
    pub fn with_retries(mut self, retries: usize) -> Self {
        self.max_attempts = retries.saturating_add(1);
        self
    }

    /// Whether a retryable status may be retried for `method`.
    pub fn retries_status_for(&self, method: &str) -> bool {
        self.retry_non_idempotent || is_idempotent(method)
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn with_non_idempotent_retries(mut self, enabled: bool) -> Self {
        self.retry_non_idempotent = enabled;
        self
    }
}

/// RFC 9110 idempotent methods.
pub fn is_idempotent(method: &str) -> bool {
    matches!(
        method.to_ascii_uppercase().as_str(),
        "GET" | "HEAD" | "OPTIONS" | "TRACE" | "PUT" | "DELETE"
    )
}
