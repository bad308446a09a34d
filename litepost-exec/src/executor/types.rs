use std::time::Duration;

use crate::retry::RetryConfig;
use crate::scripting::ScriptConfig;

#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    pub http: HttpConfig,
    pub retry: RetryConfig,
    pub scripts: ScriptConfig,
    /// Upper bound on `execute_request` calls in flight at once.
    pub max_concurrent_executions: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            retry: RetryConfig::default(),
            scripts: ScriptConfig::default(),
            max_concurrent_executions: 32,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout: Duration,
    pub max_response_bytes: usize,
    pub follow_redirects: bool,
    pub max_redirects: usize,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_response_bytes: 16 * 1024 * 1024,
            follow_redirects: true,
            max_redirects: 10,
            user_agent: concat!("Litepost/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
