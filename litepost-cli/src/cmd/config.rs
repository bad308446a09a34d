use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use litepost_core::EnvironmentRegistry;
use litepost_exec::{Executor, ExecutorConfig, HttpConfig, ReqwestHttpClient, RetryConfig};
use litepost_store::{MemoryStore, SqliteStore, Storage};
use serde::de::DeserializeOwned;

use crate::output::print_error;
use crate::{HttpArgs, OutputArgs, StoreArgs};

/// Parse a JSON or YAML document from `path`.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    if let Ok(v) = serde_json::from_str(&content) {
        return Ok(v);
    }
    serde_yaml::from_str(&content)
        .map_err(|e| format!("{} is neither valid JSON nor YAML: {e}", path.display()))
}

pub fn load_document<T: DeserializeOwned>(path: &Path, output: &OutputArgs) -> Option<T> {
    match read_document(path) {
        Ok(v) => Some(v),
        Err(e) => {
            print_error(output.format, output.quiet, &e);
            None
        }
    }
}

pub fn get_database_url(store: &StoreArgs) -> Option<String> {
    store
        .store
        .clone()
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .filter(|u| !u.trim().is_empty())
}

/// Open the configured SQLite store. Without a database URL, commands that
/// only execute fall back to an in-memory store; the rest report an error.
pub async fn open_store(
    store: &StoreArgs,
    output: &OutputArgs,
    required: bool,
) -> Option<Arc<dyn Storage>> {
    let Some(url) = get_database_url(store) else {
        if required {
            print_error(
                output.format,
                output.quiet,
                "missing database URL. Set --store <url>, LITEPOST_DATABASE_URL, or DATABASE_URL",
            );
            return None;
        }
        tracing::debug!("no database configured, using in-memory store");
        return Some(Arc::new(MemoryStore::new()));
    };
    match SqliteStore::connect(&url, store.max_connections).await {
        Ok(s) => Some(Arc::new(s)),
        Err(e) => {
            print_error(
                output.format,
                output.quiet,
                &format!("failed to open database {url}: {e}"),
            );
            None
        }
    }
}

pub fn build_executor_config(http: &HttpArgs) -> ExecutorConfig {
    ExecutorConfig {
        http: HttpConfig {
            timeout: Duration::from_millis(http.timeout),
            follow_redirects: !http.no_follow_redirects,
            ..HttpConfig::default()
        },
        retry: RetryConfig::default()
            .with_retries(http.retries)
            .with_base_delay(Duration::from_millis(http.retry_delay))
            .with_non_idempotent_retries(http.retry_non_idempotent),
        max_concurrent_executions: http.max_concurrency.max(1),
        ..ExecutorConfig::default()
    }
}

/// Executor over `store` whose registry holds the built-ins plus every
/// stored environment.
pub async fn build_executor(
    http: &HttpArgs,
    store: Arc<dyn Storage>,
    output: &OutputArgs,
) -> Option<Executor> {
    let config = build_executor_config(http);
    let client = match ReqwestHttpClient::new(&config.http) {
        Ok(c) => c,
        Err(e) => {
            print_error(
                output.format,
                output.quiet,
                &format!("failed to build http client: {e}"),
            );
            return None;
        }
    };
    let executor = Executor::new(
        config,
        store,
        Arc::new(client),
        Arc::new(EnvironmentRegistry::new()),
    );
    if let Err(e) = executor.sync_environments().await {
        print_error(
            output.format,
            output.quiet,
            &format!("failed to load environments: {e}"),
        );
        return None;
    }
    Some(executor)
}
