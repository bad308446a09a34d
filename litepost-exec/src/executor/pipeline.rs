use std::sync::Arc;

use litepost_core::{template, AuthConfig, Environment, EnvironmentRegistry, Request, Response};
use litepost_store::Storage;

use crate::executor::concurrency::ConcurrencyLimits;
use crate::executor::http::{HttpClient, HttpError};
use crate::executor::request::build_request;
use crate::executor::result::{Execution, ExecutionError, StageWarning, TestOutcome};
use crate::executor::send::send_with_retry;
use crate::executor::types::ExecutorConfig;
use crate::scripting::ScriptRuntime;

/// Runs requests through the pipeline: environment, substitution,
/// pre-script, auth, network, post-script, tests, persistence.
///
/// Every execution works on its own copy of the request. Nothing here holds
/// a lock across the network call or a storage call.
pub struct Executor {
    config: ExecutorConfig,
    store: Arc<dyn Storage>,
    http: Arc<dyn HttpClient>,
    environments: Arc<EnvironmentRegistry>,
    scripts: ScriptRuntime,
    limits: ConcurrencyLimits,
}

impl Executor {
    pub fn new(
        config: ExecutorConfig,
        store: Arc<dyn Storage>,
        http: Arc<dyn HttpClient>,
        environments: Arc<EnvironmentRegistry>,
    ) -> Self {
        let scripts = ScriptRuntime::new(config.scripts.clone());
        let limits = ConcurrencyLimits::new(config.max_concurrent_executions);
        Self {
            config,
            store,
            http,
            environments,
            scripts,
            limits,
        }
    }

    pub fn environments(&self) -> &Arc<EnvironmentRegistry> {
        &self.environments
    }

    /// Execute `request`. The stored original is never modified.
    ///
    /// Returns an error only for fatal stages; post-script errors and
    /// persistence failures are reported in [`Execution::warnings`].
    #[tracing::instrument(skip_all, fields(request_id = %request.id, method = %request.method))]
    pub async fn execute_request(&self, request: &Request) -> Result<Execution, ExecutionError> {
        let _permit = self.limits.acquire().await?;
        let mut working = request.clone();

        let environment = self.resolve_environment(&working).await?;
        if let Some(env) = environment.as_deref() {
            template::substitute_request(&mut working, &env.variables)
                .map_err(ExecutionError::SubstitutionFailed)?;
            tracing::debug!(environment = %env.id, "variables substituted");
        }

        if let Some(source) = request.pre_script() {
            let output = self
                .scripts
                .run_pre_script(source, &mut working, environment.as_deref())
                .map_err(ExecutionError::Script)?;
            tracing::debug!(logs = output.logs.len(), "pre-script finished");
        }

        let auth = working
            .auth
            .as_ref()
            .map(AuthConfig::strategy)
            .transpose()?;
        if let Some(strategy) = auth.as_ref().filter(|s| s.is_approximation()) {
            tracing::warn!(
                kind = strategy.kind().as_str(),
                "auth scheme is approximated; no challenge/response or signature is computed"
            );
        }

        let parts = build_request(&working, auth.as_ref()).map_err(|e| match e {
            HttpError::InvalidRequest(msg) => ExecutionError::InvalidRequest(msg),
            source => ExecutionError::Network {
                attempts: 0,
                source,
            },
        })?;
        let sent = send_with_retry(
            self.http.as_ref(),
            &parts,
            &self.config.http,
            &self.config.retry,
        )
        .await
        .map_err(|f| match f.error {
            // Rejected by the client before anything went on the wire.
            HttpError::InvalidRequest(msg) => ExecutionError::InvalidRequest(msg),
            source => ExecutionError::Network {
                attempts: f.attempts,
                source,
            },
        })?;

        let response = Response::new(
            request.id.clone(),
            sent.response.status,
            sent.response.headers,
            &sent.response.body,
            sent.elapsed,
        );

        let mut warnings = Vec::new();
        if let Some(source) = working.post_script() {
            if let Err(e) =
                self.scripts
                    .run_post_script(source, &working, &response, environment.as_deref())
            {
                tracing::warn!(error = %e, "post-script failed");
                warnings.push(StageWarning::PostScript(e));
            }
        }

        let tests: Vec<TestOutcome> = working
            .tests
            .iter()
            .map(|test| TestOutcome {
                name: test.name.clone(),
                result: self
                    .scripts
                    .run_test(test, &working, &response, environment.as_deref()),
            })
            .collect();
        let failed = tests.iter().filter(|t| !t.result.passed).count();
        if failed > 0 {
            tracing::debug!(failed, total = tests.len(), "tests failed");
        }

        if let Err(e) = self.store.save_response(&response).await {
            tracing::warn!(error = %e, response_id = %response.id, "failed to persist response");
            warnings.push(StageWarning::Persistence(e.to_string()));
        }

        tracing::info!(
            status = response.status_code,
            duration_ms = response.duration.as_millis() as u64,
            attempts = sent.attempts,
            "request executed"
        );
        Ok(Execution {
            response,
            tests,
            warnings,
            attempts: sent.attempts,
            network_elapsed: sent.total,
        })
    }

    /// Load a stored request by id and execute it.
    pub async fn execute_stored(&self, request_id: &str) -> Result<Execution, ExecutionError> {
        let request = self
            .store
            .get_request(request_id)
            .await?
            .ok_or_else(|| ExecutionError::RequestNotFound(request_id.to_string()))?;
        self.execute_request(&request).await
    }

    /// Overlay every stored environment onto the registry. Returns how many
    /// were loaded.
    pub async fn sync_environments(&self) -> Result<usize, ExecutionError> {
        let stored = self.store.list_environments().await?;
        let n = stored.len();
        self.environments.extend(stored);
        Ok(n)
    }

    /// Stop admitting executions. Calls already running finish normally.
    pub fn close(&self) {
        self.limits.close();
    }

    async fn resolve_environment(
        &self,
        request: &Request,
    ) -> Result<Option<Arc<Environment>>, ExecutionError> {
        let Some(id) = request.environment() else {
            return Ok(None);
        };
        if let Ok(env) = self.environments.get(id) {
            return Ok(Some(env));
        }

        match self.store.get_environment(id).await {
            Ok(Some(env)) => {
                tracing::debug!(environment = %id, "environment loaded from store");
                self.environments.set(env.clone());
                Ok(Some(Arc::new(env)))
            }
            Ok(None) => Err(ExecutionError::EnvironmentNotFound(id.to_string())),
            Err(e) => {
                tracing::warn!(environment = %id, error = %e, "environment lookup failed");
                Err(ExecutionError::EnvironmentNotFound(id.to_string()))
            }
        }
    }
}
