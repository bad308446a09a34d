use std::fmt;
use std::time::Duration;

use litepost_core::{AuthError, Response, SubstitutionError};
use litepost_store::StoreError;
use serde::Serialize;

use crate::executor::concurrency::Closed;
use crate::executor::http::HttpError;
use crate::scripting::{ScriptError, TestResult};

/// Pipeline stage, used to say where an execution failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Admission,
    Load,
    Environment,
    Substitution,
    PreScript,
    Auth,
    BuildRequest,
    Network,
    PostScript,
    Tests,
    Persistence,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Admission => "admission",
            Stage::Load => "load",
            Stage::Environment => "environment",
            Stage::Substitution => "substitution",
            Stage::PreScript => "pre_script",
            Stage::Auth => "auth",
            Stage::BuildRequest => "build_request",
            Stage::Network => "network",
            Stage::PostScript => "post_script",
            Stage::Tests => "tests",
            Stage::Persistence => "persistence",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fatal outcome: the pipeline stopped and produced no response.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    #[error("environment not found: {0}")]
    EnvironmentNotFound(String),
    #[error("variable substitution failed: {0}")]
    SubstitutionFailed(#[source] SubstitutionError),
    #[error("{0}")]
    Script(#[source] ScriptError),
    #[error("invalid {kind} auth config: {key} is required")]
    AuthConfigInvalid { kind: &'static str, key: &'static str },
    #[error("unsupported authentication type: {0}")]
    UnsupportedAuthKind(String),
    /// The working copy cannot be sent as-is (bad URL, method or header).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("network error after {attempts} attempt(s): {source}")]
    Network {
        attempts: usize,
        #[source]
        source: HttpError,
    },
    #[error("request not found: {0}")]
    RequestNotFound(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("executor is closed")]
    Closed,
}

impl ExecutionError {
    pub fn stage(&self) -> Stage {
        match self {
            ExecutionError::EnvironmentNotFound(_) => Stage::Environment,
            ExecutionError::SubstitutionFailed(_) => Stage::Substitution,
            ExecutionError::Script(_) => Stage::PreScript,
            ExecutionError::AuthConfigInvalid { .. } | ExecutionError::UnsupportedAuthKind(_) => {
                Stage::Auth
            }
            ExecutionError::InvalidRequest(_) => Stage::BuildRequest,
            ExecutionError::Network { .. } => Stage::Network,
            ExecutionError::RequestNotFound(_) | ExecutionError::Store(_) => Stage::Load,
            ExecutionError::Closed => Stage::Admission,
        }
    }
}

impl From<AuthError> for ExecutionError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Missing { kind, key } => ExecutionError::AuthConfigInvalid { kind, key },
            AuthError::Unsupported(kind) => ExecutionError::UnsupportedAuthKind(kind),
        }
    }
}

impl From<Closed> for ExecutionError {
    fn from(_: Closed) -> Self {
        ExecutionError::Closed
    }
}

/// Non-fatal failure recorded next to a response that was still returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageWarning {
    PostScript(ScriptError),
    Persistence(String),
}

impl StageWarning {
    pub fn stage(&self) -> Stage {
        match self {
            StageWarning::PostScript(_) => Stage::PostScript,
            StageWarning::Persistence(_) => Stage::Persistence,
        }
    }
}

impl fmt::Display for StageWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageWarning::PostScript(e) => write!(f, "{e}"),
            StageWarning::Persistence(e) => write!(f, "response not saved: {e}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestOutcome {
    pub name: String,
    #[serde(flatten)]
    pub result: TestResult,
}

/// Successful pipeline run. The response is always present; everything that
/// went wrong after the network call is in `warnings`.
#[derive(Debug, Clone)]
pub struct Execution {
    pub response: Response,
    pub tests: Vec<TestOutcome>,
    pub warnings: Vec<StageWarning>,
    pub attempts: usize,
    /// Network stage wall time across all attempts and backoff.
    /// `response.duration` covers only the attempt that produced it.
    pub network_elapsed: Duration,
}

impl Execution {
    pub fn tests_passed(&self) -> bool {
        self.tests.iter().all(|t| t.result.passed)
    }

    pub fn failed_tests(&self) -> impl Iterator<Item = &TestOutcome> {
        self.tests.iter().filter(|t| !t.result.passed)
    }
}
