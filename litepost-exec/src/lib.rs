#![forbid(unsafe_code)]

//! Request execution pipeline: environment resolution, variable substitution,
//! pre/post/test scripts, the network call and response persistence.

pub mod executor;
pub mod retry;
pub mod scripting;

pub use crate::executor::{
    Execution, ExecutionError, Executor, ExecutorConfig, HttpClient, HttpConfig, HttpError,
    HttpRequestParts, HttpResponseParts, ReqwestHttpClient, Stage, StageWarning, TestOutcome,
};
pub use crate::retry::RetryConfig;
pub use crate::scripting::{ScriptConfig, ScriptError, ScriptRuntime, ScriptStage, TestResult};
