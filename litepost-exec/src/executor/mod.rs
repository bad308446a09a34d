mod auth;
pub mod concurrency;
pub mod http;
mod pipeline;
mod request;
mod result;
mod send;
mod types;

pub use http::{HttpClient, HttpError, HttpRequestParts, HttpResponseParts, ReqwestHttpClient};
pub use pipeline::Executor;
pub use result::{Execution, ExecutionError, Stage, StageWarning, TestOutcome};
pub use types::{ExecutorConfig, HttpConfig};
