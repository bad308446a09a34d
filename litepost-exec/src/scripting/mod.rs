//! Embedded scripting for pre-request, post-response and test scripts.
//!
//! Scripts are [Rhai](https://rhai.rs) source. Every `run_*` call builds a
//! fresh engine and scope, so concurrent executions never share bindings.

mod assertions;
mod bindings;
mod console;
mod runtime;
mod timers;

use std::fmt;
use std::time::Duration;

use serde::Serialize;

pub use assertions::AssertionResult;
pub use console::{LogLevel, LogLine};
pub use runtime::{ScriptOutput, ScriptRuntime};
pub use timers::TimerStats;

/// Target used for everything scripts write through `console` / `print`.
pub const SCRIPT_LOG_TARGET: &str = "litepost::script";

#[derive(Debug, Clone)]
pub struct ScriptConfig {
    /// Rhai operation budget for the script body and for each timer callback.
    pub max_operations: u64,
    pub max_call_depth: usize,
    /// Virtual time timers may advance to before the rest are cancelled.
    pub timer_budget: Duration,
    pub max_timer_callbacks: usize,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            max_operations: 1_000_000,
            max_call_depth: 64,
            timer_budget: Duration::from_millis(5_000),
            max_timer_callbacks: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptStage {
    Pre,
    Post,
    Test,
}

impl fmt::Display for ScriptStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScriptStage::Pre => "pre",
            ScriptStage::Post => "post",
            ScriptStage::Test => "test",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{stage}-script failed: {message}")]
pub struct ScriptError {
    pub stage: ScriptStage,
    pub message: String,
}

impl ScriptError {
    pub(crate) fn new(stage: ScriptStage, message: impl fmt::Display) -> Self {
        Self {
            stage,
            message: message.to_string(),
        }
    }
}

/// Outcome of one test script. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestResult {
    pub passed: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assertions: Vec<AssertionResult>,
}

impl TestResult {
    pub(crate) fn failed(message: impl Into<String>, assertions: Vec<AssertionResult>) -> Self {
        Self {
            passed: false,
            message: message.into(),
            assertions,
        }
    }
}
