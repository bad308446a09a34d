use litepost_core::{Environment, Request, Response, Test};
use rhai::{Dynamic, Engine, Scope};
use serde::Serialize;

use crate::scripting::assertions::Assertions;
use crate::scripting::bindings;
use crate::scripting::console::{Console, LogLine};
use crate::scripting::timers::{TimerStats, Timers};
use crate::scripting::{ScriptConfig, ScriptError, ScriptStage, TestResult};

/// Side output of a script run that completed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScriptOutput {
    pub logs: Vec<LogLine>,
    pub timers: TimerStats,
}

/// Entry points for the three script kinds.
///
/// Holds configuration only. Each call builds its own engine, scope and
/// timer queue and drops them before returning, so one runtime can be
/// shared freely between concurrent executions.
#[derive(Debug, Clone, Default)]
pub struct ScriptRuntime {
    config: ScriptConfig,
}

impl ScriptRuntime {
    pub fn new(config: ScriptConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScriptConfig {
        &self.config
    }

    /// Run a pre-request script. On success, changes made to `request`
    /// (method, url, headers, queryParams, body, auth) are written back to
    /// `request`; on failure it is left untouched.
    pub fn run_pre_script(
        &self,
        source: &str,
        request: &mut Request,
        environment: Option<&Environment>,
    ) -> Result<ScriptOutput, ScriptError> {
        let stage = ScriptStage::Pre;
        let mut ctx = ScriptContext::new(&self.config);
        ctx.bind(request, None, environment)
            .map_err(|e| ScriptError::new(stage, e))?;
        let _value = ctx.run(source).map_err(|e| ScriptError::new(stage, e))?;
        if let Some(value) = ctx.scope.get_value::<Dynamic>("request") {
            bindings::apply_request_changes(&value, request);
        }
        Ok(ctx.finish())
    }

    /// Run a post-response script. Changes to `request` are discarded.
    pub fn run_post_script(
        &self,
        source: &str,
        request: &Request,
        response: &Response,
        environment: Option<&Environment>,
    ) -> Result<ScriptOutput, ScriptError> {
        let stage = ScriptStage::Post;
        let mut ctx = ScriptContext::new(&self.config);
        ctx.bind(request, Some(response), environment)
            .map_err(|e| ScriptError::new(stage, e))?;
        let _value = ctx.run(source).map_err(|e| ScriptError::new(stage, e))?;
        Ok(ctx.finish())
    }

    /// Run a test script. Errors become a failed result, never an `Err`.
    ///
    /// A test fails when the script errors, any `pm.test` / `pm.expect`
    /// assertion fails, or the script's final expression is `false`.
    pub fn run_test_script(
        &self,
        source: &str,
        request: &Request,
        response: &Response,
        environment: Option<&Environment>,
    ) -> TestResult {
        self.evaluate_test(source, None, request, response, environment)
    }

    /// Like [`run_test_script`](Self::run_test_script), additionally requiring
    /// the final value to render as `test.expected` when that is set.
    pub fn run_test(
        &self,
        test: &Test,
        request: &Request,
        response: &Response,
        environment: Option<&Environment>,
    ) -> TestResult {
        self.evaluate_test(
            &test.script,
            test.expected.as_deref(),
            request,
            response,
            environment,
        )
    }

    fn evaluate_test(
        &self,
        source: &str,
        expected: Option<&str>,
        request: &Request,
        response: &Response,
        environment: Option<&Environment>,
    ) -> TestResult {
        if source.trim().is_empty() {
            return TestResult {
                passed: true,
                message: "no tests to run".to_string(),
                assertions: Vec::new(),
            };
        }

        let mut ctx = ScriptContext::new(&self.config);
        if let Err(e) = ctx.bind(request, Some(response), environment) {
            return TestResult::failed(format!("test execution failed: {e}"), Vec::new());
        }
        let outcome = ctx.run(source);
        let assertions = ctx.assertions.take();

        let value = match outcome {
            Ok(value) => value,
            Err(e) => return TestResult::failed(format!("test execution failed: {e}"), assertions),
        };
        if let Some(failed) = assertions.iter().find(|a| !a.passed) {
            let message = failed
                .message
                .clone()
                .unwrap_or_else(|| format!("{} failed", failed.name));
            return TestResult::failed(message, assertions);
        }
        if value.as_bool() == Ok(false) {
            return TestResult::failed("test evaluated to false", assertions);
        }
        if let Some(expected) = expected {
            let actual = value.to_string();
            if actual.trim() != expected.trim() {
                return TestResult::failed(
                    format!("expected {expected:?}, got {actual:?}"),
                    assertions,
                );
            }
        }

        let message = match assertions.len() {
            0 => "passed".to_string(),
            n => format!("{n} assertion(s) passed"),
        };
        TestResult {
            passed: true,
            message,
            assertions,
        }
    }
}

/// Bindings, timer queue and engine for a single script invocation.
struct ScriptContext {
    engine: Engine,
    scope: Scope<'static>,
    console: Console,
    timers: Timers,
    assertions: Assertions,
    config: ScriptConfig,
    timer_stats: TimerStats,
}

impl ScriptContext {
    // `Engine::on_var` is flagged as a volatile API.
    #[allow(deprecated)]
    fn new(config: &ScriptConfig) -> Self {
        let console = Console::default();
        let timers = Timers::default();
        let assertions = Assertions::default();

        let mut engine = Engine::new();
        engine.set_max_operations(config.max_operations);
        engine.set_max_call_levels(config.max_call_depth);
        console.install(&mut engine);
        timers.install(&mut engine);
        assertions.install(&mut engine);
        // `pm` and `console` are resolved by name so closures, timer callbacks
        // and script-defined `fn`s all see them.
        let pm = assertions.api();
        let host_console = console.clone();
        engine.on_var(move |name, _index, _context| match name {
            "pm" => Ok(Some(Dynamic::from(pm.clone()))),
            "console" => Ok(Some(Dynamic::from(host_console.clone()))),
            _ => Ok(None),
        });

        let scope = Scope::new();

        Self {
            engine,
            scope,
            console,
            timers,
            assertions,
            config: config.clone(),
            timer_stats: TimerStats::default(),
        }
    }

    fn bind(
        &mut self,
        request: &Request,
        response: Option<&Response>,
        environment: Option<&Environment>,
    ) -> Result<(), Box<rhai::EvalAltResult>> {
        self.scope.push_dynamic("request", bindings::request(request)?);
        if let Some(response) = response {
            self.scope
                .push_constant_dynamic("response", bindings::response(response)?);
        }
        self.scope
            .push_constant_dynamic("environment", bindings::environment(environment)?);
        Ok(())
    }

    /// Compile and run `source`, then drain due timers. Returns the value of
    /// the final expression.
    fn run(&mut self, source: &str) -> Result<Dynamic, String> {
        let ast = self.engine.compile(source).map_err(|e| e.to_string())?;
        let value = self
            .engine
            .eval_ast_with_scope::<Dynamic>(&mut self.scope, &ast)
            .map_err(|e| e.to_string())?;

        if self.timers.pending() > 0 {
            self.timer_stats = self.timers.drain(
                &self.engine,
                &ast,
                self.config.timer_budget,
                self.config.max_timer_callbacks,
            );
            tracing::debug!(
                fired = self.timer_stats.fired,
                cancelled = self.timer_stats.cancelled,
                "script timers drained"
            );
        }
        Ok(value)
    }

    fn finish(mut self) -> ScriptOutput {
        ScriptOutput {
            logs: self.console.take(),
            timers: std::mem::take(&mut self.timer_stats),
        }
    }
}

impl Drop for ScriptContext {
    fn drop(&mut self) {
        // Teardown: nothing scheduled may outlive the invocation.
        self.timers.cancel_all();
    }
}
