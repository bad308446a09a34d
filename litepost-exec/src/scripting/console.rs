use std::cell::RefCell;
use std::rc::Rc;

use rhai::{Dynamic, Engine};
use serde::Serialize;

use crate::scripting::SCRIPT_LOG_TARGET;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogLine {
    pub level: LogLevel,
    pub message: String,
}

/// Registers `name` for every arity from the full argument list down to zero.
/// Rhai has no variadic native functions, so each count is its own overload.
macro_rules! register_arities {
    (@drop_last $engine:expr, $name:expr, $level:expr; [$($kept:ident)*] $last:ident) => {
        register_arities!($engine, $name, $level; $($kept)*);
    };
    (@drop_last $engine:expr, $name:expr, $level:expr; [$($kept:ident)*] $head:ident $($rest:ident)+) => {
        register_arities!(@drop_last $engine, $name, $level; [$($kept)* $head] $($rest)+);
    };
    ($engine:expr, $name:expr, $level:expr;) => {
        $engine.register_fn($name, move |c: Console| c.emit($level, String::new()));
    };
    ($engine:expr, $name:expr, $level:expr; $($arg:ident)+) => {
        $engine.register_fn($name, move |c: Console, $($arg: Dynamic),+| {
            c.emit($level, join(&[$($arg),+]))
        });
        register_arities!(@drop_last $engine, $name, $level; [] $($arg)+);
    };
}

/// The `console` object. Lines go to tracing and are kept for the caller.
#[derive(Debug, Clone, Default)]
pub(crate) struct Console {
    lines: Rc<RefCell<Vec<LogLine>>>,
}

impl Console {
    pub(crate) fn emit(&self, level: LogLevel, message: String) {
        match level {
            LogLevel::Debug => tracing::debug!(target: SCRIPT_LOG_TARGET, "{message}"),
            LogLevel::Info => tracing::info!(target: SCRIPT_LOG_TARGET, "{message}"),
            LogLevel::Warn => tracing::warn!(target: SCRIPT_LOG_TARGET, "{message}"),
            LogLevel::Error => tracing::error!(target: SCRIPT_LOG_TARGET, "{message}"),
        }
        self.lines.borrow_mut().push(LogLine { level, message });
    }

    pub(crate) fn take(&self) -> Vec<LogLine> {
        std::mem::take(&mut *self.lines.borrow_mut())
    }

    /// Register the `Console` type with `log` / `info` / `warn` / `error` taking
    /// zero to eight values, and hook `print` / `debug` into this instance.
    pub(crate) fn install(&self, engine: &mut Engine) {
        engine.register_type_with_name::<Console>("Console");

        for (name, level) in [
            ("log", LogLevel::Info),
            ("info", LogLevel::Info),
            ("warn", LogLevel::Warn),
            ("error", LogLevel::Error),
        ] {
            register_arities!(engine, name, level; a b c d e f g h);
        }

        let printer = self.clone();
        engine.on_print(move |s| printer.emit(LogLevel::Info, s.to_string()));
        let debugger = self.clone();
        engine.on_debug(move |s, _source, _pos| debugger.emit(LogLevel::Debug, s.to_string()));
    }
}

fn join(args: &[Dynamic]) -> String {
    args.iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
