use std::cell::RefCell;
use std::rc::Rc;

use rhai::{Array, Dynamic, Engine, EvalAltResult, FnPtr, Map, NativeCallContext};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssertionResult {
    pub name: String,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Assertion outcomes recorded during one script run.
#[derive(Debug, Clone, Default)]
pub(crate) struct Assertions {
    results: Rc<RefCell<Vec<AssertionResult>>>,
}

impl Assertions {
    fn record(&self, name: String, passed: bool, message: Option<String>) -> bool {
        self.results.borrow_mut().push(AssertionResult {
            name,
            passed,
            message,
        });
        passed
    }

    fn len(&self) -> usize {
        self.results.borrow().len()
    }

    fn any_failed_since(&self, start: usize) -> bool {
        self.results.borrow()[start..].iter().any(|r| !r.passed)
    }

    pub(crate) fn take(&self) -> Vec<AssertionResult> {
        std::mem::take(&mut *self.results.borrow_mut())
    }

    /// Register the `pm` vocabulary: `pm.test(name, bool)`,
    /// `pm.test(name, || { .. })` and `pm.expect(v).to.{be,equal,eql,contain,include}(x)`.
    pub(crate) fn install(&self, engine: &mut Engine) {
        engine
            .register_type_with_name::<TestApi>("TestApi")
            .register_type_with_name::<Expectation>("Expectation")
            .register_fn("test", |pm: TestApi, name: &str, passed: bool| {
                let message = (!passed).then(|| format!("{name} failed"));
                pm.assertions.record(name.to_string(), passed, message)
            })
            .register_fn(
                "test",
                |ctx: NativeCallContext,
                 pm: TestApi,
                 name: &str,
                 body: FnPtr|
                 -> Result<bool, Box<EvalAltResult>> {
                    let start = pm.assertions.len();
                    let outcome = body.call_within_context::<Dynamic>(&ctx, ());
                    let (passed, message) = match outcome {
                        Err(e) => (false, Some(e.to_string())),
                        Ok(v) if v.as_bool() == Ok(false) => (false, Some(format!("{name} failed"))),
                        Ok(_) if pm.assertions.any_failed_since(start) => {
                            (false, Some(format!("{name}: expectation failed")))
                        }
                        Ok(_) => (true, None),
                    };
                    Ok(pm.assertions.record(name.to_string(), passed, message))
                },
            )
            .register_fn("expect", |pm: TestApi, actual: Dynamic| Expectation {
                actual,
                assertions: pm.assertions.clone(),
            })
            .register_get("to", |e: &mut Expectation| e.clone());

        for name in ["be", "equal", "eql"] {
            engine.register_fn(name, move |e: Expectation, expected: Dynamic| {
                let passed = values_equal(&e.actual, &expected);
                e.check(format!("expected {} to {name} {}", e.actual, expected), passed)
            });
        }
        for name in ["contain", "include"] {
            engine.register_fn(name, move |e: Expectation, expected: Dynamic| {
                let passed = contains(&e.actual, &expected);
                e.check(format!("expected {} to {name} {}", e.actual, expected), passed)
            });
        }
    }

    pub(crate) fn api(&self) -> TestApi {
        TestApi {
            assertions: self.clone(),
        }
    }
}

/// The `pm` object. Resolved by name on every access instead of living in
/// the scope, so closures passed to `pm.test` can use it while the outer
/// call is still running. Every method takes it by value.
#[derive(Debug, Clone)]
pub(crate) struct TestApi {
    assertions: Assertions,
}

#[derive(Debug, Clone)]
pub(crate) struct Expectation {
    actual: Dynamic,
    assertions: Assertions,
}

impl Expectation {
    fn check(&self, description: String, passed: bool) -> bool {
        let message = (!passed).then(|| description.clone());
        self.assertions.record(description, passed, message)
    }
}

fn number(d: &Dynamic) -> Option<f64> {
    d.as_int()
        .map(|i| i as f64)
        .ok()
        .or_else(|| d.as_float().ok())
}

/// Numbers compare by value across int/float; everything else structurally.
pub(crate) fn values_equal(a: &Dynamic, b: &Dynamic) -> bool {
    if let (Some(x), Some(y)) = (number(a), number(b)) {
        return x == y;
    }
    let as_json = |d: &Dynamic| rhai::serde::from_dynamic::<serde_json::Value>(d).ok();
    match (as_json(a), as_json(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a.type_name() == b.type_name() && a.to_string() == b.to_string(),
    }
}

fn contains(actual: &Dynamic, expected: &Dynamic) -> bool {
    if actual.is_string() {
        return actual.to_string().contains(&expected.to_string());
    }
    if let Some(items) = actual.read_lock::<Array>() {
        return items.iter().any(|item| values_equal(item, expected));
    }
    if let Some(map) = actual.read_lock::<Map>() {
        return map.contains_key(expected.to_string().as_str());
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ints_and_floats_compare_by_value() {
        assert!(values_equal(&Dynamic::from(200_i64), &Dynamic::from(200.0_f64)));
        assert!(!values_equal(&Dynamic::from(200_i64), &Dynamic::from("200".to_string())));
    }

    #[test]
    fn contain_checks_substrings_and_array_members() {
        assert!(contains(&Dynamic::from("hello world".to_string()), &Dynamic::from("world".to_string())));
        let arr: Array = vec![Dynamic::from(1_i64), Dynamic::from(2_i64)];
        assert!(contains(&Dynamic::from(arr), &Dynamic::from(2_i64)));
    }
}
