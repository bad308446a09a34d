use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use rhai::{Dynamic, Engine, FnPtr, AST, FLOAT, INT};
use serde::Serialize;

/// `setTimeout` / `setInterval` backed by a queue owned by one script context.
///
/// Time is virtual: nothing sleeps. Once the script body has returned, due
/// callbacks run in deadline order while the clock stays within the budget;
/// whatever is left is cancelled when the context is dropped.
#[derive(Clone, Default)]
pub(crate) struct Timers {
    queue: Rc<RefCell<TimerQueue>>,
}

#[derive(Default)]
struct TimerQueue {
    now_ms: u64,
    next_id: INT,
    pending: Vec<Timer>,
}

struct Timer {
    id: INT,
    due_ms: u64,
    every_ms: Option<u64>,
    callback: FnPtr,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimerStats {
    pub fired: usize,
    pub cancelled: usize,
    /// Errors raised by callbacks. They never fail the enclosing script.
    pub errors: Vec<String>,
}

impl Timers {
    /// Register `setTimeout` / `setInterval` (delay optional, integer or
    /// float milliseconds) and `clearTimeout` / `clearInterval`.
    pub(crate) fn install(&self, engine: &mut Engine) {
        for (name, repeat) in [("setTimeout", false), ("setInterval", true)] {
            let t = self.clone();
            engine.register_fn(name, move |callback: FnPtr| t.schedule(callback, 0, repeat));
            let t = self.clone();
            engine.register_fn(name, move |callback: FnPtr, delay: INT| {
                t.schedule(callback, int_delay(delay), repeat)
            });
            let t = self.clone();
            engine.register_fn(name, move |callback: FnPtr, delay: FLOAT| {
                t.schedule(callback, float_delay(delay), repeat)
            });
        }
        let t = self.clone();
        engine.register_fn("clearTimeout", move |id: INT| t.cancel(id));
        let t = self.clone();
        engine.register_fn("clearInterval", move |id: INT| t.cancel(id));
    }

    fn schedule(&self, callback: FnPtr, delay_ms: u64, repeat: bool) -> INT {
        let mut q = self.queue.borrow_mut();
        q.next_id += 1;
        let id = q.next_id;
        let due_ms = q.now_ms.saturating_add(delay_ms);
        // A zero period would spin at one instant forever.
        let every_ms = repeat.then_some(delay_ms.max(1));
        q.pending.push(Timer {
            id,
            due_ms,
            every_ms,
            callback,
        });
        id
    }

    fn cancel(&self, id: INT) {
        self.queue.borrow_mut().pending.retain(|t| t.id != id);
    }

    pub(crate) fn pending(&self) -> usize {
        self.queue.borrow().pending.len()
    }

    /// Run due callbacks until the queue is empty, the next deadline lies past
    /// `budget`, or `max_callbacks` have fired. Cancels everything left.
    pub(crate) fn drain(
        &self,
        engine: &Engine,
        ast: &AST,
        budget: Duration,
        max_callbacks: usize,
    ) -> TimerStats {
        let budget_ms = u64::try_from(budget.as_millis()).unwrap_or(u64::MAX);
        let mut stats = TimerStats::default();

        while stats.fired < max_callbacks {
            // The borrow must end before the callback runs: it may schedule or clear timers.
            let Some(callback) = self.queue.borrow_mut().pop_due(budget_ms) else {
                break;
            };
            stats.fired += 1;
            if let Err(e) = callback.call::<Dynamic>(engine, ast, ()) {
                tracing::warn!(error = %e, "timer callback failed");
                stats.errors.push(e.to_string());
            }
        }

        stats.cancelled = self.cancel_all();
        stats
    }

    pub(crate) fn cancel_all(&self) -> usize {
        let mut q = self.queue.borrow_mut();
        let n = q.pending.len();
        q.pending.clear();
        n
    }
}

/// Negative delays mean "now".
fn int_delay(delay: INT) -> u64 {
    u64::try_from(delay).unwrap_or(0)
}

/// Fractional milliseconds are truncated; negative and NaN delays mean "now".
fn float_delay(delay: FLOAT) -> u64 {
    if delay.is_nan() || delay <= 0.0 {
        0
    } else {
        delay as u64
    }
}

impl TimerQueue {
    fn pop_due(&mut self, budget_ms: u64) -> Option<FnPtr> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= budget_ms)
            .min_by_key(|(_, t)| (t.due_ms, t.id))
            .map(|(i, _)| i)?;
        let timer = self.pending.swap_remove(idx);
        self.now_ms = timer.due_ms;
        let callback = timer.callback.clone();
        if let Some(every) = timer.every_ms {
            // Re-armed before the callback runs so it can clear itself.
            self.pending.push(Timer {
                due_ms: timer.due_ms.saturating_add(every),
                ..timer
            });
        }
        Some(callback)
    }
}
