//! Deferred work on virtual time
//!
//! The form never sleeps. Work that must wait (debounced validation and
//! saves, the simulated submission delay) is queued here under a key and
//! released when the owner advances the clock. The TUI advances it by real
//! elapsed time on every loop tick; tests advance it by exact amounts.
//!
//! Scheduling under a key that is already pending replaces the pending task
//! and restarts its delay. There is no explicit cancellation: a task is
//! simply superseded by the next one with the same key, or dropped with
//! [`Scheduler::cancel_all`].

use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone)]
struct Pending<T> {
    due: Duration,
    seq: u64,
    task: T,
}

/// Keyed debounce queue and throttle gates over a virtual clock
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now: Duration,
    next_seq: u64,
    pending: HashMap<String, Pending<T>>,
    /// Throttle key -> end of its current window
    windows: HashMap<String, Duration>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            pending: HashMap::new(),
            windows: HashMap::new(),
        }
    }

    /// Virtual time elapsed since creation
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Run `task` once `delay` has passed without another task being
    /// scheduled under the same key.
    pub fn schedule_debounced(&mut self, key: impl Into<String>, delay: Duration, task: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.insert(
            key.into(),
            Pending {
                due: self.now + delay,
                seq,
                task,
            },
        );
    }

    /// One-shot delay. Same replacement rule as a debounce.
    pub fn schedule_after(&mut self, key: impl Into<String>, delay: Duration, task: T) {
        self.schedule_debounced(key, delay, task);
    }

    /// Admit at most one call per `limit` window for `key`.
    pub fn throttle(&mut self, key: &str, limit: Duration) -> bool {
        match self.windows.get(key) {
            Some(window_end) if self.now < *window_end => false,
            _ => {
                self.windows.insert(key.to_string(), self.now + limit);
                true
            }
        }
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.pending.contains_key(key)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Drop every pending task
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    /// Move the clock forward and return the tasks that fell due, earliest
    /// first. Tasks due at the same instant come out in scheduling order.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<T> {
        self.now += elapsed;
        let now = self.now;

        let due_keys: Vec<String> = self
            .pending
            .iter()
            .filter(|(_, pending)| pending.due <= now)
            .map(|(key, _)| key.clone())
            .collect();

        let mut due: Vec<Pending<T>> = due_keys
            .into_iter()
            .filter_map(|key| self.pending.remove(&key))
            .collect();
        due.sort_by_key(|pending| (pending.due, pending.seq));

        due.into_iter().map(|pending| pending.task).collect()
    }
}
