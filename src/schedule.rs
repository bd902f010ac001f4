//! Pending timers ordered by due time.
//!
//! Times are plain milliseconds supplied by the caller: a virtual clock in
//! tests, `Date.now()` in the browser. Timers due at the same instant run in
//! the order they were scheduled.

use crate::command::{Task, Timer};

#[cfg(test)]
#[path = "schedule_test.rs"]
mod schedule_test;

#[derive(Debug, Clone, PartialEq)]
struct Pending {
    due_ms: f64,
    seq: u64,
    task: Task,
}

#[derive(Debug, Clone, Default)]
pub struct Schedule {
    pending: Vec<Pending>,
    next_seq: u64,
}

impl Schedule {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm `timer` relative to `now_ms`.
    pub fn push(&mut self, now_ms: f64, timer: Timer) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Pending { due_ms: now_ms + f64::from(timer.delay_ms), seq, task: timer.task });
    }

    /// Remove and return every task due at or before `now_ms`, earliest first.
    pub fn take_due(&mut self, now_ms: f64) -> Vec<Task> {
        let (mut due, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|p| p.due_ms <= now_ms);
        self.pending = rest;
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|p| p.task).collect()
    }

    /// Due time of the earliest pending task.
    #[must_use]
    pub fn next_due(&self) -> Option<f64> {
        self.pending
            .iter()
            .map(|p| p.due_ms)
            .min_by(f64::total_cmp)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
