//! Executor: applies handler effects to a [`Dom`] and runs timers.
//!
//! The runtime owns the page host, the application state, and a
//! [`Schedule`] on a millisecond clock supplied by the caller. Tests move the
//! clock with [`Runtime::advance`]; the browser host calls
//! [`Runtime::advance_to`] with `Date.now()` whenever a timeout fires.
//!
//! Timers are run in due order, one instant at a time, so a task that arms a
//! follow-up timer sees the clock at its own due time rather than at the
//! end of the advance.

use crate::app::{self, AppState, Event};
use crate::command::{Command, Effects, Task, apply};
use crate::config::SiteConfig;
use crate::dom::Dom;
use crate::schedule::Schedule;

#[cfg(test)]
#[path = "runtime_test.rs"]
mod runtime_test;

/// What the host needs to know after handling an event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    /// The triggering browser event's default action must be suppressed.
    pub prevent_default: bool,
    /// Delays of newly armed timers, in milliseconds.
    pub timers: Vec<u32>,
}

impl Outcome {
    fn merge(&mut self, other: Outcome) {
        self.prevent_default |= other.prevent_default;
        self.timers.extend(other.timers);
    }
}

pub struct Runtime<D: Dom> {
    dom: D,
    config: SiteConfig,
    state: AppState,
    schedule: Schedule,
    now_ms: f64,
}

impl<D: Dom> Runtime<D> {
    /// A runtime at clock zero. Nothing touches the page until [`boot`](Self::boot).
    #[must_use]
    pub fn new(dom: D, config: SiteConfig) -> Self {
        Self::starting_at(dom, config, 0.0)
    }

    /// A runtime whose clock starts at `now_ms`.
    #[must_use]
    pub fn starting_at(dom: D, config: SiteConfig, now_ms: f64) -> Self {
        Self { dom, config, state: AppState::default(), schedule: Schedule::new(), now_ms }
    }

    /// Page-load initialization.
    pub fn boot(&mut self) -> Outcome {
        let (state, effects) = app::mount(&mut self.dom, &self.config);
        self.state = state;
        self.execute(effects)
    }

    /// Dispatch one event at the current clock.
    pub fn handle(&mut self, event: Event) -> Outcome {
        let effects = app::update(&mut self.state, &self.dom, &self.config, event);
        self.execute(effects)
    }

    /// Move the clock forward by `ms`, running every timer that falls due.
    pub fn advance(&mut self, ms: f64) -> Outcome {
        self.advance_to(self.now_ms + ms)
    }

    /// Move the clock to `now_ms` (never backwards), running due timers.
    pub fn advance_to(&mut self, now_ms: f64) -> Outcome {
        let mut outcome = Outcome::default();
        while let Some(due) = self.schedule.next_due().filter(|&due| due <= now_ms) {
            self.now_ms = self.now_ms.max(due);
            outcome.merge(self.run_due());
        }
        self.now_ms = self.now_ms.max(now_ms);
        outcome
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    #[must_use]
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Timers armed but not yet run.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.schedule.len()
    }

    // --- Internals ---

    fn execute(&mut self, effects: Effects) -> Outcome {
        let mut outcome = self.commit(effects);
        // Zero-delay timers run before control returns to the host.
        let immediate = self.advance_to(self.now_ms);
        outcome.merge(immediate);
        outcome
    }

    fn commit(&mut self, effects: Effects) -> Outcome {
        let mut outcome = Outcome { prevent_default: effects.prevents_default(), timers: Vec::new() };
        for command in &effects.commands {
            self.apply_logged(command);
        }
        for timer in effects.timers {
            outcome.timers.push(timer.delay_ms);
            self.schedule.push(self.now_ms, timer);
        }
        outcome
    }

    fn run_due(&mut self) -> Outcome {
        let mut outcome = Outcome::default();
        for task in self.schedule.take_due(self.now_ms) {
            match task {
                Task::Apply(command) => self.apply_logged(&command),
                Task::Dispatch(event) => {
                    let effects = app::update(&mut self.state, &self.dom, &self.config, event);
                    let armed = self.commit(effects);
                    outcome.timers.extend(armed.timers);
                }
            }
        }
        outcome
    }

    fn apply_logged(&mut self, command: &Command) {
        if let Err(e) = apply(&mut self.dom, command) {
            log::debug!("runtime: {command:?} failed: {e}");
        }
    }
}
