//! Cancellable deferred actions with last-input-wins semantics.

use std::time::{Duration, Instant};

use log::debug;

/// A single pending action that fires once its deadline passes.
///
/// Scheduling replaces (cancels) whatever was pending, so at most one action
/// is outstanding per timer.
#[derive(Debug, Clone)]
pub struct DeferredTimer<A> {
    label: &'static str,
    pending: Option<(Instant, A)>,
}

impl<A> DeferredTimer<A> {
    /// Idle timer; `label` prefixes its log lines.
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            pending: None,
        }
    }

    /// Name used in logs.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Arm the timer. Returns true when a pending action was superseded.
    pub fn schedule(&mut self, now: Instant, delay: Duration, action: A) -> bool {
        let superseded = self.pending.replace((now + delay, action)).is_some();
        if superseded {
            debug!("{}: superseded pending action", self.label);
        }
        superseded
    }

    /// Drop the pending action, returning it.
    pub fn cancel(&mut self) -> Option<A> {
        self.pending.take().map(|(_, action)| action)
    }

    /// Whether an action is armed.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the armed action becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    /// Take the action if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<A> {
        match &self.pending {
            Some((deadline, _)) if *deadline <= now => self.cancel(),
            _ => None,
        }
    }
}
