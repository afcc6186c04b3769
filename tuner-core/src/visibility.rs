//! Show/hide state machine for an overlay widget.
//!
//! Fades are modelled as deadlines: `hide` arms a fade-out that completes on
//! the first `poll` at or after the deadline. The controller owns no timer
//! thread; callers pass `now` in.

use std::fmt;
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::constants;
use crate::events::{AxisKey, CarouselEvent, CarouselEventKind, EventSink};

/// How much of an overlay is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum VisibilityState {
    /// Not shown.
    #[default]
    Gone,
    /// Partially revealed peek state (program bar only).
    HintVisible,
    /// Fully shown and focusable.
    Visible,
}

impl fmt::Display for VisibilityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gone => write!(f, "gone"),
            Self::HintVisible => write!(f, "hint"),
            Self::Visible => write!(f, "visible"),
        }
    }
}

/// Fade timings for a visibility controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadeTimings {
    /// Reveal duration.
    pub fade_in: Duration,
    /// Time from `hide` until `Gone`.
    pub fade_out: Duration,
}

impl Default for FadeTimings {
    fn default() -> Self {
        Self {
            fade_in: Duration::from_millis(constants::visibility::FADE_IN_MS),
            fade_out: Duration::from_millis(constants::visibility::FADE_OUT_MS),
        }
    }
}

/// A state change reported by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityChange {
    /// State after the change.
    pub state: VisibilityState,
    /// A fade-out is in progress.
    pub leaving: bool,
    /// The widget should take input focus.
    pub request_focus: bool,
}

/// Show/hide state machine for one overlay widget.
#[derive(Debug, Clone)]
pub struct VisibilityController {
    key: AxisKey,
    supports_hint: bool,
    timings: FadeTimings,
    state: VisibilityState,
    /// Deadline of an in-progress fade-out.
    hide_deadline: Option<Instant>,
}

impl VisibilityController {
    /// Two-state controller (`Gone`/`Visible`), as used by the channel stack.
    pub fn new(key: AxisKey, timings: FadeTimings) -> Self {
        Self {
            key,
            supports_hint: false,
            timings,
            state: VisibilityState::Gone,
            hide_deadline: None,
        }
    }

    /// Controller that peeks with `HintVisible` before becoming visible.
    pub fn with_hint(key: AxisKey, timings: FadeTimings) -> Self {
        Self {
            supports_hint: true,
            ..Self::new(key, timings)
        }
    }

    /// Axis tag on emitted events.
    pub fn key(&self) -> AxisKey {
        self.key
    }

    /// Current state. Stays at the pre-fade state while leaving.
    pub fn state(&self) -> VisibilityState {
        self.state
    }

    /// Fade durations.
    pub fn timings(&self) -> FadeTimings {
        self.timings
    }

    /// Whether `show` passes through `HintVisible`.
    pub fn supports_hint(&self) -> bool {
        self.supports_hint
    }

    /// A fade-out is pending.
    pub fn is_leaving(&self) -> bool {
        self.hide_deadline.is_some()
    }

    /// Shown and not on its way out.
    pub fn is_shown(&self) -> bool {
        self.state != VisibilityState::Gone && !self.is_leaving()
    }

    /// `Visible` and not fading out.
    pub fn is_fully_visible(&self) -> bool {
        self.state == VisibilityState::Visible && !self.is_leaving()
    }

    /// When the current fade-out completes.
    pub fn hide_deadline(&self) -> Option<Instant> {
        self.hide_deadline
    }

    /// Reveal one step: `Gone` goes to the hint state when supported,
    /// anything else to `Visible`. Cancels a pending fade-out.
    pub fn show(&mut self, sink: &mut impl EventSink) -> Option<VisibilityChange> {
        let next = match (self.state, self.supports_hint) {
            _ if self.is_leaving() => VisibilityState::Visible,
            (VisibilityState::Gone, true) => VisibilityState::HintVisible,
            _ => VisibilityState::Visible,
        };
        self.transition(next, sink)
    }

    /// Become `Visible` immediately, skipping the hint state.
    pub fn show_direct(&mut self, sink: &mut impl EventSink) -> Option<VisibilityChange> {
        self.transition(VisibilityState::Visible, sink)
    }

    /// Start fading out; the controller reaches `Gone` on the first poll at
    /// or after `now + fade_out`. Repeated calls keep the first deadline.
    pub fn hide(&mut self, now: Instant, sink: &mut impl EventSink) -> Option<VisibilityChange> {
        if self.state == VisibilityState::Gone || self.is_leaving() {
            return None;
        }
        let deadline = now + self.timings.fade_out;
        self.hide_deadline = Some(deadline);
        debug!("{} fading out ({:?})", self.key, self.timings.fade_out);
        let change = VisibilityChange {
            state: self.state,
            leaving: true,
            request_focus: false,
        };
        self.publish(change, sink);
        Some(change)
    }

    /// Hide when shown, show otherwise.
    pub fn toggle(&mut self, now: Instant, sink: &mut impl EventSink) -> Option<VisibilityChange> {
        if self.is_shown() {
            self.hide(now, sink)
        } else {
            self.show(sink)
        }
    }

    /// Complete a due fade-out.
    pub fn poll(&mut self, now: Instant, sink: &mut impl EventSink) -> Option<VisibilityChange> {
        let deadline = self.hide_deadline?;
        if now < deadline {
            return None;
        }
        self.hide_deadline = None;
        self.state = VisibilityState::Gone;
        info!("{} gone", self.key);
        let change = VisibilityChange {
            state: VisibilityState::Gone,
            leaving: false,
            request_focus: false,
        };
        self.publish(change, sink);
        Some(change)
    }

    fn transition(
        &mut self,
        next: VisibilityState,
        sink: &mut impl EventSink,
    ) -> Option<VisibilityChange> {
        let was_leaving = self.hide_deadline.take().is_some();
        if next == self.state && !was_leaving {
            return None;
        }
        info!("{} {} -> {}", self.key, self.state, next);
        self.state = next;
        let change = VisibilityChange {
            state: next,
            leaving: false,
            request_focus: next == VisibilityState::Visible,
        };
        self.publish(change, sink);
        Some(change)
    }

    fn publish(&self, change: VisibilityChange, sink: &mut impl EventSink) {
        sink.emit(CarouselEvent::new(
            self.key,
            CarouselEventKind::VisibilityChanged {
                state: change.state,
                leaving: change.leaving,
                request_focus: change.request_focus,
            },
        ));
    }
}
