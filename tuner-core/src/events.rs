//! Change notifications for renderers.
//!
//! Engines and visibility controllers write events into an [`EventSink`].
//! An [`EventBus`] fans them out to subscribed listeners; a plain
//! `Vec<CarouselEvent>` collects them (handy in tests and for batching).

use std::fmt;

use chrono::{DateTime, Utc};
use tuner_model::ItemId;

use crate::diff::ListDiff;
use crate::paging::PagingState;
use crate::position::ViewIndex;
use crate::visibility::VisibilityState;

/// Identifies which carousel an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisKey {
    /// The vertical channel list.
    ChannelStack,
    /// The horizontal program list.
    ProgramBar,
    /// Any other carousel, named for logs.
    Custom(&'static str),
}

impl fmt::Display for AxisKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisKey::ChannelStack => write!(f, "channel-stack"),
            AxisKey::ProgramBar => write!(f, "program-bar"),
            AxisKey::Custom(name) => write!(f, "{name}"),
        }
    }
}

/// What changed on an axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarouselEventKind {
    /// The browsing cursor moved. The renderer redraws `previous` and
    /// `current` and scrolls to `view_index`.
    FocusChanged {
        /// List index that lost the focus.
        previous: Option<usize>,
        /// List index that gained it.
        current: usize,
        /// View index to scroll to.
        view_index: ViewIndex,
        /// Id of the newly focused item.
        id: ItemId,
    },
    /// The playing item changed.
    CommitChanged {
        /// List index that was playing.
        previous: Option<usize>,
        /// List index now playing.
        current: usize,
        /// View index of the commit cursor.
        view_index: ViewIndex,
        /// Id of the newly committed item.
        id: ItemId,
    },
    /// Focus crossed a paging threshold. `start_at` is the airing time of
    /// the focused item, used to request the adjacent page.
    PagingStateChanged {
        /// New paging state.
        state: PagingState,
        /// Airing time of the focused item; `None` when paging settles.
        start_at: Option<DateTime<Utc>>,
    },
    /// An overlay was shown, started fading out, or is gone.
    VisibilityChanged {
        /// State after the change.
        state: VisibilityState,
        /// A fade-out is in progress; `state` is still the visible state.
        leaving: bool,
        /// The renderer should move input focus into the widget.
        request_focus: bool,
    },
    /// The backing list changed.
    ItemsChanged {
        /// Item count after the change.
        len: usize,
        /// How to update the rendered list.
        diff: ListDiff,
    },
}

impl CarouselEventKind {
    /// Variant name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::FocusChanged { .. } => "FocusChanged",
            Self::CommitChanged { .. } => "CommitChanged",
            Self::PagingStateChanged { .. } => "PagingStateChanged",
            Self::VisibilityChanged { .. } => "VisibilityChanged",
            Self::ItemsChanged { .. } => "ItemsChanged",
        }
    }
}

/// An event tagged with the axis it happened on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselEvent {
    /// Source axis.
    pub axis: AxisKey,
    /// What changed.
    pub kind: CarouselEventKind,
}

impl CarouselEvent {
    /// Tag `kind` with `axis`.
    pub fn new(axis: AxisKey, kind: CarouselEventKind) -> Self {
        Self { axis, kind }
    }
}

/// Destination for carousel events.
pub trait EventSink {
    /// Deliver one event.
    fn emit(&mut self, event: CarouselEvent);
}

impl EventSink for Vec<CarouselEvent> {
    fn emit(&mut self, event: CarouselEvent) {
        self.push(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: CarouselEvent) {
        (**self).emit(event);
    }
}

/// Receives events from an [`EventBus`].
pub trait CarouselListener {
    /// Called for every event, in emission order.
    fn on_event(&mut self, event: &CarouselEvent);
}

impl<F> CarouselListener for F
where
    F: FnMut(&CarouselEvent),
{
    fn on_event(&mut self, event: &CarouselEvent) {
        self(event)
    }
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Fan-out of events to listeners, in subscription order.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(ListenerId, Box<dyn CarouselListener>)>,
    next_id: u64,
    emitted: u64,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .field("emitted", &self.emitted)
            .finish()
    }
}

impl EventBus {
    /// Bus without listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener; it receives events emitted from now on.
    pub fn subscribe(&mut self, listener: impl CarouselListener + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false when the listener was not subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Number of subscribed listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Total number of events emitted through this bus.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}

impl EventSink for EventBus {
    fn emit(&mut self, event: CarouselEvent) {
        self.emitted += 1;
        log::trace!("{} {}", event.axis, event.kind.name());
        for (_, listener) in &mut self.listeners {
            listener.on_event(&event);
        }
    }
}
