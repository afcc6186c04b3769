//! Guide plus fake data source, with simulated response latency.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::{Duration, Instant};

use tuner_core::{
    CarouselEvent, CarouselEventKind, GuideController, GuideEffect, PagingState, RemoteKey,
    RuntimeConfig,
};
use tuner_model::CarouselItem;

use crate::source::FakeSource;

/// Number of event lines kept for display.
const LOG_CAPACITY: usize = 200;

/// A fetch the fake source answers once `due` passes.
#[derive(Debug)]
struct PendingResponse {
    due: Instant,
    effect: GuideEffect,
}

/// The guide wired to a fake source that answers fetches after `latency`.
#[derive(Debug)]
pub struct App {
    guide: GuideController,
    source: FakeSource,
    latency: Duration,
    pending: Vec<PendingResponse>,
    events: Rc<RefCell<VecDeque<String>>>,
    dropped: usize,
}

impl App {
    pub fn new(config: RuntimeConfig, source: FakeSource, latency: Duration, now: Instant) -> Self {
        let mut guide = GuideController::new(config);
        let events = Rc::new(RefCell::new(VecDeque::new()));
        let sink = Rc::clone(&events);
        guide.bus_mut().subscribe(move |event: &CarouselEvent| {
            let mut lines = sink.borrow_mut();
            if lines.len() == LOG_CAPACITY {
                lines.pop_front();
            }
            lines.push_back(describe(event));
        });

        let mut app = Self {
            guide,
            source,
            latency,
            pending: Vec::new(),
            events,
            dropped: 0,
        };
        let channels = app.source.channels();
        let effects = app.guide.set_channels(channels);
        app.enqueue(effects, now);
        app
    }

    pub fn guide(&self) -> &GuideController {
        &self.guide
    }

    pub fn source(&self) -> &FakeSource {
        &self.source
    }

    /// Responses discarded by the guide as stale.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn pending_fetches(&self) -> usize {
        self.pending.len()
    }

    /// Feed a remote key to the guide and queue the fetches it asks for.
    pub fn press(&mut self, key: RemoteKey, now: Instant) {
        let effects = self.guide.handle_key(key, now);
        self.enqueue(effects, now);
        self.step(now);
    }

    /// Run timers and deliver due responses.
    pub fn step(&mut self, now: Instant) {
        let effects = self.guide.tick(now);
        self.enqueue(effects, now);
        self.deliver(now);
    }

    /// Earliest instant at which `step` has work.
    pub fn next_deadline(&self) -> Option<Instant> {
        let response = self.pending.iter().map(|p| p.due).min();
        [self.guide.next_deadline(), response]
            .into_iter()
            .flatten()
            .min()
    }

    /// Step through every deadline up to and including `until`.
    pub fn advance(&mut self, mut now: Instant, until: Instant) -> Instant {
        while let Some(next) = self.next_deadline().filter(|next| *next <= until) {
            now = next.max(now);
            self.step(now);
        }
        self.step(until);
        until
    }

    /// Take the event lines recorded since the last call.
    pub fn drain_events(&self) -> Vec<String> {
        self.events.borrow_mut().drain(..).collect()
    }

    /// Most recent event lines, oldest first, without consuming them.
    pub fn recent_events(&self, count: usize) -> Vec<String> {
        let lines = self.events.borrow();
        let skip = lines.len().saturating_sub(count);
        lines.iter().skip(skip).cloned().collect()
    }

    fn enqueue(&mut self, effects: Vec<GuideEffect>, now: Instant) {
        for effect in effects {
            log::debug!("fake source got {effect:?}");
            self.pending.push(PendingResponse {
                due: now + self.latency,
                effect,
            });
        }
    }

    fn deliver(&mut self, now: Instant) {
        let (due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.due <= now);
        self.pending = waiting;

        for response in due {
            let accepted = match response.effect {
                GuideEffect::FetchPrograms { ticket, channel } => {
                    let programs = self.source.programs(&channel);
                    self.guide.programs_loaded(ticket, &channel, programs, now)
                }
                GuideEffect::FetchProgramPage {
                    ticket,
                    channel,
                    state,
                    ..
                } => {
                    let edge = self.page_edge(state);
                    let programs = match edge {
                        Some(edge) => self.source.page(&channel, state, edge),
                        None => Vec::new(),
                    };
                    self.guide.program_page_loaded(ticket, &channel, programs)
                }
            };
            if !accepted {
                self.dropped += 1;
            }
        }
    }

    /// Boundary time of the loaded programs on the side being paged.
    fn page_edge(&self, state: PagingState) -> Option<chrono::DateTime<chrono::Utc>> {
        let items = self.guide.programs().items();
        match state {
            PagingState::PagingStart => items.first().and_then(|p| p.start_at()),
            PagingState::PagingEnd => items.last().and_then(|p| p.end_at()),
            PagingState::None => None,
        }
    }
}

/// One-line rendering of an event for the log pane.
pub fn describe(event: &CarouselEvent) -> String {
    let detail = match &event.kind {
        CarouselEventKind::FocusChanged {
            previous,
            current,
            id,
            ..
        }
        | CarouselEventKind::CommitChanged {
            previous,
            current,
            id,
            ..
        } => match previous {
            Some(previous) => format!("{previous} -> {current} ({id})"),
            None => format!("-> {current} ({id})"),
        },
        CarouselEventKind::PagingStateChanged { state, start_at } => match start_at {
            Some(at) => format!("{state} at {}", at.format("%H:%M")),
            None => state.to_string(),
        },
        CarouselEventKind::VisibilityChanged {
            state,
            leaving,
            request_focus,
        } => {
            let mut text = state.to_string();
            if *leaving {
                text.push_str(" (leaving)");
            }
            if *request_focus {
                text.push_str(" (focus)");
            }
            text
        }
        CarouselEventKind::ItemsChanged { len, diff } => format!("{len} items, {diff:?}"),
    };
    format!("{} {} {}", event.axis, event.kind.name(), detail)
}
