//! Guide overlay coordination.
//!
//! `GuideController` ties a channel stack and a program bar together: remote
//! keys are routed to the right carousel, program fetches are debounced and
//! tagged with tickets so stale responses can be dropped, and the overlay
//! hides itself after a period without input.
//!
//! The controller performs no I/O. Fetches leave as [`GuideEffect`]s and come
//! back through [`GuideController::programs_loaded`] and
//! [`GuideController::program_page_loaded`]. Time only advances through the
//! `now` arguments, so callers drive [`GuideController::tick`] from their own
//! loop.

use std::fmt;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use tuner_model::{CarouselItem, Channel, ItemId, Program};

use crate::axis::{AxisConfig, CommitOutcome, CommitTarget, Direction};
use crate::config::RuntimeConfig;
use crate::engine::CarouselEngine;
use crate::error::NavError;
use crate::events::{AxisKey, EventBus};
use crate::paging::PagingState;
use crate::timer::DeferredTimer;
use crate::visibility::{VisibilityController, VisibilityState};

/// Keys of a TV remote the guide reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteKey {
    /// D-pad up: browse to the next channel.
    Up,
    /// D-pad down: reveal the overlay, then browse to the previous channel.
    Down,
    /// D-pad left: earlier program.
    Left,
    /// D-pad right: later program.
    Right,
    /// CH+: zap to the next channel.
    ChannelUp,
    /// CH-: zap to the previous channel.
    ChannelDown,
    /// OK: play the focused program and channel.
    Select,
    /// Hide the overlay.
    Back,
}

impl RemoteKey {
    /// Stable name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            RemoteKey::Up => "Up",
            RemoteKey::Down => "Down",
            RemoteKey::Left => "Left",
            RemoteKey::Right => "Right",
            RemoteKey::ChannelUp => "ChannelUp",
            RemoteKey::ChannelDown => "ChannelDown",
            RemoteKey::Select => "Select",
            RemoteKey::Back => "Back",
        }
    }
}

/// Correlates a fetch request with its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FetchTicket(u64);

impl fmt::Display for FetchTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Work the caller has to carry out on behalf of the guide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuideEffect {
    /// Load the program list of `channel`; answer with
    /// [`GuideController::programs_loaded`].
    FetchPrograms {
        /// Hand back with the response.
        ticket: FetchTicket,
        /// Channel whose programs to load.
        channel: ItemId,
    },
    /// Load the page before (`PagingStart`) or after (`PagingEnd`) the
    /// programs shown for `channel`. `anchor` is the start time of the
    /// focused program. Answer with [`GuideController::program_page_loaded`].
    FetchProgramPage {
        /// Hand back with the response.
        ticket: FetchTicket,
        /// Channel whose programs are shown.
        channel: ItemId,
        /// Which edge to extend.
        state: PagingState,
        /// Start time of the focused program.
        anchor: Option<DateTime<Utc>>,
    },
}

impl GuideEffect {
    /// Ticket of either request kind.
    pub fn ticket(&self) -> FetchTicket {
        match self {
            GuideEffect::FetchPrograms { ticket, .. }
            | GuideEffect::FetchProgramPage { ticket, .. } => *ticket,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingFetch {
    channel: ItemId,
    /// Keep the program bar on the committed program across the reload.
    authoritative: bool,
    /// The playing channel changed; reveal the overlay once loaded.
    channel_changed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct InFlight {
    ticket: FetchTicket,
    channel: ItemId,
    channel_changed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PageRequest {
    ticket: FetchTicket,
    channel: ItemId,
    state: PagingState,
}

/// Channel stack and program bar driven by remote keys.
#[derive(Debug)]
pub struct GuideController {
    config: RuntimeConfig,
    channels: CarouselEngine<Channel>,
    programs: CarouselEngine<Program>,
    channel_stack: VisibilityController,
    program_bar: VisibilityController,
    auto_hide: DeferredTimer<()>,
    program_fetch: DeferredTimer<PendingFetch>,
    bus: EventBus,
    next_ticket: u64,
    in_flight: Option<InFlight>,
    page_request: Option<PageRequest>,
    /// Channel whose programs the bar currently shows.
    programs_channel: Option<ItemId>,
}

impl GuideController {
    /// Guide with no channels loaded and both widgets gone.
    pub fn new(config: RuntimeConfig) -> Self {
        let timings = config.fade_timings();
        let program_axis =
            AxisConfig::program_bar().with_paging_threshold(config.paging_trigger_threshold());
        Self {
            channels: CarouselEngine::new(AxisKey::ChannelStack, AxisConfig::channel_stack()),
            programs: CarouselEngine::new(AxisKey::ProgramBar, program_axis),
            channel_stack: VisibilityController::new(AxisKey::ChannelStack, timings),
            program_bar: VisibilityController::with_hint(AxisKey::ProgramBar, timings),
            auto_hide: DeferredTimer::new("auto-hide"),
            program_fetch: DeferredTimer::new("program-fetch"),
            bus: EventBus::new(),
            next_ticket: 0,
            in_flight: None,
            page_request: None,
            programs_channel: None,
            config,
        }
    }

    /// Settings the guide was built with.
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// The channel stack carousel.
    pub fn channels(&self) -> &CarouselEngine<Channel> {
        &self.channels
    }

    /// The program bar carousel.
    pub fn programs(&self) -> &CarouselEngine<Program> {
        &self.programs
    }

    /// Visibility of the channel stack.
    pub fn channel_stack(&self) -> &VisibilityController {
        &self.channel_stack
    }

    /// Visibility of the program bar.
    pub fn program_bar(&self) -> &VisibilityController {
        &self.program_bar
    }

    /// Bus carrying every carousel and visibility event.
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Subscribe renderers here.
    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    /// Channel whose programs the bar shows.
    pub fn programs_channel(&self) -> Option<&ItemId> {
        self.programs_channel.as_ref()
    }

    /// Whether a program list fetch is outstanding.
    pub fn is_awaiting_programs(&self) -> bool {
        self.in_flight.is_some() || self.program_fetch.is_pending()
    }

    /// Earliest instant at which `tick` has something to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.auto_hide.deadline(),
            self.program_fetch.deadline(),
            self.channel_stack.hide_deadline(),
            self.program_bar.hide_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Load the channel list and request programs for the playing channel.
    pub fn set_channels(&mut self, channels: Vec<Channel>) -> Vec<GuideEffect> {
        self.program_fetch.cancel();
        self.channels.setup(channels, &mut self.bus);
        let Some(playing) = self.channels.committed_item().map(|c| c.id().clone()) else {
            warn!("no channels to show");
            return Vec::new();
        };
        vec![self.issue_fetch(PendingFetch {
            channel: playing,
            authoritative: true,
            channel_changed: false,
        })]
    }

    /// Route a remote key. Returns the effects it produced right away;
    /// deferred work surfaces from [`GuideController::tick`].
    pub fn handle_key(&mut self, key: RemoteKey, now: Instant) -> Vec<GuideEffect> {
        debug!("key {}", key.name());
        self.rearm_auto_hide(now);
        let mut effects = Vec::new();
        match key {
            RemoteKey::Up => {
                if self.channel_stack.is_fully_visible() {
                    self.focus_channel(Direction::Forward, now);
                }
            }
            RemoteKey::Down => {
                if self.channel_stack.is_fully_visible() {
                    self.focus_channel(Direction::Backward, now);
                } else {
                    self.show_overlay(false, now);
                }
            }
            RemoteKey::Left => effects.extend(self.focus_program(Direction::Backward)),
            RemoteKey::Right => effects.extend(self.focus_program(Direction::Forward)),
            RemoteKey::ChannelUp => self.step_channel(Direction::Forward, now),
            RemoteKey::ChannelDown => self.step_channel(Direction::Backward, now),
            RemoteKey::Select => self.select(now),
            RemoteKey::Back => self.hide_overlay(now),
        }
        effects
    }

    /// Advance timers and fades to `now`.
    pub fn tick(&mut self, now: Instant) -> Vec<GuideEffect> {
        let mut effects = Vec::new();

        if self.auto_hide.poll(now).is_some() {
            info!("auto-hiding guide");
            self.hide_overlay(now);
        }

        self.program_bar.poll(now, &mut self.bus);
        if let Some(change) = self.channel_stack.poll(now, &mut self.bus)
            && change.state == VisibilityState::Gone
        {
            effects.extend(self.restore());
        }

        if let Some(fetch) = self.program_fetch.poll(now) {
            effects.push(self.issue_fetch(fetch));
        }
        effects
    }

    /// Deliver the response to a `FetchPrograms` effect.
    ///
    /// Returns false (and changes nothing) when the response does not match
    /// the outstanding request.
    pub fn programs_loaded(
        &mut self,
        ticket: FetchTicket,
        channel: &ItemId,
        programs: Vec<Program>,
        now: Instant,
    ) -> bool {
        let in_flight = match self.in_flight.take() {
            Some(in_flight) if in_flight.ticket == ticket && in_flight.channel == *channel => {
                in_flight
            }
            other => {
                warn!("dropping stale programs {ticket} for {channel}");
                self.in_flight = other;
                return false;
            }
        };

        self.page_request = None;
        self.programs.setup(programs, &mut self.bus);
        self.programs_channel = Some(in_flight.channel);

        if in_flight.channel_changed && !self.channel_stack.is_fully_visible() {
            self.show_overlay(true, now);
        }
        true
    }

    /// Deliver the response to a `FetchProgramPage` effect.
    pub fn program_page_loaded(
        &mut self,
        ticket: FetchTicket,
        channel: &ItemId,
        programs: Vec<Program>,
    ) -> bool {
        let request = match self.page_request.take() {
            Some(request) if request.ticket == ticket && request.channel == *channel => request,
            other => {
                warn!("dropping stale program page {ticket} for {channel}");
                self.page_request = other;
                return false;
            }
        };
        self.programs
            .merge_page(programs, request.state, &mut self.bus);
        true
    }

    /// Reveal the overlay: the program bar first (hint unless `direct`), and
    /// the channel stack once the bar is fully visible.
    pub fn show_overlay(&mut self, direct: bool, now: Instant) {
        if direct {
            self.program_bar.show_direct(&mut self.bus);
        } else {
            self.program_bar.show(&mut self.bus);
        }
        if self.program_bar.is_fully_visible() {
            self.channel_stack.show(&mut self.bus);
            self.rearm_auto_hide(now);
        }
    }

    /// Fade both widgets out. Browsing state is restored once the channel
    /// stack is gone.
    pub fn hide_overlay(&mut self, now: Instant) {
        self.auto_hide.cancel();
        self.program_bar.hide(now, &mut self.bus);
        self.channel_stack.hide(now, &mut self.bus);
    }

    fn rearm_auto_hide(&mut self, now: Instant) {
        self.auto_hide.schedule(now, self.config.auto_hide(), ());
    }

    fn focus_channel(&mut self, direction: Direction, now: Instant) {
        match self.channels.move_focus(direction, &mut self.bus) {
            Ok(_) => {
                if let Some(channel) = self.channels.focused_item().map(|c| c.id().clone()) {
                    let fetch = PendingFetch {
                        channel,
                        authoritative: self.channels.is_committed_focused(),
                        channel_changed: false,
                    };
                    self.schedule_fetch(fetch, self.config.program_fetch_debounce(), now);
                }
            }
            Err(err) => log_rejection("channel focus", &err),
        }
    }

    fn step_channel(&mut self, direction: Direction, now: Instant) {
        match self.channels.step_commit(direction, &mut self.bus) {
            Ok(_) => {
                if let Some(channel) = self.channels.committed_item().map(|c| c.id().clone()) {
                    let fetch = PendingFetch {
                        channel,
                        authoritative: true,
                        channel_changed: true,
                    };
                    self.schedule_fetch(fetch, self.config.playing_change_fetch_delay(), now);
                }
            }
            Err(err) => log_rejection("channel step", &err),
        }
    }

    fn focus_program(&mut self, direction: Direction) -> Option<GuideEffect> {
        let outcome = match self.programs.move_focus(direction, &mut self.bus) {
            Ok(outcome) => outcome,
            Err(err) => {
                log_rejection("program focus", &err);
                return None;
            }
        };
        let state = outcome.paging.filter(|state| *state != PagingState::None)?;
        let channel = self.programs_channel.clone()?;
        let ticket = self.take_ticket();
        let anchor = self.programs.focused_item().and_then(|p| p.start_at());
        self.page_request = Some(PageRequest {
            ticket,
            channel: channel.clone(),
            state,
        });
        Some(GuideEffect::FetchProgramPage {
            ticket,
            channel,
            state,
            anchor,
        })
    }

    fn select(&mut self, now: Instant) {
        if !self.program_bar.is_fully_visible() {
            self.show_overlay(false, now);
            return;
        }
        match self.programs.commit(CommitTarget::Focus, &mut self.bus) {
            Ok(CommitOutcome::Changed { .. }) => {
                if let Some(program) = self.programs.committed_item() {
                    info!("selected program {}", program.id());
                }
                if let Err(err) = self.channels.commit(CommitTarget::Focus, &mut self.bus) {
                    log_rejection("channel select", &err);
                }
            }
            Ok(CommitOutcome::Unchanged) => {}
            Err(err) => log_rejection("program select", &err),
        }
    }

    /// Return to the playing channel and program after the overlay hid.
    fn restore(&mut self) -> Option<GuideEffect> {
        self.channels.reset(false, &mut self.bus);
        self.programs.reset(true, &mut self.bus);
        let playing = self.channels.committed_item()?.id().clone();
        Some(self.issue_fetch(PendingFetch {
            channel: playing,
            authoritative: true,
            channel_changed: false,
        }))
    }

    fn schedule_fetch(&mut self, fetch: PendingFetch, delay: Duration, now: Instant) {
        debug!("program fetch for {} in {:?}", fetch.channel, delay);
        self.program_fetch.schedule(now, delay, fetch);
    }

    fn issue_fetch(&mut self, fetch: PendingFetch) -> GuideEffect {
        self.program_fetch.cancel();
        self.programs.reset(fetch.authoritative, &mut self.bus);
        let ticket = self.take_ticket();
        info!("fetching programs {ticket} for {}", fetch.channel);
        self.in_flight = Some(InFlight {
            ticket,
            channel: fetch.channel.clone(),
            channel_changed: fetch.channel_changed,
        });
        GuideEffect::FetchPrograms {
            ticket,
            channel: fetch.channel,
        }
    }

    fn take_ticket(&mut self) -> FetchTicket {
        self.next_ticket += 1;
        FetchTicket(self.next_ticket)
    }
}

impl Default for GuideController {
    fn default() -> Self {
        Self::new(RuntimeConfig::default())
    }
}

fn log_rejection(what: &str, err: &NavError) {
    if err.is_benign() {
        debug!("{what} ignored: {err}");
    } else {
        warn!("{what} failed: {err}");
    }
}
