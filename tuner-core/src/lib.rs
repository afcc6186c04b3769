//! Dual-cursor carousel navigation for remote-controlled TV guides.
//!
//! Each carousel keeps two cursors over its items: the *focus* (what the
//! user is browsing) and the *commit* (what is playing). [`CarouselEngine`]
//! moves them in response to input and reports every change as a
//! [`CarouselEvent`]; circular axes expose a very large virtual index space
//! so lists appear endless. [`GuideController`] coordinates a channel stack
//! and a program bar with overlay fades, debounced fetches and edge paging.

pub mod axis;
pub mod config;
pub mod constants;
pub mod cursor;
pub mod diff;
pub mod engine;
pub mod error;
pub mod events;
pub mod guide;
pub mod paging;
pub mod position;
pub mod timer;
pub mod visibility;

pub use axis::{
    AxisConfig, CarouselAxisState, CommitMove, CommitOutcome, CommitTarget, Direction,
    FocusMove, InitialFocus, ItemView,
};
pub use config::RuntimeConfig;
pub use cursor::{CarouselCursorState, Cursor};
pub use diff::{DiffOp, ListDiff};
pub use engine::{CarouselEngine, FocusOutcome, NavCommand};
pub use error::{NavError, Result};
pub use events::{
    AxisKey, CarouselEvent, CarouselEventKind, CarouselListener, EventBus, EventSink,
    ListenerId,
};
pub use guide::{FetchTicket, GuideController, GuideEffect, RemoteKey};
pub use paging::{PagingConfig, PagingState};
pub use position::{PositionMapper, ViewIndex, WrapMode};
pub use timer::DeferredTimer;
pub use visibility::{FadeTimings, VisibilityChange, VisibilityController, VisibilityState};

pub use tuner_model;
