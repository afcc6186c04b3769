//! Event-emitting wrapper around a single carousel axis.
//!
//! Every successful state change produces exactly one event per changed
//! concern. Rejected operations leave the state untouched and emit nothing.

use log::{debug, info};
use tuner_model::{CarouselItem, ItemId};

use crate::axis::{
    AxisConfig, CarouselAxisState, CommitOutcome, CommitTarget, Direction, FocusMove, ItemView,
};
use crate::diff::ListDiff;
use crate::error::{NavError, Result};
use crate::events::{AxisKey, CarouselEvent, CarouselEventKind, EventSink};
use crate::paging::PagingState;
use crate::position::ViewIndex;

/// Input commands understood by a single carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavCommand {
    /// Focus the next item.
    FocusUp,
    /// Focus the previous item.
    FocusDown,
    /// Commit the next item; the focus follows.
    CommitUp,
    /// Commit the previous item; the focus follows.
    CommitDown,
    /// Same as `FocusUp`, for horizontal axes.
    MoveNext,
    /// Same as `FocusDown`, for horizontal axes.
    MovePrev,
    /// Commit the focused item.
    Select,
}

impl NavCommand {
    /// Stable name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            NavCommand::FocusUp => "FocusUp",
            NavCommand::FocusDown => "FocusDown",
            NavCommand::CommitUp => "CommitUp",
            NavCommand::CommitDown => "CommitDown",
            NavCommand::MoveNext => "MoveNext",
            NavCommand::MovePrev => "MovePrev",
            NavCommand::Select => "Select",
        }
    }
}

/// Result of a successful focus move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusOutcome {
    /// The cursor move.
    pub moved: FocusMove,
    /// New paging state when the move crossed a threshold.
    pub paging: Option<PagingState>,
}

/// A carousel axis plus the key its events are tagged with.
#[derive(Debug, Clone)]
pub struct CarouselEngine<T> {
    key: AxisKey,
    axis: CarouselAxisState<T>,
}

impl<T: CarouselItem> CarouselEngine<T> {
    /// Empty engine tagging its events with `key`.
    pub fn new(key: AxisKey, config: AxisConfig) -> Self {
        Self {
            key,
            axis: CarouselAxisState::new(config),
        }
    }

    /// Axis tag on emitted events.
    pub fn key(&self) -> AxisKey {
        self.key
    }

    /// Underlying axis state.
    pub fn axis(&self) -> &CarouselAxisState<T> {
        &self.axis
    }

    /// Items in stored order.
    pub fn items(&self) -> &[T] {
        self.axis.items()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.axis.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.axis.is_empty()
    }

    /// Number of scroll positions the renderer should lay out.
    pub fn virtual_item_count(&self) -> i64 {
        self.axis.mapper().virtual_item_count()
    }

    /// List index of the focused item.
    pub fn focus_index(&self) -> Option<usize> {
        self.axis.focus_index()
    }

    /// List index of the committed item.
    pub fn commit_index(&self) -> Option<usize> {
        self.axis.commit_index()
    }

    /// View index of the focus cursor.
    pub fn focus_view_index(&self) -> Option<ViewIndex> {
        self.axis.cursors().focus.current()
    }

    /// View index of the commit cursor.
    pub fn commit_view_index(&self) -> Option<ViewIndex> {
        self.axis.cursors().commit.current()
    }

    /// The focused item.
    pub fn focused_item(&self) -> Option<&T> {
        self.axis.focused_item()
    }

    /// The committed item.
    pub fn committed_item(&self) -> Option<&T> {
        self.axis.committed_item()
    }

    /// Item and flags shown at a view index.
    pub fn item_at_view(&self, view: ViewIndex) -> Option<ItemView<'_, T>> {
        self.axis.item_at_view(view)
    }

    /// True when the focused item is the committed one.
    pub fn is_committed_focused(&self) -> bool {
        self.axis.is_committed_focused()
    }

    /// Current edge-paging state.
    pub fn paging_state(&self) -> PagingState {
        self.axis.paging_state()
    }

    /// Whether a commit changed since the last setup.
    pub fn has_committed_since_setup(&self) -> bool {
        self.axis.has_committed_since_setup()
    }

    /// Replace the list wholesale and seed both cursors.
    ///
    /// Emits `ItemsChanged`, `PagingStateChanged` back to `None` if a page
    /// was pending, then `FocusChanged` and `CommitChanged` for the seeded
    /// item when the list is non-empty.
    pub fn setup(&mut self, items: Vec<T>, sink: &mut impl EventSink) -> Option<ViewIndex> {
        let paging = self.axis.paging_state();
        let seeded = self.axis.setup(items);
        info!("{} setup with {} items", self.key, self.axis.len());
        self.emit(
            CarouselEventKind::ItemsChanged {
                len: self.axis.len(),
                diff: ListDiff::Reload,
            },
            sink,
        );
        self.emit_paging_cleared(paging, sink);

        let view_index = seeded?;
        let current = self.axis.focus_index()?;
        let id = self.id_at(current)?;
        self.emit(
            CarouselEventKind::FocusChanged {
                previous: None,
                current,
                view_index,
                id: id.clone(),
            },
            sink,
        );
        self.emit(
            CarouselEventKind::CommitChanged {
                previous: None,
                current,
                view_index,
                id,
            },
            sink,
        );
        Some(view_index)
    }

    /// Move the focus one step, then evaluate edge paging.
    pub fn move_focus(
        &mut self,
        direction: Direction,
        sink: &mut impl EventSink,
    ) -> Result<FocusOutcome> {
        let moved = self.axis.move_focus(direction)?;
        debug!(
            "{} focus {:?} -> {} (view {})",
            self.key, moved.previous, moved.current, moved.view_index
        );
        self.emit_focus(moved, sink);

        let paging = self.axis.config().paging.and_then(|config| {
            config.evaluate(
                self.axis.paging_state(),
                direction,
                moved.current,
                self.axis.len(),
            )
        });
        if let Some(state) = paging {
            self.axis.set_paging_state(state);
            info!("{} paging state -> {}", self.key, state);
            let start_at = self.axis.focused_item().and_then(|item| item.start_at());
            self.emit(CarouselEventKind::PagingStateChanged { state, start_at }, sink);
        }
        Ok(FocusOutcome { moved, paging })
    }

    /// Commit the focused item or jump to a list index.
    pub fn commit(
        &mut self,
        target: CommitTarget,
        sink: &mut impl EventSink,
    ) -> Result<CommitOutcome> {
        let outcome = self.axis.commit(target)?;
        self.emit_commit(outcome, sink);
        Ok(outcome)
    }

    /// Step the committed item by one; the focus follows.
    pub fn step_commit(
        &mut self,
        direction: Direction,
        sink: &mut impl EventSink,
    ) -> Result<CommitOutcome> {
        let outcome = self.axis.step_commit(direction)?;
        self.emit_commit(outcome, sink);
        Ok(outcome)
    }

    /// Collapse focus onto the commit cursor.
    pub fn reset(
        &mut self,
        commit_authoritative: bool,
        sink: &mut impl EventSink,
    ) -> Option<FocusMove> {
        let moved = self.axis.reset(commit_authoritative);
        debug!(
            "{} reset (authoritative: {commit_authoritative})",
            self.key
        );
        if let Some(moved) = moved {
            self.emit_focus(moved, sink);
        }
        moved
    }

    /// Merge a page at the edge named by `state`, or replace the list when
    /// `state` is `PagingState::None`.
    pub fn merge_page(
        &mut self,
        items: Vec<T>,
        state: PagingState,
        sink: &mut impl EventSink,
    ) -> ListDiff {
        let added = items.len();
        let paging = self.axis.paging_state();
        let diff = self.axis.merge_page(items, state);
        info!(
            "{} merged {added} items ({state}), now {}",
            self.key,
            self.axis.len()
        );
        self.emit(
            CarouselEventKind::ItemsChanged {
                len: self.axis.len(),
                diff: diff.clone(),
            },
            sink,
        );
        self.emit_paging_cleared(paging, sink);
        diff
    }

    /// Merge a later page. Fails on axes without paging.
    pub fn append_page(&mut self, items: Vec<T>, sink: &mut impl EventSink) -> Result<ListDiff> {
        self.ensure_paging()?;
        Ok(self.merge_page(items, PagingState::PagingEnd, sink))
    }

    /// Merge an earlier page. Fails on axes without paging.
    pub fn prepend_page(&mut self, items: Vec<T>, sink: &mut impl EventSink) -> Result<ListDiff> {
        self.ensure_paging()?;
        Ok(self.merge_page(items, PagingState::PagingStart, sink))
    }

    /// Dispatch a command. Commands that don't apply are rejected with
    /// `NavError::IllegalMove`.
    pub fn handle(&mut self, command: NavCommand, sink: &mut impl EventSink) -> Result<()> {
        debug!("{} <- {}", self.key, command.name());
        match command {
            NavCommand::FocusUp | NavCommand::MoveNext => {
                self.move_focus(Direction::Forward, sink).map(drop)
            }
            NavCommand::FocusDown | NavCommand::MovePrev => {
                self.move_focus(Direction::Backward, sink).map(drop)
            }
            NavCommand::CommitUp => self.step_commit(Direction::Forward, sink).map(drop),
            NavCommand::CommitDown => self.step_commit(Direction::Backward, sink).map(drop),
            NavCommand::Select => self.commit(CommitTarget::Focus, sink).map(drop),
        }
    }

    fn ensure_paging(&self) -> Result<()> {
        match self.axis.config().paging {
            Some(_) => Ok(()),
            None => Err(NavError::PagingDisabled),
        }
    }

    fn id_at(&self, list_index: usize) -> Option<ItemId> {
        self.axis.items().get(list_index).map(|item| item.id().clone())
    }

    fn emit_focus(&self, moved: FocusMove, sink: &mut impl EventSink) {
        if let Some(id) = self.id_at(moved.current) {
            self.emit(
                CarouselEventKind::FocusChanged {
                    previous: moved.previous,
                    current: moved.current,
                    view_index: moved.view_index,
                    id,
                },
                sink,
            );
        }
    }

    fn emit_commit(&self, outcome: CommitOutcome, sink: &mut impl EventSink) {
        let CommitOutcome::Changed { commit, focus } = outcome else {
            return;
        };
        info!(
            "{} commit {:?} -> {}",
            self.key, commit.previous, commit.current
        );
        if let Some(id) = self.id_at(commit.current) {
            self.emit(
                CarouselEventKind::CommitChanged {
                    previous: commit.previous,
                    current: commit.current,
                    view_index: commit.view_index,
                    id,
                },
                sink,
            );
        }
        if let Some(moved) = focus {
            self.emit_focus(moved, sink);
        }
    }

    /// The list was replaced or grown, so a pending page request is settled.
    fn emit_paging_cleared(&self, before: PagingState, sink: &mut impl EventSink) {
        if before == PagingState::None {
            return;
        }
        info!("{} paging state -> {}", self.key, PagingState::None);
        self.emit(
            CarouselEventKind::PagingStateChanged {
                state: PagingState::None,
                start_at: None,
            },
            sink,
        );
    }

    fn emit(&self, kind: CarouselEventKind, sink: &mut impl EventSink) {
        sink.emit(CarouselEvent::new(self.key, kind));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tuner_model::Channel;

    fn engine(n: usize) -> CarouselEngine<Channel> {
        let mut engine = CarouselEngine::new(AxisKey::Custom("test"), AxisConfig::circular());
        let items = (0..n)
            .map(|i| Channel::new(format!("id-{i}"), i as u32).playing(i == 0))
            .collect();
        engine.setup(items, &mut Vec::<CarouselEvent>::new());
        engine
    }

    fn names(events: &[CarouselEvent]) -> Vec<&'static str> {
        events.iter().map(|e| e.kind.name()).collect()
    }

    #[test]
    fn setup_announces_items_and_cursors() {
        let mut sink: Vec<CarouselEvent> = Vec::new();
        let mut engine = CarouselEngine::new(AxisKey::Custom("test"), AxisConfig::circular());
        engine.setup(
            vec![Channel::new("a", 1), Channel::new("b", 2).playing(true)],
            &mut sink,
        );
        assert_eq!(
            names(&sink),
            ["ItemsChanged", "FocusChanged", "CommitChanged"]
        );
        assert_eq!(engine.commit_index(), Some(1));
    }

    #[test]
    fn empty_setup_only_announces_items() {
        let mut sink: Vec<CarouselEvent> = Vec::new();
        let mut engine: CarouselEngine<Channel> =
            CarouselEngine::new(AxisKey::Custom("test"), AxisConfig::linear());
        assert_eq!(engine.setup(Vec::new(), &mut sink), None);
        assert_eq!(names(&sink), ["ItemsChanged"]);
        assert_eq!(engine.virtual_item_count(), 0);
    }

    #[test]
    fn unchanged_commit_is_silent() {
        let mut sink: Vec<CarouselEvent> = Vec::new();
        let mut engine = engine(5);
        let outcome = engine.commit(CommitTarget::Focus, &mut sink).unwrap();
        assert_eq!(outcome, CommitOutcome::Unchanged);
        assert!(sink.is_empty());
    }

    #[test]
    fn commit_up_emits_commit_then_focus() {
        let mut sink: Vec<CarouselEvent> = Vec::new();
        let mut engine = engine(5);
        engine.handle(NavCommand::FocusDown, &mut sink).unwrap();
        sink.clear();

        engine.handle(NavCommand::CommitUp, &mut sink).unwrap();
        assert_eq!(names(&sink), ["CommitChanged", "FocusChanged"]);
        assert_eq!(engine.commit_index(), Some(1));
        assert_eq!(engine.focus_index(), Some(1));
    }

    #[test]
    fn rejected_move_emits_nothing() {
        let mut sink: Vec<CarouselEvent> = Vec::new();
        let mut engine: CarouselEngine<Channel> =
            CarouselEngine::new(AxisKey::Custom("test"), AxisConfig::linear());
        engine.setup(vec![Channel::new("only", 1)], &mut Vec::<CarouselEvent>::new());
        let err = engine.handle(NavCommand::MoveNext, &mut sink).unwrap_err();
        assert!(err.is_benign());
        assert!(sink.is_empty());
    }

    #[test]
    fn paging_requires_paging_axis() {
        let mut engine = engine(3);
        assert_eq!(
            engine.append_page(Vec::new(), &mut Vec::<CarouselEvent>::new()),
            Err(NavError::PagingDisabled)
        );
    }
}
