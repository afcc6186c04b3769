//! Per-axis cursor state over a backing item list.
//!
//! `CarouselAxisState` is the pure half of a carousel: it owns the items, the
//! position mapper and the focus/commit cursors, and performs the state
//! transitions. It never emits events; `CarouselEngine` wraps it for that.

use log::debug;
use tuner_model::{CarouselItem, ItemId};

use crate::constants;
use crate::cursor::CarouselCursorState;
use crate::diff::ListDiff;
use crate::error::{NavError, Result};
use crate::paging::{PagingConfig, PagingState};
use crate::position::{PositionMapper, ViewIndex, WrapMode};

/// Direction of a single step along an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards higher view indices.
    Forward,
    /// Towards lower view indices.
    Backward,
}

impl Direction {
    /// Signed step in view-index space.
    pub fn delta(self) -> i64 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// Where the focus starts when a list is set up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialFocus {
    /// On the playing item (list index 0 when nothing plays).
    Committed,
    /// On the middle of the list, unless the commit axis was made
    /// authoritative by the preceding reset.
    Midpoint,
}

/// Static configuration for one carousel axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisConfig {
    /// Whether the axis wraps around.
    pub wrap_mode: WrapMode,
    /// Store items in reverse order (for bottom-up layouts).
    pub reverse_items: bool,
    /// Where the focus starts after `setup`.
    pub initial_focus: InitialFocus,
    /// Edge paging; only meaningful for finite axes.
    pub paging: Option<PagingConfig>,
}

impl AxisConfig {
    /// Vertical, endlessly wrapping channel list laid out bottom-up.
    pub const fn channel_stack() -> Self {
        Self {
            wrap_mode: WrapMode::Infinite,
            reverse_items: true,
            initial_focus: InitialFocus::Committed,
            paging: None,
        }
    }

    /// Horizontal, finite program list with edge paging.
    pub const fn program_bar() -> Self {
        Self {
            wrap_mode: WrapMode::Finite,
            reverse_items: false,
            initial_focus: InitialFocus::Midpoint,
            paging: Some(PagingConfig::new(constants::paging::TRIGGER_THRESHOLD)),
        }
    }

    /// Circular axis without reordering.
    pub const fn circular() -> Self {
        Self {
            wrap_mode: WrapMode::Infinite,
            reverse_items: false,
            initial_focus: InitialFocus::Committed,
            paging: None,
        }
    }

    /// Finite axis anchored on the playing item, without paging.
    pub const fn linear() -> Self {
        Self {
            wrap_mode: WrapMode::Finite,
            reverse_items: false,
            initial_focus: InitialFocus::Committed,
            paging: None,
        }
    }

    /// Enable edge paging with the given threshold.
    pub const fn with_paging_threshold(mut self, trigger_threshold: usize) -> Self {
        self.paging = Some(PagingConfig::new(trigger_threshold));
        self
    }

    /// Disable edge paging.
    pub const fn without_paging(mut self) -> Self {
        self.paging = None;
        self
    }
}

/// What a commit should land on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitTarget {
    /// The currently focused item.
    Focus,
    /// An explicit list index (direct jump); the focus follows.
    ListIndex(usize),
}

/// A completed focus move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusMove {
    /// List index before the move, if any.
    pub previous: Option<usize>,
    /// List index after the move.
    pub current: usize,
    /// View index after the move.
    pub view_index: ViewIndex,
}

/// A completed commit move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitMove {
    /// List index before the move, if any.
    pub previous: Option<usize>,
    /// List index after the move.
    pub current: usize,
    /// View index after the move.
    pub view_index: ViewIndex,
}

/// Result of a commit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The target already was the committed item.
    Unchanged,
    /// The commit moved.
    Changed {
        /// The commit cursor's move.
        commit: CommitMove,
        /// Set when the focus was moved along with the commit.
        focus: Option<FocusMove>,
    },
}

impl CommitOutcome {
    /// Whether the commit moved.
    pub fn is_changed(&self) -> bool {
        matches!(self, CommitOutcome::Changed { .. })
    }
}

/// Read-only view of an item together with its derived UI flags.
#[derive(Debug, Clone, Copy)]
pub struct ItemView<'a, T> {
    /// The item itself.
    pub item: &'a T,
    /// Position in the backing list.
    pub list_index: usize,
    /// Holds the focus cursor.
    pub is_focused: bool,
    /// Holds the commit cursor.
    pub is_committed: bool,
}

/// Cursor state and backing list of a single carousel axis.
#[derive(Debug, Clone)]
pub struct CarouselAxisState<T> {
    config: AxisConfig,
    items: Vec<T>,
    mapper: PositionMapper,
    cursors: CarouselCursorState,
    paging: PagingState,
    has_committed_since_setup: bool,
    commit_authoritative: bool,
}

impl<T: CarouselItem> CarouselAxisState<T> {
    /// Empty axis; call `setup` to load items.
    pub fn new(config: AxisConfig) -> Self {
        Self {
            config,
            items: Vec::new(),
            mapper: PositionMapper::new(config.wrap_mode, 0),
            cursors: CarouselCursorState::new(),
            paging: PagingState::None,
            has_committed_since_setup: false,
            commit_authoritative: false,
        }
    }

    /// Static configuration.
    pub fn config(&self) -> &AxisConfig {
        &self.config
    }

    /// Items in stored order (reversed for `reverse_items` axes).
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// View-to-list index mapping.
    pub fn mapper(&self) -> &PositionMapper {
        &self.mapper
    }

    /// Raw focus and commit cursors.
    pub fn cursors(&self) -> &CarouselCursorState {
        &self.cursors
    }

    /// Current edge-paging state.
    pub fn paging_state(&self) -> PagingState {
        self.paging
    }

    /// Whether a commit changed since the last setup.
    pub fn has_committed_since_setup(&self) -> bool {
        self.has_committed_since_setup
    }

    /// Whether the next setup keeps focus on the committed item.
    pub fn is_commit_authoritative(&self) -> bool {
        self.commit_authoritative
    }

    /// List index of the focused item.
    pub fn focus_index(&self) -> Option<usize> {
        self.cursors.focus_list_index(&self.mapper)
    }

    /// List index of the committed item.
    pub fn commit_index(&self) -> Option<usize> {
        self.cursors.commit_list_index(&self.mapper)
    }

    /// The focused item.
    pub fn focused_item(&self) -> Option<&T> {
        self.focus_index().and_then(|i| self.items.get(i))
    }

    /// The committed item.
    pub fn committed_item(&self) -> Option<&T> {
        self.commit_index().and_then(|i| self.items.get(i))
    }

    /// Whether `list_index` holds the focus.
    pub fn is_focused(&self, list_index: usize) -> bool {
        self.focus_index() == Some(list_index)
    }

    /// Whether `list_index` holds the commit.
    pub fn is_committed(&self, list_index: usize) -> bool {
        self.commit_index() == Some(list_index)
    }

    /// True when the focused item is the committed one.
    pub fn is_committed_focused(&self) -> bool {
        self.cursors.coincide(&self.mapper)
    }

    /// List index of the item with `id`.
    pub fn position_of(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    /// Item and flags shown at a view index.
    pub fn item_at_view(&self, view: ViewIndex) -> Option<ItemView<'_, T>> {
        let list_index = self.mapper.to_list_index(view)?;
        self.item_view(list_index)
    }

    /// Item and flags at a list index.
    pub fn item_view(&self, list_index: usize) -> Option<ItemView<'_, T>> {
        let item = self.items.get(list_index)?;
        Some(ItemView {
            item,
            list_index,
            is_focused: self.is_focused(list_index),
            is_committed: self.is_committed(list_index),
        })
    }

    /// Replace the list and seed both cursors on the initial anchor.
    ///
    /// Returns the seeded view index, or `None` for an empty list.
    pub fn setup(&mut self, mut items: Vec<T>) -> Option<ViewIndex> {
        if self.config.reverse_items {
            items.reverse();
        }
        let previous_commit = self.commit_index();
        self.items = items;
        self.mapper = self.mapper.with_len(self.items.len());
        self.paging = PagingState::None;
        self.has_committed_since_setup = false;
        let authoritative = std::mem::take(&mut self.commit_authoritative);

        if self.items.is_empty() {
            self.cursors.clear();
            return None;
        }

        let playing = self.items.iter().position(|item| item.is_playing());
        let anchor = match self.config.initial_focus {
            InitialFocus::Committed => playing.unwrap_or(0),
            InitialFocus::Midpoint if authoritative => playing
                .or(previous_commit.filter(|i| *i < self.items.len()))
                .unwrap_or(0),
            InitialFocus::Midpoint => self.items.len() / 2,
        };

        let seeded = self.mapper.center_view_index(anchor);
        if let Some(view) = seeded {
            self.cursors.seed(view);
        }
        debug!(
            "axis setup: {} items, anchor {} (authoritative: {})",
            self.items.len(),
            anchor,
            authoritative
        );
        seeded
    }

    /// Move the focus one step.
    ///
    /// Nothing changes when the move is rejected.
    pub fn move_focus(&mut self, direction: Direction) -> Result<FocusMove> {
        let from = self.cursors.focus.current().ok_or(NavError::EmptyList)?;
        let delta = direction.delta();
        let next = from + delta;
        let current = self
            .mapper
            .to_list_index(next)
            .ok_or(NavError::IllegalMove { from, delta })?;
        let previous = self.mapper.to_list_index(from);
        self.cursors.focus.advance_to(next);
        Ok(FocusMove {
            previous,
            current,
            view_index: next,
        })
    }

    /// Commit the focused item or jump to an explicit index.
    pub fn commit(&mut self, target: CommitTarget) -> Result<CommitOutcome> {
        let focus_view = self.cursors.focus.current().ok_or(NavError::EmptyList)?;
        let (target_list, target_view) = match target {
            CommitTarget::Focus => {
                let list = self
                    .mapper
                    .to_list_index(focus_view)
                    .ok_or(NavError::EmptyList)?;
                (list, focus_view)
            }
            CommitTarget::ListIndex(index) => {
                let view = self.mapper.view_index_near(focus_view, index).ok_or(
                    NavError::OutOfRange {
                        index,
                        len: self.items.len(),
                    },
                )?;
                (index, view)
            }
        };

        if self.commit_index() == Some(target_list) {
            return Ok(CommitOutcome::Unchanged);
        }

        let previous = self.commit_index();
        self.cursors.commit.advance_to(target_view);
        self.has_committed_since_setup = true;
        let commit = CommitMove {
            previous,
            current: target_list,
            view_index: target_view,
        };

        let focus = match target {
            CommitTarget::Focus => None,
            CommitTarget::ListIndex(_) => self.follow_commit(),
        };
        Ok(CommitOutcome::Changed { commit, focus })
    }

    /// Step the committed item directly (channel up/down); the focus is
    /// forced onto the new commit.
    pub fn step_commit(&mut self, direction: Direction) -> Result<CommitOutcome> {
        let from = self.cursors.commit.current().ok_or(NavError::EmptyList)?;
        let delta = direction.delta();
        let next = from + delta;
        let current = self
            .mapper
            .to_list_index(next)
            .ok_or(NavError::IllegalMove { from, delta })?;
        let previous = self.mapper.to_list_index(from);
        self.cursors.commit.advance_to(next);
        self.has_committed_since_setup = true;
        let commit = CommitMove {
            previous,
            current,
            view_index: next,
        };
        Ok(CommitOutcome::Changed {
            commit,
            focus: self.follow_commit(),
        })
    }

    /// Move the focus onto the commit cursor as a regular move, so the
    /// previously focused item can be cleared by the renderer.
    fn follow_commit(&mut self) -> Option<FocusMove> {
        let target = self.cursors.commit.current()?;
        let from = self.cursors.focus.current();
        if from == Some(target) {
            return None;
        }
        let previous = from.and_then(|v| self.mapper.to_list_index(v));
        let current = self.mapper.to_list_index(target)?;
        self.cursors.focus.advance_to(target);
        Some(FocusMove {
            previous,
            current,
            view_index: target,
        })
    }

    /// Return to the resting state: focus collapses onto the commit cursor
    /// and both cursors forget their history.
    ///
    /// With `commit_authoritative`, the next `setup` anchors on the committed
    /// item instead of recomputing a midpoint. Returns the focus move when
    /// the focus was elsewhere.
    pub fn reset(&mut self, commit_authoritative: bool) -> Option<FocusMove> {
        self.commit_authoritative = commit_authoritative;
        let before = self.cursors.focus.current();
        let previous = self.focus_index();
        self.cursors.focus.collapse_onto(&self.cursors.commit);
        self.cursors.commit.forget_previous();
        let after = self.cursors.focus.current()?;
        if before == Some(after) {
            return None;
        }
        Some(FocusMove {
            previous,
            current: self.mapper.to_list_index(after)?,
            view_index: after,
        })
    }

    /// Record a paging transition decided by the engine.
    pub(crate) fn set_paging_state(&mut self, state: PagingState) {
        self.paging = state;
    }

    /// Merge a page of items at the edge named by `state`, or replace the
    /// whole list for `PagingState::None`.
    ///
    /// Prepending shifts both cursors so they keep pointing at the same
    /// items; appending leaves them untouched. A wholesale replace re-seeds
    /// both cursors on the new midpoint. Paging returns to `None` either way.
    pub fn merge_page(&mut self, new_items: Vec<T>, state: PagingState) -> ListDiff {
        let old_mapper = self.mapper;
        self.paging = PagingState::None;

        let (shift, diff) = match state {
            PagingState::None => {
                let mut replacement = new_items;
                if self.config.reverse_items {
                    replacement.reverse();
                }
                let old = std::mem::replace(&mut self.items, replacement);
                self.mapper = old_mapper.with_len(self.items.len());
                self.reseed_midpoint();
                return ListDiff::between(&old, &self.items);
            }
            PagingState::PagingStart => {
                let count = new_items.len();
                let tail = std::mem::replace(&mut self.items, new_items);
                self.items.extend(tail);
                (count, ListDiff::inserted(0, count))
            }
            PagingState::PagingEnd => {
                let index = self.items.len();
                let count = new_items.len();
                self.items.extend(new_items);
                (0, ListDiff::inserted(index, count))
            }
        };

        let new_mapper = old_mapper.with_len(self.items.len());
        let remap = |view: ViewIndex| {
            let list = old_mapper.to_list_index(view)? + shift;
            new_mapper.view_index_near(view, list)
        };
        self.cursors.focus.remap(remap);
        self.cursors.commit.remap(remap);
        self.mapper = new_mapper;
        if self.cursors.focus.current().is_none() {
            self.reseed_midpoint();
        }
        diff
    }

    /// Seed both cursors on the list midpoint after a wholesale replace.
    fn reseed_midpoint(&mut self) {
        if self.items.is_empty() {
            self.cursors.clear();
            return;
        }
        let anchor = self.items.len() / 2;
        match self.mapper.center_view_index(anchor) {
            Some(view) => self.cursors.seed(view),
            None => self.cursors.clear(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tuner_model::Channel;

    fn channels(n: usize, playing: Option<usize>) -> Vec<Channel> {
        (0..n)
            .map(|i| {
                Channel::new(format!("id-{i}"), i as u32).playing(Some(i) == playing)
            })
            .collect()
    }

    fn flags(axis: &CarouselAxisState<Channel>) -> (usize, usize) {
        let focused = (0..axis.len()).filter(|i| axis.is_focused(*i)).count();
        let committed = (0..axis.len()).filter(|i| axis.is_committed(*i)).count();
        (focused, committed)
    }

    #[test]
    fn setup_anchors_on_playing_item() {
        let mut axis = CarouselAxisState::new(AxisConfig::circular());
        axis.setup(channels(30, Some(12)));
        assert_eq!(axis.focus_index(), Some(12));
        assert_eq!(axis.commit_index(), Some(12));
        assert_eq!(axis.cursors().focus.previous(), None);
    }

    #[test]
    fn reversed_axis_anchors_on_same_item() {
        let mut axis = CarouselAxisState::new(AxisConfig::channel_stack());
        axis.setup(channels(30, Some(0)));
        assert_eq!(axis.focus_index(), Some(29));
        assert_eq!(axis.focused_item().map(|c| c.number), Some(0));
    }

    #[test]
    fn empty_setup_rejects_everything() {
        let mut axis: CarouselAxisState<Channel> =
            CarouselAxisState::new(AxisConfig::linear());
        assert_eq!(axis.setup(Vec::new()), None);
        assert_eq!(axis.move_focus(Direction::Forward), Err(NavError::EmptyList));
        assert_eq!(axis.commit(CommitTarget::Focus), Err(NavError::EmptyList));
        assert_eq!(axis.step_commit(Direction::Forward), Err(NavError::EmptyList));
        assert_eq!(axis.focused_item(), None);
        assert_eq!(axis.reset(false), None);
    }

    #[test]
    fn linear_edge_rejects_and_keeps_state() {
        let mut axis = CarouselAxisState::new(AxisConfig::linear());
        axis.setup(channels(3, Some(2)));
        let before = *axis.cursors();
        let err = axis.move_focus(Direction::Forward).unwrap_err();
        assert!(matches!(err, NavError::IllegalMove { from: 2, delta: 1 }));
        assert!(err.is_benign());
        assert_eq!(*axis.cursors(), before);
    }

    #[test]
    fn single_item_circular_move_keeps_focus() {
        let mut axis = CarouselAxisState::new(AxisConfig::circular());
        axis.setup(channels(1, None));
        let step = axis.move_focus(Direction::Forward).unwrap();
        assert_eq!(step.previous, Some(0));
        assert_eq!(step.current, 0);
        assert!(axis.is_focused(0));
        assert_eq!(flags(&axis), (1, 1));
    }

    #[test]
    fn commit_at_focus_is_idempotent() {
        let mut axis = CarouselAxisState::new(AxisConfig::circular());
        axis.setup(channels(10, Some(0)));
        axis.move_focus(Direction::Forward).unwrap();

        let first = axis.commit(CommitTarget::Focus).unwrap();
        assert!(first.is_changed());
        assert!(axis.has_committed_since_setup());
        assert_eq!(axis.commit(CommitTarget::Focus).unwrap(), CommitOutcome::Unchanged);
        assert_eq!(axis.commit_index(), Some(1));
    }

    #[test]
    fn step_commit_drags_focus_along() {
        let mut axis = CarouselAxisState::new(AxisConfig::circular());
        axis.setup(channels(10, Some(0)));
        axis.move_focus(Direction::Forward).unwrap();
        axis.move_focus(Direction::Forward).unwrap();

        let outcome = axis.step_commit(Direction::Backward).unwrap();
        let CommitOutcome::Changed { commit, focus } = outcome else {
            panic!("expected a change");
        };
        assert_eq!(commit.previous, Some(0));
        assert_eq!(commit.current, 9);
        let focus = focus.expect("focus should follow");
        assert_eq!(focus.previous, Some(2));
        assert_eq!(focus.current, 9);
        assert_eq!(flags(&axis), (1, 1));
        assert!(axis.is_committed_focused());
    }

    #[test]
    fn explicit_jump_moves_focus_too() {
        let mut axis = CarouselAxisState::new(AxisConfig::circular());
        axis.setup(channels(10, Some(0)));
        let outcome = axis.commit(CommitTarget::ListIndex(7)).unwrap();
        assert!(outcome.is_changed());
        assert_eq!(axis.commit_index(), Some(7));
        assert_eq!(axis.focus_index(), Some(7));
        assert_eq!(
            axis.commit(CommitTarget::ListIndex(10)),
            Err(NavError::OutOfRange { index: 10, len: 10 })
        );
    }

    #[test]
    fn reset_collapses_focus_onto_commit() {
        let mut axis = CarouselAxisState::new(AxisConfig::circular());
        axis.setup(channels(10, Some(3)));
        axis.move_focus(Direction::Forward).unwrap();
        axis.move_focus(Direction::Forward).unwrap();

        let moved = axis.reset(false).expect("focus was elsewhere");
        assert_eq!(moved.previous, Some(5));
        assert_eq!(moved.current, 3);
        assert_eq!(axis.cursors().focus.previous(), None);
        assert_eq!(axis.cursors().commit.previous(), None);
        assert_eq!(axis.reset(false), None);
    }

    #[test]
    fn midpoint_axis_starts_in_the_middle() {
        let mut axis = CarouselAxisState::new(AxisConfig::program_bar());
        axis.setup(channels(10, Some(2)));
        assert_eq!(axis.focus_index(), Some(5));
        assert_eq!(axis.commit_index(), Some(5));
    }

    #[test]
    fn authoritative_reset_anchors_next_setup_on_playing() {
        let mut axis = CarouselAxisState::new(AxisConfig::program_bar());
        axis.setup(channels(10, None));
        axis.reset(true);
        assert!(axis.is_commit_authoritative());
        axis.setup(channels(10, Some(2)));
        assert_eq!(axis.focus_index(), Some(2));
        assert!(!axis.is_commit_authoritative());

        axis.setup(channels(10, Some(2)));
        assert_eq!(axis.focus_index(), Some(5));
    }

    #[test]
    fn prepend_shifts_cursors() {
        let mut axis = CarouselAxisState::new(AxisConfig::program_bar());
        axis.setup(channels(10, None));
        axis.move_focus(Direction::Backward).unwrap();
        assert_eq!(axis.focus_index(), Some(4));

        let page: Vec<Channel> = (0..3)
            .map(|i| Channel::new(format!("early-{i}"), 100 + i))
            .collect();
        let diff = axis.merge_page(page, PagingState::PagingStart);
        assert_eq!(diff, ListDiff::inserted(0, 3));
        assert_eq!(axis.len(), 13);
        assert_eq!(axis.focus_index(), Some(7));
        assert_eq!(axis.commit_index(), Some(8));
        assert_eq!(axis.cursors().focus.previous(), Some(8));
        assert_eq!(axis.focused_item().map(|c| c.id.as_str()), Some("id-4"));
    }

    #[test]
    fn replace_reseeds_midpoint() {
        let mut axis = CarouselAxisState::new(AxisConfig::program_bar());
        axis.setup(channels(10, None));
        axis.move_focus(Direction::Forward).unwrap();
        axis.merge_page(channels(4, None), PagingState::None);
        assert_eq!(axis.len(), 4);
        assert_eq!(axis.focus_index(), Some(2));
        assert_eq!(axis.commit_index(), Some(2));
        assert_eq!(axis.paging_state(), PagingState::None);
    }
}
