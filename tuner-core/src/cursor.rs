//! Focus and commit cursors for a single axis.

use crate::position::{PositionMapper, ViewIndex};

/// A position plus the position it held before the last move.
///
/// `previous` is `None` until the first move after a seed or reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    previous: Option<ViewIndex>,
    current: Option<ViewIndex>,
}

impl Cursor {
    /// Unplaced cursor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current position.
    pub fn current(&self) -> Option<ViewIndex> {
        self.current
    }

    /// Position before the last move.
    pub fn previous(&self) -> Option<ViewIndex> {
        self.previous
    }

    /// Place the cursor without recording a move.
    pub fn seed(&mut self, at: ViewIndex) {
        self.previous = None;
        self.current = Some(at);
    }

    /// Move to `next`, remembering where the cursor was.
    pub fn advance_to(&mut self, next: ViewIndex) {
        self.previous = self.current;
        self.current = Some(next);
    }

    /// Adopt `other`'s position and forget any history.
    pub fn collapse_onto(&mut self, other: &Cursor) {
        self.current = other.current;
        self.previous = None;
    }

    /// Drop the move history.
    pub fn forget_previous(&mut self) {
        self.previous = None;
    }

    /// Unplace.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Re-express both positions through `remap`, dropping any that no
    /// longer resolve.
    pub(crate) fn remap(&mut self, mut remap: impl FnMut(ViewIndex) -> Option<ViewIndex>) {
        self.previous = self.previous.and_then(&mut remap);
        self.current = self.current.and_then(&mut remap);
    }
}

/// The focus/commit cursor pair of one axis.
///
/// Both cursors live in view-index space so one can be collapsed onto the
/// other on circular axes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CarouselCursorState {
    /// What the viewer is browsing.
    pub focus: Cursor,
    /// What is playing.
    pub commit: Cursor,
}

impl CarouselCursorState {
    /// Both cursors unplaced.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed both cursors on the same position.
    pub fn seed(&mut self, at: ViewIndex) {
        self.focus.seed(at);
        self.commit.seed(at);
    }

    /// Unplace.
    pub fn clear(&mut self) {
        self.focus.clear();
        self.commit.clear();
    }

    /// List index under the focus cursor.
    pub fn focus_list_index(&self, mapper: &PositionMapper) -> Option<usize> {
        self.focus.current().and_then(|v| mapper.to_list_index(v))
    }

    /// List index under the commit cursor.
    pub fn commit_list_index(&self, mapper: &PositionMapper) -> Option<usize> {
        self.commit.current().and_then(|v| mapper.to_list_index(v))
    }

    /// True when focus and commit point at the same list item.
    pub fn coincide(&self, mapper: &PositionMapper) -> bool {
        match (self.focus_list_index(mapper), self.commit_list_index(mapper)) {
            (Some(f), Some(c)) => f == c,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::WrapMode;

    #[test]
    fn advance_records_previous() {
        let mut cursor = Cursor::new();
        cursor.seed(5);
        assert_eq!(cursor.previous(), None);

        cursor.advance_to(6);
        assert_eq!(cursor.previous(), Some(5));
        assert_eq!(cursor.current(), Some(6));

        cursor.advance_to(7);
        assert_eq!(cursor.previous(), Some(6));
    }

    #[test]
    fn collapse_discards_history() {
        let mut focus = Cursor::new();
        focus.seed(3);
        focus.advance_to(9);

        let mut commit = Cursor::new();
        commit.seed(3);

        focus.collapse_onto(&commit);
        assert_eq!(focus.current(), Some(3));
        assert_eq!(focus.previous(), None);
    }

    #[test]
    fn coincide_compares_list_indices() {
        let mapper = PositionMapper::new(WrapMode::Infinite, 4);
        let mut state = CarouselCursorState::new();
        state.focus.seed(1);
        state.commit.seed(5);
        assert!(state.coincide(&mapper));

        state.focus.advance_to(2);
        assert!(!state.coincide(&mapper));
    }
}
