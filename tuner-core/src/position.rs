//! Mapping between the renderer's scroll index space and the backing list.

use crate::constants::position::VIRTUAL_ITEM_COUNT;

/// Index in the renderer's scroll space. Unbounded for circular axes.
pub type ViewIndex = i64;

/// Carousel boundary behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapMode {
    /// Finite (clamped) carousel.
    #[default]
    Finite,
    /// Infinite wrap-around carousel. Indexing wraps with modulo arithmetic.
    Infinite,
}

/// Translates view indices to list indices for a list of `len` items.
///
/// Every lookup returns `None` on an empty list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionMapper {
    wrap_mode: WrapMode,
    len: usize,
}

impl PositionMapper {
    /// Mapper over `len` items.
    pub fn new(wrap_mode: WrapMode, len: usize) -> Self {
        Self { wrap_mode, len }
    }

    /// Boundary behavior.
    pub fn wrap_mode(&self) -> WrapMode {
        self.wrap_mode
    }

    /// Backing list length.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the backing list is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Same mapping over a list of a different length.
    pub fn with_len(self, len: usize) -> Self {
        Self { len, ..self }
    }

    /// Item count the renderer should report: the virtual range for circular
    /// axes, the list length otherwise.
    pub fn virtual_item_count(&self) -> ViewIndex {
        match (self.wrap_mode, self.len) {
            (_, 0) => 0,
            (WrapMode::Infinite, _) => VIRTUAL_ITEM_COUNT,
            (WrapMode::Finite, len) => len as ViewIndex,
        }
    }

    /// List index shown at `view`: modulo the length on circular axes,
    /// `None` outside the list on finite ones.
    #[inline]
    pub fn to_list_index(&self, view: ViewIndex) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        match self.wrap_mode {
            WrapMode::Infinite => {
                Some(view.rem_euclid(self.len as ViewIndex) as usize)
            }
            WrapMode::Finite => {
                (0..self.len as ViewIndex).contains(&view).then_some(view as usize)
            }
        }
    }

    /// View index to seed the scroll position with so that `anchor` is shown.
    ///
    /// Circular axes land on the first lap boundary below the middle of the
    /// virtual range, offset by `anchor`, so scrolling never reaches either
    /// end of the numeric range in practice.
    pub fn center_view_index(&self, anchor: usize) -> Option<ViewIndex> {
        if anchor >= self.len {
            return None;
        }
        match self.wrap_mode {
            WrapMode::Infinite => {
                let len = self.len as ViewIndex;
                let mid = VIRTUAL_ITEM_COUNT / 2;
                Some(mid - mid.rem_euclid(len) + anchor as ViewIndex)
            }
            WrapMode::Finite => Some(anchor as ViewIndex),
        }
    }

    /// View index mapping to `list_index` within the same lap as `reference`.
    pub fn view_index_near(
        &self,
        reference: ViewIndex,
        list_index: usize,
    ) -> Option<ViewIndex> {
        if list_index >= self.len {
            return None;
        }
        match self.wrap_mode {
            WrapMode::Infinite => {
                let len = self.len as ViewIndex;
                Some(reference - reference.rem_euclid(len) + list_index as ViewIndex)
            }
            WrapMode::Finite => Some(list_index as ViewIndex),
        }
    }
}
