//! Structural diff between two item lists.
//!
//! Identity is the item id, content equality is `CarouselItem::same_content`.
//! The renderer applies the reported operations instead of relaying out the
//! whole carousel.

use std::collections::HashMap;

use tuner_model::{CarouselItem, ItemId};

/// One renderer-visible change. Indices refer to the list after all
/// preceding operations have been applied, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffOp {
    /// `count` items starting at `index` went away.
    Remove {
        /// First removed position.
        index: usize,
        /// Number of items removed.
        count: usize,
    },
    /// `count` items were inserted at `index`.
    Insert {
        /// First inserted position.
        index: usize,
        /// Number of items inserted.
        count: usize,
    },
    /// The item at `index` kept its id but its content changed.
    Change {
        /// Position of the changed item.
        index: usize,
    },
}

/// The set of changes between an old and a new list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListDiff {
    /// Nothing visible changed.
    #[default]
    Unchanged,
    /// Apply these operations in order.
    Ops(Vec<DiffOp>),
    /// Surviving items were reordered; relayout everything.
    Reload,
}

impl ListDiff {
    /// Items inserted at `index` with nothing else touched (edge merges).
    pub fn inserted(index: usize, count: usize) -> Self {
        if count == 0 {
            Self::Unchanged
        } else {
            Self::Ops(vec![DiffOp::Insert { index, count }])
        }
    }

    /// Whether nothing visible changed.
    pub fn is_unchanged(&self) -> bool {
        matches!(self, ListDiff::Unchanged)
    }

    /// The operations to apply; empty for `Unchanged` and `Reload`.
    pub fn ops(&self) -> &[DiffOp] {
        match self {
            ListDiff::Ops(ops) => ops,
            _ => &[],
        }
    }

    /// Diff `old` against `new`.
    ///
    /// Removals are reported first (back to front, so indices stay valid),
    /// then insertions and content changes front to back against the new
    /// list.
    pub fn between<T: CarouselItem>(old: &[T], new: &[T]) -> Self {
        let new_ids: HashMap<&ItemId, usize> = new
            .iter()
            .enumerate()
            .map(|(i, item)| (item.id(), i))
            .collect();
        let old_ids: HashMap<&ItemId, usize> = old
            .iter()
            .enumerate()
            .map(|(i, item)| (item.id(), i))
            .collect();

        // Surviving items must keep their relative order.
        let mut last_new = None;
        for item in old {
            if let Some(&at) = new_ids.get(item.id()) {
                if last_new.is_some_and(|last| at < last) {
                    return ListDiff::Reload;
                }
                last_new = Some(at);
            }
        }

        let mut ops = Vec::new();

        let removed: Vec<usize> = old
            .iter()
            .enumerate()
            .filter(|(_, item)| !new_ids.contains_key(item.id()))
            .map(|(i, _)| i)
            .collect();
        for (index, count) in coalesce(&removed).into_iter().rev() {
            ops.push(DiffOp::Remove { index, count });
        }

        let inserted: Vec<usize> = new
            .iter()
            .enumerate()
            .filter(|(_, item)| !old_ids.contains_key(item.id()))
            .map(|(i, _)| i)
            .collect();
        for (index, count) in coalesce(&inserted) {
            ops.push(DiffOp::Insert { index, count });
        }

        for (index, item) in new.iter().enumerate() {
            if let Some(&was) = old_ids.get(item.id())
                && !old[was].same_content(item)
            {
                ops.push(DiffOp::Change { index });
            }
        }

        if ops.is_empty() {
            ListDiff::Unchanged
        } else {
            ListDiff::Ops(ops)
        }
    }
}

/// Collapse sorted indices into `(start, count)` runs.
fn coalesce(indices: &[usize]) -> Vec<(usize, usize)> {
    let mut runs: Vec<(usize, usize)> = Vec::new();
    for &index in indices {
        match runs.last_mut() {
            Some((start, count)) if *start + *count == index => *count += 1,
            _ => runs.push((index, 1)),
        }
    }
    runs
}
