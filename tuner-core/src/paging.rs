//! Edge paging for finite axes.
//!
//! A forward move into the last `threshold + 1` items requests the next page
//! (`PagingEnd`); a backward move into the first `threshold + 1` items
//! requests the previous one (`PagingStart`). A zone fires once on entry and
//! stays quiet until focus leaves it or the list is merged/replaced.

use crate::axis::Direction;

/// Edge paging progress of a program-style axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum PagingState {
    /// No page request outstanding.
    #[default]
    None,
    /// Focus is near the start; an earlier page was requested.
    PagingStart,
    /// Focus is near the end; a later page was requested.
    PagingEnd,
}

impl std::fmt::Display for PagingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::PagingStart => write!(f, "paging-start"),
            Self::PagingEnd => write!(f, "paging-end"),
        }
    }
}

/// Paging parameters for an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingConfig {
    /// Distance from an edge at which a page is requested.
    pub trigger_threshold: usize,
}

impl PagingConfig {
    /// Paging that triggers `trigger_threshold` items from either edge.
    pub const fn new(trigger_threshold: usize) -> Self {
        Self { trigger_threshold }
    }

    fn in_start_zone(&self, index: usize) -> bool {
        index <= self.trigger_threshold
    }

    fn in_end_zone(&self, index: usize, len: usize) -> bool {
        index + 1 + self.trigger_threshold >= len
    }

    /// Next paging state after a successful focus move to `index` in a list
    /// of `len` items, or `None` when the state does not change.
    pub fn evaluate(
        &self,
        current: PagingState,
        direction: Direction,
        index: usize,
        len: usize,
    ) -> Option<PagingState> {
        let next = match (direction, current) {
            (Direction::Forward, PagingState::PagingEnd)
            | (Direction::Backward, PagingState::PagingStart) => current,
            (Direction::Forward, _) if self.in_end_zone(index, len) => {
                PagingState::PagingEnd
            }
            (Direction::Backward, _) if self.in_start_zone(index) => {
                PagingState::PagingStart
            }
            (_, PagingState::PagingEnd) if !self.in_end_zone(index, len) => {
                PagingState::None
            }
            (_, PagingState::PagingStart) if !self.in_start_zone(index) => {
                PagingState::None
            }
            _ => current,
        };
        (next != current).then_some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CFG: PagingConfig = PagingConfig::new(2);

    #[test]
    fn forward_enters_end_zone_once() {
        assert_eq!(
            CFG.evaluate(PagingState::None, Direction::Forward, 96, 100),
            None
        );
        assert_eq!(
            CFG.evaluate(PagingState::None, Direction::Forward, 97, 100),
            Some(PagingState::PagingEnd)
        );
        assert_eq!(
            CFG.evaluate(PagingState::PagingEnd, Direction::Forward, 98, 100),
            None
        );
    }

    #[test]
    fn backward_inside_end_zone_keeps_state() {
        assert_eq!(
            CFG.evaluate(PagingState::PagingEnd, Direction::Backward, 98, 100),
            None
        );
    }

    #[test]
    fn leaving_zone_returns_to_none() {
        assert_eq!(
            CFG.evaluate(PagingState::PagingEnd, Direction::Backward, 96, 100),
            Some(PagingState::None)
        );
        assert_eq!(
            CFG.evaluate(PagingState::PagingStart, Direction::Forward, 3, 100),
            Some(PagingState::None)
        );
    }

    #[test]
    fn backward_enters_start_zone() {
        assert_eq!(
            CFG.evaluate(PagingState::None, Direction::Backward, 2, 100),
            Some(PagingState::PagingStart)
        );
        assert_eq!(
            CFG.evaluate(PagingState::None, Direction::Backward, 3, 100),
            None
        );
    }

    #[test]
    fn forward_into_end_from_start_zone_switches() {
        assert_eq!(
            CFG.evaluate(PagingState::PagingStart, Direction::Forward, 3, 5),
            Some(PagingState::PagingEnd)
        );
    }
}
