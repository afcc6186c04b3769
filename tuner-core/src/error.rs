//! Errors returned by carousel operations.

use thiserror::Error;

use crate::position::ViewIndex;

/// Rejections produced by carousel operations.
///
/// None of these are fatal. Repeated key presses at a list edge are routine,
/// so callers usually log and drop them; see [`NavError::is_benign`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavError {
    /// The step would leave a finite list.
    #[error("illegal move by {delta} from view index {from}")]
    IllegalMove {
        /// View index the move started from.
        from: ViewIndex,
        /// Requested step.
        delta: i64,
    },

    /// The axis has no items to move over.
    #[error("carousel has no items")]
    EmptyList,

    /// An explicit list index past the end.
    #[error("list index {index} out of range for {len} items")]
    OutOfRange {
        /// Requested list index.
        index: usize,
        /// Current item count.
        len: usize,
    },

    /// Page merge on an axis configured without paging.
    #[error("paging is not enabled for this axis")]
    PagingDisabled,
}

impl NavError {
    /// Boundary and empty-list rejections are expected during normal input
    /// and should not be surfaced to the user.
    pub fn is_benign(&self) -> bool {
        matches!(self, NavError::IllegalMove { .. } | NavError::EmptyList)
    }
}

/// Result of a carousel operation.
pub type Result<T> = std::result::Result<T, NavError>;
