//! Trait surface the navigation engine needs from a list item.

use chrono::{DateTime, Utc};

use crate::ids::ItemId;

/// An entry in a carousel: a channel in the channel stack or a program in
/// the program bar.
pub trait CarouselItem {
    /// Stable identity used for diffing and stale-response checks.
    fn id(&self) -> &ItemId;

    /// Display ordinal (channel number, program slot).
    fn ordinal(&self) -> i64;

    /// Whether the data source reports this item as the one currently
    /// playing. Only consulted when a list is first set up.
    fn is_playing(&self) -> bool {
        false
    }

    /// Start of the airing window, for items that have one.
    fn start_at(&self) -> Option<DateTime<Utc>> {
        None
    }

    /// End of the airing window, for items that have one.
    fn end_at(&self) -> Option<DateTime<Utc>> {
        None
    }

    /// Content equality for items sharing an id. Only the airing window is
    /// renderer-visible.
    fn same_content(&self, other: &Self) -> bool
    where
        Self: Sized,
    {
        self.start_at() == other.start_at() && self.end_at() == other.end_at()
    }
}
