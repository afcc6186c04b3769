//! Programs of the program bar.

use chrono::{DateTime, Duration, Utc};

use crate::ids::ItemId;
use crate::item::CarouselItem;

/// A scheduled program in a channel's program bar.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Program {
    /// Source identity.
    pub id: ItemId,
    /// Display title.
    pub title: String,
    /// Position in the channel's schedule.
    pub slot: i64,
    /// Poster artwork; empty when the source has none.
    #[cfg_attr(feature = "serde", serde(default))]
    pub image_url: String,
    /// Set by the data source on the program airing right now.
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_playing: bool,
    /// Start of the airing window.
    #[cfg_attr(feature = "serde", serde(default))]
    pub start_at: Option<DateTime<Utc>>,
    /// End of the airing window (exclusive).
    #[cfg_attr(feature = "serde", serde(default))]
    pub end_at: Option<DateTime<Utc>>,
}

impl Program {
    /// Program without artwork or airing window.
    pub fn new(id: impl Into<ItemId>, title: impl Into<String>, slot: i64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            slot,
            image_url: String::new(),
            is_playing: false,
            start_at: None,
            end_at: None,
        }
    }

    /// Set the airing window.
    pub fn with_window(mut self, start_at: DateTime<Utc>, end_at: DateTime<Utc>) -> Self {
        self.start_at = Some(start_at);
        self.end_at = Some(end_at);
        self
    }

    /// Set the poster artwork.
    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }

    /// Mark as airing now.
    pub fn playing(mut self, is_playing: bool) -> Self {
        self.is_playing = is_playing;
        self
    }

    /// Airing length, when both ends of the window are known.
    pub fn duration(&self) -> Option<Duration> {
        match (self.start_at, self.end_at) {
            (Some(start), Some(end)) if end >= start => Some(end - start),
            _ => None,
        }
    }

    /// True when `now` falls inside `[start_at, end_at)`.
    pub fn is_on_air(&self, now: DateTime<Utc>) -> bool {
        match (self.start_at, self.end_at) {
            (Some(start), Some(end)) => start <= now && now < end,
            _ => false,
        }
    }
}

impl CarouselItem for Program {
    fn id(&self) -> &ItemId {
        &self.id
    }

    fn ordinal(&self) -> i64 {
        self.slot
    }

    fn is_playing(&self) -> bool {
        self.is_playing
    }

    fn start_at(&self) -> Option<DateTime<Utc>> {
        self.start_at
    }

    fn end_at(&self) -> Option<DateTime<Utc>> {
        self.end_at
    }
}
