//! Channels of the channel stack.

use crate::ids::ItemId;
use crate::item::CarouselItem;

/// A tunable channel as listed in the channel stack.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Channel {
    /// Source identity.
    pub id: ItemId,
    /// Channel number shown to the viewer.
    pub number: u32,
    /// Logo artwork; empty when the source has none.
    #[cfg_attr(feature = "serde", serde(default))]
    pub image_url: String,
    /// Set by the data source on the channel currently tuned in.
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_playing: bool,
}

impl Channel {
    /// Channel without artwork that is not playing.
    pub fn new(id: impl Into<ItemId>, number: u32) -> Self {
        Self {
            id: id.into(),
            number,
            image_url: String::new(),
            is_playing: false,
        }
    }

    /// Set the logo artwork.
    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }

    /// Mark as the tuned-in channel.
    pub fn playing(mut self, is_playing: bool) -> Self {
        self.is_playing = is_playing;
        self
    }
}

impl CarouselItem for Channel {
    fn id(&self) -> &ItemId {
        &self.id
    }

    fn ordinal(&self) -> i64 {
        i64::from(self.number)
    }

    fn is_playing(&self) -> bool {
        self.is_playing
    }

    fn same_content(&self, other: &Self) -> bool {
        self.number == other.number && self.image_url == other.image_url
    }
}
