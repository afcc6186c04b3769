//! Item data models shared across Tuner crates.
//!
//! Channels and programs are plain data. Navigation state (which item is
//! focused, which one is playing) never lives on these types; the engine in
//! `tuner-core` derives it from its cursors.

pub use ::chrono;

pub mod channel;
pub mod ids;
pub mod item;
pub mod program;

pub use channel::Channel;
pub use ids::ItemId;
pub use item::CarouselItem;
pub use program::Program;

/// Frequently used model types and traits.
pub mod prelude {
    pub use super::channel::Channel;
    pub use super::ids::ItemId;
    pub use super::item::CarouselItem;
    pub use super::program::Program;
}
