//! Navigation constants
//!
//! Compiled defaults for carousel behaviour. `RuntimeConfig` overrides any of
//! these at runtime; tuning the defaults should happen here so both axes stay
//! consistent.

/// Virtual index space for circular axes.
pub mod position {
    /// Number of virtual items a circular axis reports to the renderer. The
    /// scroll position is seeded near the middle of this range so the list
    /// appears endless in both directions.
    pub const VIRTUAL_ITEM_COUNT: i64 = i32::MAX as i64;
}

/// Edge paging for linear axes.
pub mod paging {
    /// Distance (in items) from either edge at which the next page is
    /// requested.
    pub const TRIGGER_THRESHOLD: usize = 5;
}

/// Show/hide fades.
pub mod visibility {
    /// Fade-in duration (ms) when an overlay is shown.
    pub const FADE_IN_MS: u64 = 500;
    /// Fade-out duration (ms); the overlay only reaches `Gone` after this.
    pub const FADE_OUT_MS: u64 = 200;
}

/// Guide coordination timers.
pub mod guide {
    /// Idle window (ms) after the last key press before the overlay hides.
    pub const AUTO_HIDE_MS: u64 = 8_000;
    /// Debounce (ms) between a channel focus change and the program fetch
    /// for the focused channel.
    pub const PROGRAM_FETCH_DEBOUNCE_MS: u64 = 200;
    /// Delay (ms) before fetching programs after the playing channel changed.
    pub const PLAYING_CHANGE_FETCH_DELAY_MS: u64 = 0;
}
