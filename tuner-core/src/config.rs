//! Runtime configuration for navigation timings and thresholds
//!
//! `RuntimeConfig` carries `Option<T>` overrides of the compiled constants.
//! Accessor methods fall back to the constants when a field is `None`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{guide, paging, visibility};
use crate::visibility::FadeTimings;

/// Runtime overrides for the navigation constants.
/// Fields are None by default, falling back to compiled constants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    // ========== PAGING ==========
    /// Items from an edge at which the next page is requested
    pub paging_trigger_threshold: Option<usize>,

    // ========== GUIDE TIMERS ==========
    /// Idle time before the overlay hides (ms)
    pub auto_hide_ms: Option<u64>,
    /// Debounce for program fetches after a channel focus change (ms)
    pub program_fetch_debounce_ms: Option<u64>,
    /// Delay for program fetches after the playing channel changed (ms)
    pub playing_change_fetch_delay_ms: Option<u64>,

    // ========== FADES ==========
    /// Overlay fade-in (ms)
    pub fade_in_ms: Option<u64>,
    /// Overlay fade-out (ms)
    pub fade_out_ms: Option<u64>,
}

impl RuntimeConfig {
    /// Config with every field falling back to its constant.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether every field falls back to its constant.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    // ========== PAGING ACCESSORS ==========

    /// Distance from an edge, in items, that requests the next page.
    pub fn paging_trigger_threshold(&self) -> usize {
        self.paging_trigger_threshold
            .unwrap_or(paging::TRIGGER_THRESHOLD)
    }

    // ========== GUIDE TIMER ACCESSORS ==========

    /// Idle time before the overlay hides (ms).
    pub fn auto_hide_ms(&self) -> u64 {
        self.auto_hide_ms.unwrap_or(guide::AUTO_HIDE_MS)
    }

    /// Debounce after a channel focus change (ms).
    pub fn program_fetch_debounce_ms(&self) -> u64 {
        self.program_fetch_debounce_ms
            .unwrap_or(guide::PROGRAM_FETCH_DEBOUNCE_MS)
    }

    /// Fetch delay after the playing channel changed (ms).
    pub fn playing_change_fetch_delay_ms(&self) -> u64 {
        self.playing_change_fetch_delay_ms
            .unwrap_or(guide::PLAYING_CHANGE_FETCH_DELAY_MS)
    }

    /// [`Self::auto_hide_ms`] as a `Duration`.
    pub fn auto_hide(&self) -> Duration {
        Duration::from_millis(self.auto_hide_ms())
    }

    /// [`Self::program_fetch_debounce_ms`] as a `Duration`.
    pub fn program_fetch_debounce(&self) -> Duration {
        Duration::from_millis(self.program_fetch_debounce_ms())
    }

    /// [`Self::playing_change_fetch_delay_ms`] as a `Duration`.
    pub fn playing_change_fetch_delay(&self) -> Duration {
        Duration::from_millis(self.playing_change_fetch_delay_ms())
    }

    // ========== FADE ACCESSORS ==========

    /// Overlay fade-in (ms).
    pub fn fade_in_ms(&self) -> u64 {
        self.fade_in_ms.unwrap_or(visibility::FADE_IN_MS)
    }

    /// Overlay fade-out (ms).
    pub fn fade_out_ms(&self) -> u64 {
        self.fade_out_ms.unwrap_or(visibility::FADE_OUT_MS)
    }

    /// Both fades, for a `VisibilityController`.
    pub fn fade_timings(&self) -> FadeTimings {
        FadeTimings {
            fade_in: Duration::from_millis(self.fade_in_ms()),
            fade_out: Duration::from_millis(self.fade_out_ms()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_fall_back_to_constants() {
        let config = RuntimeConfig::new();
        assert!(config.is_default());
        assert_eq!(config.paging_trigger_threshold(), paging::TRIGGER_THRESHOLD);
        assert_eq!(config.auto_hide(), Duration::from_millis(8_000));
        assert_eq!(config.fade_timings(), FadeTimings::default());
    }

    #[test]
    fn overrides_win() {
        let config = RuntimeConfig {
            auto_hide_ms: Some(3_000),
            fade_out_ms: Some(50),
            ..RuntimeConfig::default()
        };
        assert!(!config.is_default());
        assert_eq!(config.auto_hide_ms(), 3_000);
        assert_eq!(config.fade_timings().fade_out, Duration::from_millis(50));
    }

    #[test]
    fn deserializes_partial_json() {
        let config: RuntimeConfig =
            serde_json::from_str(r#"{ "program_fetch_debounce_ms": 350 }"#).unwrap();
        assert_eq!(config.program_fetch_debounce_ms(), 350);
        assert_eq!(config.playing_change_fetch_delay_ms(), 0);
        assert!(!config.is_default());

        let empty: RuntimeConfig = serde_json::from_str("{}").unwrap();
        assert!(empty.is_default());
    }
}
