//! Guard rails applied to loaded navigation settings

use thiserror::Error;
use tuner_core::RuntimeConfig;

/// Program pages larger than this are unusual; a threshold above it means
/// every move near an edge requests a page.
const LARGE_PAGING_THRESHOLD: usize = 24;

/// Settings the guide cannot run with.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The overlay would hide as soon as it appeared.
    #[error("auto_hide_ms must be greater than zero")]
    ZeroAutoHide,
    #[error(
        "auto_hide_ms ({auto_hide_ms}) must be longer than fade_out_ms ({fade_out_ms})"
    )]
    /// The hide timer fires before the fade-out has finished.
    AutoHideWithinFade {
        /// Configured inactivity timeout.
        auto_hide_ms: u64,
        /// Configured fade-out duration.
        fade_out_ms: u64,
    },
}

/// A setting that was accepted but looks wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    /// What looks wrong.
    pub message: String,
    /// Suggested fix, when there is one.
    pub hint: Option<String>,
}

/// Warnings collected while applying guard rails.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigWarnings {
    /// Warnings in the order they were raised.
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    /// Record a warning without a hint.
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    /// Record a warning with a suggested fix.
    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    /// True when nothing was flagged.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of warnings.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Emit every warning through the `log` facade.
    pub fn log(&self) {
        for warning in &self.items {
            match &warning.hint {
                Some(hint) => log::warn!("{} ({hint})", warning.message),
                None => log::warn!("{}", warning.message),
            }
        }
    }
}

/// Reject settings that break the guide and collect warnings for settings
/// that merely look suspicious.
pub fn apply_guard_rails(
    config: &RuntimeConfig,
) -> Result<ConfigWarnings, ConfigError> {
    let mut warnings = ConfigWarnings::default();

    let auto_hide_ms = config.auto_hide_ms();
    let fade_out_ms = config.fade_out_ms();
    if auto_hide_ms == 0 {
        return Err(ConfigError::ZeroAutoHide);
    }
    if auto_hide_ms <= fade_out_ms {
        return Err(ConfigError::AutoHideWithinFade {
            auto_hide_ms,
            fade_out_ms,
        });
    }

    let threshold = config.paging_trigger_threshold();
    if threshold > LARGE_PAGING_THRESHOLD {
        warnings.push_with_hint(
            format!("paging_trigger_threshold of {threshold} exceeds a typical program page"),
            format!("values up to {LARGE_PAGING_THRESHOLD} keep page requests near the edges"),
        );
    }

    if config.program_fetch_debounce_ms() >= auto_hide_ms {
        warnings.push(
            "program_fetch_debounce_ms is not shorter than auto_hide_ms; focused channels may hide before their programs load",
        );
    }

    if config.fade_in_ms() == 0 && config.fade_out_ms() == 0 {
        warnings.push("fades are disabled; the overlay will appear and vanish abruptly");
    }

    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_cleanly() {
        let warnings = apply_guard_rails(&RuntimeConfig::default()).unwrap();
        assert!(warnings.is_empty());
    }

    #[test]
    fn zero_auto_hide_is_rejected() {
        let config = RuntimeConfig {
            auto_hide_ms: Some(0),
            ..RuntimeConfig::default()
        };
        assert_eq!(apply_guard_rails(&config), Err(ConfigError::ZeroAutoHide));
    }

    #[test]
    fn auto_hide_must_outlast_fade_out() {
        let config = RuntimeConfig {
            auto_hide_ms: Some(300),
            fade_out_ms: Some(300),
            ..RuntimeConfig::default()
        };
        assert_eq!(
            apply_guard_rails(&config),
            Err(ConfigError::AutoHideWithinFade {
                auto_hide_ms: 300,
                fade_out_ms: 300
            })
        );
    }

    #[test]
    fn large_threshold_only_warns() {
        let config = RuntimeConfig {
            paging_trigger_threshold: Some(40),
            ..RuntimeConfig::default()
        };
        let warnings = apply_guard_rails(&config).unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings.items[0].hint.is_some());
    }
}
