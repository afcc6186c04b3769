//! Configuration loading for the Tuner navigation engine.
//!
//! Settings are plain [`RuntimeConfig`] overrides read from a TOML or JSON
//! file, an inline JSON environment variable, or a default candidate file.
//! Loaded settings pass through guard rails that reject values which would
//! break the guide and warn about suspicious ones.

pub mod loader;
pub mod validation;

pub use loader::{
    CONFIG_JSON_VAR, CONFIG_PATH_VAR, ConfigLoad, ConfigSource, find_default_file, load_from_env,
    load_from_file, load_with, parse_from_str, parse_json, to_toml_string,
};
pub use tuner_core::RuntimeConfig;
pub use validation::{ConfigError, ConfigWarning, ConfigWarnings, apply_guard_rails};
