//! Locating and parsing navigation settings files.

use anyhow::{Context, anyhow};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tuner_core::RuntimeConfig;

use crate::validation::{self, ConfigWarnings};

/// Environment variable naming a TOML or JSON settings file.
pub const CONFIG_PATH_VAR: &str = "TUNER_CONFIG_PATH";
/// Environment variable holding inline JSON settings.
pub const CONFIG_JSON_VAR: &str = "TUNER_CONFIG_JSON";

const CANDIDATES: &[&str] = &[
    "tuner.toml",
    "tuner.json",
    "config/tuner.toml",
    "config/tuner.json",
];

/// Source that produced the navigation settings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigSource {
    /// Nothing was found; built-in defaults apply.
    #[default]
    Default,
    /// File named by `$TUNER_CONFIG_PATH`.
    EnvPath(PathBuf),
    /// Inline JSON from `$TUNER_CONFIG_JSON`.
    EnvInline,
    /// Candidate file found in the working directory, or passed explicitly.
    File(PathBuf),
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Default => write!(f, "built-in defaults"),
            Self::EnvPath(path) => {
                write!(f, "{} ({CONFIG_PATH_VAR})", path.display())
            }
            Self::EnvInline => write!(f, "{CONFIG_JSON_VAR}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Settings that passed the guard rails, with where they came from.
#[derive(Debug, Clone)]
pub struct ConfigLoad {
    /// Resolved settings.
    pub config: RuntimeConfig,
    /// Where `config` was read from.
    pub source: ConfigSource,
    /// Suspicious but accepted values.
    pub warnings: ConfigWarnings,
}

/// Load navigation settings using environment variables.
/// Evaluation order:
/// 1) `$TUNER_CONFIG_PATH` (TOML or JSON file),
/// 2) `$TUNER_CONFIG_JSON` (inline JSON),
/// 3) the first existing candidate file in the working directory,
/// 4) defaults.
pub fn load_from_env() -> anyhow::Result<ConfigLoad> {
    let cwd = env::current_dir().context("failed to resolve working directory")?;
    load_with(|key| env::var(key).ok(), &cwd)
}

/// [`load_from_env`] with an injectable variable lookup and search root.
pub fn load_with(
    lookup: impl Fn(&str) -> Option<String>,
    root: &Path,
) -> anyhow::Result<ConfigLoad> {
    let (config, source) = resolve(&lookup, root)?;
    let warnings = validation::apply_guard_rails(&config)
        .with_context(|| format!("rejected settings from {source}"))?;
    log::info!("navigation settings loaded from {source}");
    warnings.log();
    Ok(ConfigLoad {
        config,
        source,
        warnings,
    })
}

fn resolve(
    lookup: &impl Fn(&str) -> Option<String>,
    root: &Path,
) -> anyhow::Result<(RuntimeConfig, ConfigSource)> {
    if let Some(path_str) = lookup(CONFIG_PATH_VAR)
        && !path_str.trim().is_empty()
    {
        let path = PathBuf::from(path_str);
        let config = load_from_file(&path)?;
        return Ok((config, ConfigSource::EnvPath(path)));
    }

    if let Some(raw) = lookup(CONFIG_JSON_VAR)
        && !raw.trim().is_empty()
    {
        let parsed = parse_json(&raw)
            .with_context(|| format!("failed to parse {CONFIG_JSON_VAR}"))?;
        return Ok((parsed, ConfigSource::EnvInline));
    }

    if let Some(path) = find_default_file(root) {
        let config = load_from_file(&path)?;
        return Ok((config, ConfigSource::File(path)));
    }

    Ok((RuntimeConfig::default(), ConfigSource::Default))
}

/// Read settings from `path`, choosing the format by extension and trying
/// TOML then JSON when the extension is unknown. Guard rails are not applied.
pub fn load_from_file(path: &Path) -> anyhow::Result<RuntimeConfig> {
    let contents = fs::read_to_string(path).with_context(|| {
        format!("failed to read navigation settings from {}", path.display())
    })?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => parse_json(&contents).with_context(|| {
            format!("invalid navigation settings {}", path.display())
        }),
        Some("toml") | Some("tml") => toml::from_str(&contents).map_err(|err| {
            anyhow!("invalid navigation settings {}: {}", path.display(), err)
        }),
        _ => parse_from_str(&contents, &path.display().to_string()),
    }
}

/// Parse settings that may be TOML or JSON. `origin` names the input in
/// the error message.
pub fn parse_from_str(
    contents: &str,
    origin: &str,
) -> anyhow::Result<RuntimeConfig> {
    // TOML first, then JSON.
    toml::from_str(contents).or_else(|toml_err| {
        serde_json::from_str(contents).map_err(|json_err| {
            anyhow!(
                "failed to parse navigation settings {}: toml error: {}; json error: {}",
                origin,
                toml_err,
                json_err
            )
        })
    })
}

/// Parse JSON settings.
pub fn parse_json(raw: &str) -> anyhow::Result<RuntimeConfig> {
    serde_json::from_str(raw)
        .map_err(|err| anyhow!("invalid navigation settings json: {err}"))
}

/// First candidate settings file that exists under `root`.
pub fn find_default_file(root: &Path) -> Option<PathBuf> {
    CANDIDATES
        .iter()
        .map(|candidate| root.join(candidate))
        .find(|path| path.exists())
}

/// Render settings as TOML, e.g. to seed a `tuner.toml`.
pub fn to_toml_string(config: &RuntimeConfig) -> anyhow::Result<String> {
    toml::to_string(config).context("failed to render navigation settings")
}
