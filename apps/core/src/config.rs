use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::model::Locale;
use crate::score::ScoreWeights;
use crate::selection::NavigationPolicy;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config toml: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub max_results: u16,
    pub min_query_chars: usize,
    pub debounce_ms: u64,
    pub recent_limit: usize,
    pub navigation: NavigationPolicy,
    pub default_locale: Locale,
    pub catalog_path: PathBuf,
    pub history_path: PathBuf,
    pub log_dir: PathBuf,
    pub weights: ScoreWeights,
}

impl Default for Config {
    fn default() -> Self {
        let base = app_data_dir();
        Self {
            max_results: 20,
            min_query_chars: 2,
            debounce_ms: 200,
            recent_limit: 8,
            navigation: NavigationPolicy::Clamp,
            default_locale: Locale::En,
            catalog_path: base.join("catalog"),
            history_path: base.join("history.sqlite3"),
            log_dir: base.join("logs"),
            weights: ScoreWeights::default(),
        }
    }
}

impl Config {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

pub fn app_data_dir() -> PathBuf {
    std::env::temp_dir().join("calcfind")
}

/// Reads `path`, or returns defaults when the file does not exist.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            log::info!("no config at '{}', using defaults", path.display());
            return Ok(Config::default());
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let cfg = parse(&raw)?;
    validate(&cfg).map_err(ConfigError::Invalid)?;
    Ok(cfg)
}

pub fn parse(raw: &str) -> Result<Config, ConfigError> {
    Ok(toml::from_str(raw)?)
}

pub fn validate(cfg: &Config) -> Result<(), String> {
    if cfg.max_results < 5 || cfg.max_results > 100 {
        return Err("max_results out of range".into());
    }

    if !(1..=8).contains(&cfg.min_query_chars) {
        return Err("min_query_chars out of range".into());
    }

    if cfg.debounce_ms > 2_000 {
        return Err("debounce_ms out of range".into());
    }

    if !(1..=50).contains(&cfg.recent_limit) {
        return Err("recent_limit out of range".into());
    }

    if cfg.weights.is_all_zero() {
        return Err("weights must not all be zero".into());
    }

    if cfg.catalog_path.as_os_str().is_empty() {
        return Err("catalog_path is required".into());
    }

    if cfg.history_path.as_os_str().is_empty() {
        return Err("history_path is required".into());
    }

    Ok(())
}
