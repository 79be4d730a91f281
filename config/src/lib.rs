//! Configuration for the weft terminal session.
//!
//! Read from `~/.weft/config.toml`. Every section and key is optional; a
//! missing file means defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_MODEL: &str = "echo-1";
pub const DEFAULT_DEBOUNCE_MS: u64 = 100;
pub const DEFAULT_RESERVED_ROWS: u16 = 10;
pub const DEFAULT_MIN_VISIBLE_MESSAGES: usize = 5;
pub const DEFAULT_TRIGGER_PREFIX: &str = "/";

const ENV_ASCII: &str = "WEFT_ASCII";
const ENV_DEBOUNCE_MS: &str = "WEFT_DEBOUNCE_MS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct WeftConfig {
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    /// Model name shown in the header before the host reports one.
    pub model: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UiConfig {
    /// Use ASCII-only glyphs for rules, markers and the spinner.
    pub ascii_only: bool,
    pub debounce_ms: u64,
    /// Rows kept free of chat messages when sizing the transcript window.
    pub reserved_rows: u16,
    /// Floor for the number of messages shown on short terminals.
    pub min_visible_messages: usize,
    pub trigger_prefix: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            ascii_only: false,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            reserved_rows: DEFAULT_RESERVED_ROWS,
            min_visible_messages: DEFAULT_MIN_VISIBLE_MESSAGES,
            trigger_prefix: DEFAULT_TRIGGER_PREFIX.to_owned(),
        }
    }
}

impl UiConfig {
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl WeftConfig {
    /// Load from the default location.
    ///
    /// `Ok(None)` when there is no home directory or no file.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load, falling back to defaults (with a warning) on any error, then
    /// apply environment overrides.
    #[must_use]
    pub fn load_or_default() -> Self {
        let mut config = match Self::load() {
            Ok(config) => config.unwrap_or_default(),
            Err(err) => {
                tracing::warn!(path = %err.path().display(), "{err}; using defaults");
                Self::default()
            }
        };
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    /// Apply `WEFT_ASCII` and `WEFT_DEBOUNCE_MS` using `lookup` to read variables.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup(ENV_ASCII) {
            self.ui.ascii_only = is_truthy(&value);
        }
        if let Some(value) = lookup(ENV_DEBOUNCE_MS) {
            match value.trim().parse::<u64>() {
                Ok(ms) => self.ui.debounce_ms = ms,
                Err(_) => tracing::warn!("ignoring {ENV_DEBOUNCE_MS}={value:?}: not a number"),
            }
        }
    }

    #[must_use]
    pub fn model(&self) -> &str {
        self.app.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".weft").join("config.toml"))
}
