//! Runtime settings for storage, logging and the language-model client.
//!
//! # Responsibility
//! - Load optional TOML settings and apply environment overrides.
//! - Resolve default paths under the platform data directory.
//!
//! # Invariants
//! - A missing settings file is not an error; defaults apply.
//! - Environment variables always win over file values.
//! - A missing API key is valid; model calls then fail and the capture
//!   fallback path stores items uncategorized.

use crate::logging::default_log_level;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "braindump";
const SETTINGS_FILE_NAME: &str = "braindump.toml";
const DB_FILE_NAME: &str = "braindump.sqlite3";
const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_DB_PATH: &str = "BRAINDUMP_DB_PATH";
pub const ENV_LOG_DIR: &str = "BRAINDUMP_LOG_DIR";
pub const ENV_LOG_LEVEL: &str = "BRAINDUMP_LOG_LEVEL";
pub const ENV_AI_MODEL: &str = "BRAINDUMP_AI_MODEL";
pub const ENV_AI_BASE_URL: &str = "BRAINDUMP_AI_BASE_URL";
/// API key variables in priority order.
pub const ENV_API_KEYS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read settings `{}`: {source}", path.display())
            }
            Self::Parse { path, message } => {
                write!(f, "invalid settings `{}`: {message}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
    pub ai: AiSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub db_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: Option<String>,
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Loads settings from `path` (or the default location) plus process env.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map_or_else(default_settings_path, Path::to_path_buf);
        let mut settings = if path.exists() {
            let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;
            Self::from_toml_str(&raw).map_err(|message| ConfigError::Parse {
                path: path.clone(),
                message,
            })?
        } else {
            Self::default()
        };

        let lookup = |name: &str| std::env::var(name).ok();
        settings.resolve_env_refs(lookup);
        settings.apply_env_overrides(lookup);
        Ok(settings)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, String> {
        toml::from_str(raw).map_err(|err| err.to_string())
    }

    /// Replaces `$VAR` / `${VAR}` string values with their environment value.
    pub fn resolve_env_refs(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = &self.ai.api_key {
            if let Some(resolved) = resolve_env_ref(key, &lookup) {
                self.ai.api_key = Some(resolved);
            }
        }
        if let Some(resolved) = resolve_env_ref(&self.ai.base_url, &lookup) {
            self.ai.base_url = resolved;
        }
    }

    /// Applies non-empty environment values over file values.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(path) = non_empty(ENV_DB_PATH) {
            self.storage.db_path = Some(PathBuf::from(path));
        }
        if let Some(dir) = non_empty(ENV_LOG_DIR) {
            self.logging.dir = Some(PathBuf::from(dir));
        }
        if let Some(level) = non_empty(ENV_LOG_LEVEL) {
            self.logging.level = Some(level);
        }
        if let Some(key) = ENV_API_KEYS.iter().find_map(|name| non_empty(name)) {
            self.ai.api_key = Some(key);
        }
        if let Some(model) = non_empty(ENV_AI_MODEL) {
            self.ai.model = model;
        }
        if let Some(base_url) = non_empty(ENV_AI_BASE_URL) {
            self.ai.base_url = base_url;
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.storage
            .db_path
            .clone()
            .unwrap_or_else(|| data_dir().join(DB_FILE_NAME))
    }

    pub fn log_dir(&self) -> PathBuf {
        self.logging
            .dir
            .clone()
            .unwrap_or_else(|| data_dir().join("logs"))
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .level
            .as_deref()
            .unwrap_or_else(|| default_log_level())
    }
}

/// Default settings file location: `<config dir>/braindump/braindump.toml`.
pub fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
        .join(SETTINGS_FILE_NAME)
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}

fn resolve_env_ref(value: &str, lookup: &impl Fn(&str) -> Option<String>) -> Option<String> {
    let name = value
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
        .or_else(|| value.strip_prefix('$'))?;
    if name.is_empty() {
        return None;
    }
    lookup(name)
}

#[cfg(test)]
mod tests {
    use super::{resolve_env_ref, Settings, DEFAULT_MODEL};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.ai.model, DEFAULT_MODEL);
        assert!(settings.db_path().ends_with("braindump.sqlite3"));
    }

    #[test]
    fn env_overrides_file_values() {
        let mut settings = Settings::from_toml_str(
            r#"
            [storage]
            db_path = "/tmp/file.db"

            [ai]
            model = "file-model"
            "#,
        )
        .unwrap();
        settings.apply_env_overrides(env(&[
            ("BRAINDUMP_DB_PATH", "/tmp/env.db"),
            ("API_KEY", "fallback-key"),
            ("BRAINDUMP_AI_MODEL", "  "),
        ]));

        assert_eq!(settings.db_path(), PathBuf::from("/tmp/env.db"));
        assert_eq!(settings.ai.api_key.as_deref(), Some("fallback-key"));
        assert_eq!(settings.ai.model, "file-model");
    }

    #[test]
    fn gemini_key_takes_priority_over_generic_key() {
        let mut settings = Settings::default();
        settings.apply_env_overrides(env(&[("API_KEY", "generic"), ("GEMINI_API_KEY", "gemini")]));
        assert_eq!(settings.ai.api_key.as_deref(), Some("gemini"));
    }

    #[test]
    fn env_refs_resolve_both_syntaxes() {
        let lookup = env(&[("KEY", "secret")]);
        assert_eq!(resolve_env_ref("$KEY", &lookup).as_deref(), Some("secret"));
        assert_eq!(resolve_env_ref("${KEY}", &lookup).as_deref(), Some("secret"));
        assert_eq!(resolve_env_ref("plain", &lookup), None);
        assert_eq!(resolve_env_ref("$MISSING", &lookup), None);
    }
}
