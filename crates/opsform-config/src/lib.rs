//! Configuration for the opsform tools.
//!
//! A single TOML file holds output defaults, the session selection used
//! when a command does not name one, and display-string overrides for
//! message keys. Values merge from built-in defaults, the file, then
//! `OPSFORM_`-prefixed environment variables.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("unknown config key '{key}'")]
    UnknownKey { key: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Session selection applied when a command doesn't pass one.
    #[serde(default)]
    pub session: SessionDefaults,

    /// Display strings keyed by message key (e.g. `"validation.required"`).
    #[serde(default)]
    pub messages: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Debounce for search-as-you-type lookups.
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            search_debounce_ms: default_search_debounce_ms(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_search_debounce_ms() -> u64 {
    300
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SessionDefaults {
    /// Site id used to scope lookups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl Config {
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.defaults.search_debounce_ms)
    }

    /// Set a value by dotted key, as used by `config set`.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "defaults.output" => {
                validate_choice(key, value, &["table", "json", "json-compact", "yaml", "plain"])?;
                self.defaults.output = value.into();
            }
            "defaults.color" => {
                validate_choice(key, value, &["auto", "always", "never"])?;
                self.defaults.color = value.into();
            }
            "defaults.search_debounce_ms" => {
                self.defaults.search_debounce_ms =
                    value.parse().map_err(|_| ConfigError::Validation {
                        field: key.into(),
                        reason: format!("expected milliseconds, got '{value}'"),
                    })?;
            }
            "session.site" => self.session.site = non_empty(value),
            "session.region" => self.session.region = non_empty(value),
            _ => match key.strip_prefix("messages.") {
                Some(message_key) if !message_key.is_empty() => {
                    self.messages.insert(message_key.into(), value.into());
                }
                _ => return Err(ConfigError::UnknownKey { key: key.into() }),
            },
        }
        Ok(())
    }
}

fn validate_choice(field: &str, value: &str, allowed: &[&str]) -> Result<(), ConfigError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Validation {
            field: field.into(),
            reason: format!("expected one of {}, got '{value}'", allowed.join(", ")),
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "opsform", "opsform").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("opsform");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load config from `path` + environment. A missing file is not an error.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("OPSFORM_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load the full Config from the canonical path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_from(&config_path())
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_to(cfg, &config_path())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.defaults.output, "table");
        assert_eq!(cfg.search_debounce(), Duration::from_millis(300));
        assert!(cfg.session.site.is_none());
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[defaults]
output = "json"
search_debounce_ms = 150

[session]
site = "hq"

[messages]
"validation.required" = "Please fill this in"
"#,
        )
        .unwrap();

        let cfg = load_from(&path).unwrap();
        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.defaults.color, "auto");
        assert_eq!(cfg.defaults.search_debounce_ms, 150);
        assert_eq!(cfg.session.site.as_deref(), Some("hq"));
        assert_eq!(
            cfg.messages.get("validation.required").map(String::as_str),
            Some("Please fill this in")
        );
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_value("session.region", "emea").unwrap();
        cfg.set_value("messages.field.name", "Name").unwrap();
        save_to(&cfg, &path).unwrap();

        assert_eq!(load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn set_value_validates_keys_and_values() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set_value("defaults.output", "xml"),
            Err(ConfigError::Validation { .. })
        ));
        assert!(matches!(
            cfg.set_value("defaults.search_debounce_ms", "soon"),
            Err(ConfigError::Validation { .. })
        ));
        assert!(matches!(
            cfg.set_value("profiles.x", "y"),
            Err(ConfigError::UnknownKey { .. })
        ));

        cfg.set_value("session.site", "  ").unwrap();
        assert!(cfg.session.site.is_none());
    }
}
