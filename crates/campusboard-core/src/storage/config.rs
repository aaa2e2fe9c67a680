//! TOML-based application configuration.
//!
//! Stores engine tuning:
//! - Tick, visibility and exit-animation durations
//! - Selection probabilities and an optional fixed RNG seed
//! - Message pools (promo lines, interest feedback jokes)
//!
//! Configuration is stored at `~/.config/campusboard/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, CoreError};

const MAX_DURATION_MS: u64 = 24 * 60 * 60 * 1000;

/// Timer durations in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// How long a toast stays visible before it starts exiting.
    #[serde(default = "default_visible_ms")]
    pub visible_ms: u64,
    /// Exit animation length.
    #[serde(default = "default_exit_ms")]
    pub exit_ms: u64,
}

/// Weights for the two-level random draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionConfig {
    #[serde(default = "default_interested_chance")]
    pub interested_chance: f64,
    #[serde(default = "default_discovery_flavor_chance")]
    pub discovery_flavor_chance: f64,
    /// Fixed seed for reproducible runs. `None` seeds from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Message pools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagesConfig {
    #[serde(default = "default_interested_fallback")]
    pub interested_fallback: String,
    #[serde(default = "default_promo")]
    pub promo: Vec<String>,
    #[serde(default = "default_feedback")]
    pub feedback: Vec<String>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/campusboard/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default)]
    pub messages: MessagesConfig,
}

// Default functions
fn default_tick_interval_ms() -> u64 {
    40_000
}
fn default_visible_ms() -> u64 {
    6_000
}
fn default_exit_ms() -> u64 {
    300
}
fn default_interested_chance() -> f64 {
    0.6
}
fn default_discovery_flavor_chance() -> f64 {
    0.4
}
fn default_interested_fallback() -> String {
    "You said you were interested. Prove it.".into()
}
fn default_promo() -> Vec<String> {
    [
        "Your calendar looks lonely. This could fix that.",
        "Free snacks are statistically likely.",
        "Future you will want to have gone to this.",
        "Touch grass, but with other students.",
        "Bold of you to assume you're busy that day.",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
fn default_feedback() -> Vec<String> {
    [
        "Noted. We'll be watching.",
        "Bold choice. Don't flake.",
        "Interest logged. Commitment pending.",
        "We told the event you said hi.",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            visible_ms: default_visible_ms(),
            exit_ms: default_exit_ms(),
        }
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            interested_chance: default_interested_chance(),
            discovery_flavor_chance: default_discovery_flavor_chance(),
            seed: None,
        }
    }
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            interested_fallback: default_interested_fallback(),
            promo: default_promo(),
            feedback: default_feedback(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let unknown = || ConfigError::UnknownKey(key.to_string());

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => parse_number(value).ok_or_else(|| {
                    invalid(format!("cannot parse '{value}' as number"))
                })?,
                serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                // `seed` is the only optional value; accept a number or "none".
                serde_json::Value::Null => match value {
                    "none" | "null" => serde_json::Value::Null,
                    _ => parse_number(value).ok_or_else(|| {
                        invalid(format!("cannot parse '{value}' as number"))
                    })?,
                },
                _ => serde_json::Value::String(value.into()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// Default path of the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn path() -> Result<PathBuf, CoreError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, CoreError> {
        let path = Self::path()?;
        if !path.exists() {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            return Ok(cfg);
        }
        Self::load_from(&path)
    }

    /// Load and validate a config file at an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation.
    pub fn load_from(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), CoreError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<(), CoreError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Load from the default location, returning defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("config unreadable, using defaults: {e}");
            Self::default()
        })
    }

    /// Reject values the engine cannot run with.
    ///
    /// # Errors
    ///
    /// Returns the first invalid value found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let probability = |key: &str, p: f64| {
            if (0.0..=1.0).contains(&p) {
                Ok(())
            } else {
                Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("{p} is not a probability"),
                })
            }
        };
        probability("selection.interested_chance", self.selection.interested_chance)?;
        probability(
            "selection.discovery_flavor_chance",
            self.selection.discovery_flavor_chance,
        )?;
        if self.timing.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timing.tick_interval_ms".into(),
                message: "must be greater than zero".into(),
            });
        }
        for (key, ms) in [
            ("timing.tick_interval_ms", self.timing.tick_interval_ms),
            ("timing.visible_ms", self.timing.visible_ms),
            ("timing.exit_ms", self.timing.exit_ms),
        ] {
            if ms > MAX_DURATION_MS {
                return Err(ConfigError::InvalidValue {
                    key: key.into(),
                    message: format!("{ms} exceeds one day"),
                });
            }
        }
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key in memory. Returns error if the key is
    /// unknown or the resulting config does not validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json)?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

fn parse_number(value: &str) -> Option<serde_json::Value> {
    if let Ok(n) = value.parse::<u64>() {
        return Some(serde_json::Value::Number(n.into()));
    }
    value
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(serde_json::Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_default_values() {
        let cfg = Config::default();
        assert_eq!(cfg.timing.tick_interval_ms, 40_000);
        assert_eq!(cfg.timing.visible_ms, 6_000);
        assert_eq!(cfg.timing.exit_ms, 300);
        assert_eq!(cfg.selection.interested_chance, 0.6);
        assert_eq!(cfg.selection.discovery_flavor_chance, 0.4);
        assert_eq!(cfg.selection.seed, None);
        assert!(!cfg.messages.promo.is_empty());
        assert!(!cfg.messages.feedback.is_empty());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: Config = toml::from_str("[timing]\nvisible_ms = 1000\n").unwrap();
        assert_eq!(cfg.timing.visible_ms, 1000);
        assert_eq!(cfg.timing.tick_interval_ms, 40_000);
        assert_eq!(cfg.messages, MessagesConfig::default());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("timing.exit_ms").as_deref(), Some("300"));
        assert_eq!(cfg.get("selection.interested_chance").as_deref(), Some("0.6"));
        assert!(cfg.get("timing.missing").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_numbers_and_seed() {
        let mut cfg = Config::default();
        cfg.set("timing.tick_interval_ms", "1000").unwrap();
        assert_eq!(cfg.timing.tick_interval_ms, 1000);
        cfg.set("selection.seed", "42").unwrap();
        assert_eq!(cfg.selection.seed, Some(42));
        cfg.set("selection.seed", "none").unwrap();
        assert_eq!(cfg.selection.seed, None);
    }

    #[test]
    fn set_updates_string_and_list() {
        let mut cfg = Config::default();
        cfg.set("messages.interested_fallback", "Go.").unwrap();
        assert_eq!(cfg.messages.interested_fallback, "Go.");
        cfg.set("messages.promo", r#"["one", "two"]"#).unwrap();
        assert_eq!(cfg.messages.promo, vec!["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        let err = cfg.set("timing.nonexistent", "1").unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_rejects_out_of_range_probability() {
        let mut cfg = Config::default();
        assert!(cfg.set("selection.interested_chance", "1.5").is_err());
        assert_eq!(cfg.selection.interested_chance, 0.6);
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set("timing.exit_ms", "soon").is_err());
    }
}
