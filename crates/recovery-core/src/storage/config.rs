//! TOML-based engine configuration.
//!
//! Stores tunables for:
//! - Recommendation list size
//! - Free daily start quota
//! - History cap
//! - Report window
//! - An optional user routine catalog
//!
//! Configuration is stored at `~/.config/recovery-routine/config.toml`.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::quota::{QuotaGate, DEFAULT_FREE_DAILY_LIMIT};
use crate::recommend::DEFAULT_TOP_N;
use crate::report::DEFAULT_WINDOW_DAYS;
use crate::session::DEFAULT_HISTORY_CAP;

/// Ten years. Larger windows overflow chrono's `Duration`.
pub const MAX_WINDOW_DAYS: i64 = 3650;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendConfig {
    /// How many routines make the recommended slice.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotaConfig {
    #[serde(default = "default_free_daily_limit")]
    pub free_daily_limit: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Sessions kept, newest first.
    #[serde(default = "default_history_cap")]
    pub cap: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_window_days")]
    pub window_days: i64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// User catalog replacing the bundled one.
    #[serde(default)]
    pub path: Option<String>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/recovery-routine/config.toml`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub recommend: RecommendConfig,
    #[serde(default)]
    pub quota: QuotaConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_free_daily_limit() -> u32 {
    DEFAULT_FREE_DAILY_LIMIT
}

fn default_history_cap() -> usize {
    DEFAULT_HISTORY_CAP
}

fn default_window_days() -> i64 {
    DEFAULT_WINDOW_DAYS
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
        }
    }
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            free_daily_limit: default_free_daily_limit(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            cap: default_history_cap(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
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
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let (section, leaf) = key.split_once('.').ok_or_else(unknown)?;
        let obj = root
            .get_mut(section)
            .and_then(|s| s.as_object_mut())
            .ok_or_else(unknown)?;
        let existing = obj.get(leaf).ok_or_else(unknown)?;

        let new_value = match existing {
            serde_json::Value::Number(_) => value
                .parse::<i64>()
                .map(|n| serde_json::Value::Number(n.into()))
                .map_err(|_| invalid(format!("cannot parse '{value}' as integer")))?,
            serde_json::Value::Bool(_) => value
                .parse::<bool>()
                .map(serde_json::Value::Bool)
                .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
            // Optional strings: an empty value clears them.
            _ if value.is_empty() => serde_json::Value::Null,
            _ => serde_json::Value::String(value.into()),
        };
        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    /// Default on-disk location.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "config unavailable, using defaults");
            Self::default()
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => Some(String::new()),
            other => Some(other.to_string()),
        }
    }

    /// Every leaf as `(dot.key, value)`, sorted by key.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        let Ok(serde_json::Value::Object(root)) = serde_json::to_value(self) else {
            return out;
        };
        for (section, fields) in &root {
            if let serde_json::Value::Object(fields) = fields {
                for leaf in fields.keys() {
                    let key = format!("{section}.{leaf}");
                    if let Some(value) = self.get(&key) {
                        out.push((key, value));
                    }
                }
            }
        }
        out
    }

    /// Set a value in memory. Rejects unknown keys, badly typed values and
    /// values outside their range.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a value by key and save. Returns error if key is unknown.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.set_value(key, value)?;
        self.save()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let positive = |key: &str, ok: bool| {
            if ok {
                Ok(())
            } else {
                Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "must be at least 1".into(),
                })
            }
        };
        positive("recommend.top_n", self.recommend.top_n >= 1)?;
        positive("history.cap", self.history.cap >= 1)?;
        positive("report.window_days", self.report.window_days >= 1)?;
        if self.report.window_days > MAX_WINDOW_DAYS {
            return Err(ConfigError::InvalidValue {
                key: "report.window_days".into(),
                message: format!("must be at most {MAX_WINDOW_DAYS}"),
            });
        }
        Ok(())
    }

    pub fn quota_gate(&self) -> QuotaGate {
        QuotaGate::new(self.quota.free_daily_limit)
    }

    /// The report window, clamped to `1..=MAX_WINDOW_DAYS` days.
    pub fn report_window(&self) -> Duration {
        Duration::days(self.report.window_days.clamp(1, MAX_WINDOW_DAYS))
    }

    pub fn catalog_path(&self) -> Option<PathBuf> {
        self.catalog
            .path
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    }
}
