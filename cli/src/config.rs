//! Configuration management for the voxid command.
//!
//! Configuration is stored in ~/.voxid/config.yaml and created with
//! defaults on first load:
//!
//! ```yaml
//! matching:
//!   enabled: true
//!   threshold: 0.75
//!   min_segment_secs: 2.0
//!   max_segments: 10
//! enrollment:
//!   min_duration_secs: 10.0
//!   max_duration_secs: 60.0
//! store_dir: ~/voices   # optional, defaults to ~/.voxid/speakers
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::paths::Paths;

/// Keys accepted by [`Config::set`].
pub const SETTABLE_KEYS: &[&str] = &[
    "matching.enabled",
    "matching.threshold",
    "matching.min_segment_secs",
    "matching.max_segments",
    "enrollment.min_duration_secs",
    "enrollment.max_duration_secs",
    "store_dir",
];

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub matching: MatchingSettings,

    #[serde(default)]
    pub enrollment: EnrollmentSettings,

    /// Profile store directory; `~/` is expanded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_dir: Option<PathBuf>,

    /// Path to the config file (not serialized).
    #[serde(skip)]
    config_path: PathBuf,
}

/// Speaker matching settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_threshold")]
    pub threshold: f32,

    #[serde(default = "default_min_segment_secs")]
    pub min_segment_secs: f64,

    #[serde(default = "default_max_segments")]
    pub max_segments: usize,
}

/// Enrollment sample bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentSettings {
    #[serde(default = "default_min_duration")]
    pub min_duration_secs: f64,

    #[serde(default = "default_max_duration")]
    pub max_duration_secs: f64,
}

fn default_true() -> bool {
    true
}

fn default_threshold() -> f32 {
    0.75
}

fn default_min_segment_secs() -> f64 {
    2.0
}

fn default_max_segments() -> usize {
    10
}

fn default_min_duration() -> f64 {
    10.0
}

fn default_max_duration() -> f64 {
    60.0
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            threshold: default_threshold(),
            min_segment_secs: default_min_segment_secs(),
            max_segments: default_max_segments(),
        }
    }
}

impl Default for EnrollmentSettings {
    fn default() -> Self {
        Self {
            min_duration_secs: default_min_duration(),
            max_duration_secs: default_max_duration(),
        }
    }
}

impl Config {
    /// Returns the config file path.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Saves the configuration to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&self.config_path, content)?;
        Ok(())
    }

    /// Resolves the profile store directory.
    pub fn resolve_store_dir(&self, paths: &Paths) -> PathBuf {
        match &self.store_dir {
            Some(dir) => paths.expand(dir),
            None => paths.store_dir(),
        }
    }

    /// Checks value ranges.
    pub fn validate(&self) -> anyhow::Result<()> {
        let m = &self.matching;
        if !(0.0..=1.0).contains(&m.threshold) {
            anyhow::bail!("matching.threshold must lie in [0, 1], got {}", m.threshold);
        }
        if m.max_segments == 0 {
            anyhow::bail!("matching.max_segments must be at least 1");
        }
        if !m.min_segment_secs.is_finite() || m.min_segment_secs < 0.0 {
            anyhow::bail!("matching.min_segment_secs must be >= 0, got {}", m.min_segment_secs);
        }
        let e = &self.enrollment;
        if !(e.min_duration_secs >= 0.0 && e.min_duration_secs <= e.max_duration_secs) {
            anyhow::bail!(
                "enrollment bounds [{}, {}] are invalid",
                e.min_duration_secs,
                e.max_duration_secs
            );
        }
        Ok(())
    }

    /// Sets a value by dotted key. The config is validated but not saved.
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut next = self.clone();
        match key {
            "matching.enabled" => next.matching.enabled = parse(key, value)?,
            "matching.threshold" => next.matching.threshold = parse(key, value)?,
            "matching.min_segment_secs" => next.matching.min_segment_secs = parse(key, value)?,
            "matching.max_segments" => next.matching.max_segments = parse(key, value)?,
            "enrollment.min_duration_secs" => next.enrollment.min_duration_secs = parse(key, value)?,
            "enrollment.max_duration_secs" => next.enrollment.max_duration_secs = parse(key, value)?,
            "store_dir" => {
                next.store_dir = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                }
            }
            _ => anyhow::bail!(
                "unknown config key '{}' (expected one of: {})",
                key,
                SETTABLE_KEYS.join(", ")
            ),
        }
        next.validate()?;
        *self = next;
        Ok(())
    }
}

fn parse<T>(key: &str, value: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid value '{}' for {}: {}", value, key, e))
}

/// Loads configuration, creating a default file if none exists.
pub fn load_config(custom_path: Option<&Path>) -> anyhow::Result<Config> {
    let config_path = match custom_path {
        Some(p) => p.to_path_buf(),
        None => Paths::new()?.config_file(),
    };

    // Ensure config directory exists
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut cfg: Config = if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(&content)?
        }
    } else {
        let cfg = Config::default();
        std::fs::write(&config_path, serde_yaml::to_string(&cfg)?)?;
        cfg
    };

    cfg.config_path = config_path;
    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_creates_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let cfg = load_config(Some(&path)).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.path(), path.as_path());
        assert!(cfg.matching.enabled);
        assert_eq!(cfg.matching.threshold, 0.75);
        assert_eq!(cfg.enrollment.max_duration_secs, 60.0);
        assert!(cfg.store_dir.is_none());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "matching:\n  threshold: 0.8\n").unwrap();

        let cfg = load_config(Some(&path)).unwrap();
        assert_eq!(cfg.matching.threshold, 0.8);
        assert!(cfg.matching.enabled);
        assert_eq!(cfg.matching.max_segments, 10);
        assert_eq!(cfg.enrollment.min_duration_secs, 10.0);
    }

    #[test]
    fn test_set_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        let mut cfg = load_config(Some(&path)).unwrap();
        cfg.set("matching.threshold", "0.6").unwrap();
        cfg.set("matching.enabled", "false").unwrap();
        cfg.set("store_dir", "~/voices").unwrap();
        cfg.save().unwrap();

        let reloaded = load_config(Some(&path)).unwrap();
        assert_eq!(reloaded.matching.threshold, 0.6);
        assert!(!reloaded.matching.enabled);
        assert_eq!(reloaded.store_dir, Some(PathBuf::from("~/voices")));

        let paths = Paths::with_home("/home/u");
        assert_eq!(reloaded.resolve_store_dir(&paths), PathBuf::from("/home/u/voices"));
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut cfg = Config::default();
        assert!(cfg.set("matching.threshold", "1.5").is_err());
        assert!(cfg.set("matching.threshold", "high").is_err());
        assert!(cfg.set("enrollment.min_duration_secs", "90").is_err());
        assert!(cfg.set("no.such.key", "1").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_default_store_dir() {
        let cfg = Config::default();
        let paths = Paths::with_home("/home/u");
        assert_eq!(cfg.resolve_store_dir(&paths), PathBuf::from("/home/u/.voxid/speakers"));
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "matching:\n  threshold: 3\n").unwrap();
        assert!(load_config(Some(&path)).is_err());
    }
}
