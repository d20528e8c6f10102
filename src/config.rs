//! Configuration for the feed arbitration engine.
//!
//! Loaded from `~/.flock/feed.toml` (or an explicit path). All fields use
//! `#[serde(default)]` so partial files are accepted:
//!
//! ```toml
//! debounce_ms = 150
//!
//! [policy]
//! kind = "hysteresis"
//! floor = 0.2
//! bonus = 50.0
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FlockError, Result};

/// Environment variable that overrides `debounce_ms`.
pub const DEBOUNCE_ENV_VAR: &str = "FLOCK_FEED_DEBOUNCE_MS";

/// Get the path to the default feed config file.
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".flock")
        .join("feed.toml")
}

/// How candidates are scored against each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArbitrationPolicy {
    /// Visibility ratio scoring with a bonus for the incumbent.
    Hysteresis {
        #[serde(default = "default_hysteresis_floor")]
        floor: f64,
        #[serde(default = "default_hysteresis_bonus")]
        bonus: f64,
    },

    /// Nearest-to-viewport-centre among sufficiently visible items.
    CenterDistance {
        #[serde(default = "default_center_floor")]
        floor: f64,
    },
}

fn default_hysteresis_floor() -> f64 {
    0.2
}

fn default_hysteresis_bonus() -> f64 {
    50.0
}

fn default_center_floor() -> f64 {
    0.3
}

impl Default for ArbitrationPolicy {
    fn default() -> Self {
        Self::Hysteresis {
            floor: default_hysteresis_floor(),
            bonus: default_hysteresis_bonus(),
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Quiet window after the last visibility report before arbitration runs
    pub debounce_ms: u64,

    /// Viewport height in the same units as reported rects (center policy only)
    pub viewport_height: f64,

    /// Scoring policy (kept last so it serializes as a trailing table)
    pub policy: ArbitrationPolicy,
}

pub(crate) const DEFAULT_VIEWPORT_HEIGHT: f64 = 800.0;

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 200,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            policy: ArbitrationPolicy::default(),
        }
    }
}

impl FeedConfig {
    /// Set the debounce window
    pub fn with_debounce(mut self, window: Duration) -> Self {
        self.debounce_ms = window.as_millis() as u64;
        self
    }

    /// Set the scoring policy
    pub fn with_policy(mut self, policy: ArbitrationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Load config from a TOML file. Missing or malformed files are errors.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| FlockError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config: FeedConfig =
            toml::from_str(&content).map_err(|e| FlockError::ConfigParse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        tracing::info!("[feed] Loaded config from {:?}", path);
        Ok(config.normalized())
    }

    /// Load config from file, or return default if it is absent or unreadable
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!("[feed] Config not found at {:?}, using defaults", path);
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("[feed] {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply `FLOCK_FEED_DEBOUNCE_MS` if it is set to a valid number.
    pub fn with_env_overrides(self) -> Self {
        match std::env::var(DEBOUNCE_ENV_VAR) {
            Ok(raw) => self.with_debounce_override(&raw),
            Err(_) => self,
        }
    }

    fn with_debounce_override(mut self, raw: &str) -> Self {
        match raw.trim().parse::<u64>() {
            Ok(ms) => self.debounce_ms = ms,
            Err(e) => {
                tracing::warn!("[feed] Ignoring {}={:?}: {}", DEBOUNCE_ENV_VAR, raw, e);
            }
        }
        self
    }

    /// Clamp values into their meaningful ranges.
    pub fn normalized(mut self) -> Self {
        self.policy = match self.policy {
            ArbitrationPolicy::Hysteresis { floor, bonus } => ArbitrationPolicy::Hysteresis {
                floor: clamp_unit(floor),
                bonus: if bonus.is_finite() { bonus.max(0.0) } else { 0.0 },
            },
            ArbitrationPolicy::CenterDistance { floor } => ArbitrationPolicy::CenterDistance {
                floor: clamp_unit(floor),
            },
        };
        if !(self.viewport_height.is_finite() && self.viewport_height > 0.0) {
            self.viewport_height = DEFAULT_VIEWPORT_HEIGHT;
        }
        self
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = FeedConfig::default();
        assert_eq!(config.debounce_ms, 200);
        assert_eq!(
            config.policy,
            ArbitrationPolicy::Hysteresis {
                floor: 0.2,
                bonus: 50.0
            }
        );
        assert_eq!(config.debounce(), Duration::from_millis(200));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: FeedConfig = toml::from_str("debounce_ms = 75").unwrap();
        assert_eq!(config.debounce_ms, 75);
        assert_eq!(config.policy, ArbitrationPolicy::default());
        assert_eq!(config.viewport_height, DEFAULT_VIEWPORT_HEIGHT);
    }

    #[test]
    fn test_center_policy_from_toml() {
        let config: FeedConfig = toml::from_str(
            r#"
            viewport_height = 640.0

            [policy]
            kind = "center_distance"
            "#,
        )
        .unwrap();
        assert_eq!(config.policy, ArbitrationPolicy::CenterDistance { floor: 0.3 });
        assert_eq!(config.viewport_height, 640.0);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("feed.toml");
        let config = FeedConfig::default()
            .with_debounce(Duration::from_millis(120))
            .with_policy(ArbitrationPolicy::CenterDistance { floor: 0.4 });

        config.save(&path).unwrap();
        let loaded = FeedConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = FeedConfig::load(&temp_dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, FlockError::ConfigIo { .. }));
    }

    #[test]
    fn test_load_or_default_on_garbage() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("feed.toml");
        std::fs::write(&path, "debounce_ms = \"soon\"").unwrap();

        assert!(matches!(
            FeedConfig::load(&path),
            Err(FlockError::ConfigParse { .. })
        ));
        assert_eq!(FeedConfig::load_or_default(&path), FeedConfig::default());
    }

    #[test]
    fn test_normalized_clamps_values() {
        let config = FeedConfig {
            debounce_ms: 10,
            policy: ArbitrationPolicy::Hysteresis {
                floor: 1.7,
                bonus: -3.0,
            },
            viewport_height: -1.0,
        }
        .normalized();

        assert_eq!(
            config.policy,
            ArbitrationPolicy::Hysteresis {
                floor: 1.0,
                bonus: 0.0
            }
        );
        assert_eq!(config.viewport_height, DEFAULT_VIEWPORT_HEIGHT);
    }

    #[test]
    fn test_debounce_override() {
        let config = FeedConfig::default().with_debounce_override(" 350 ");
        assert_eq!(config.debounce_ms, 350);

        let config = FeedConfig::default().with_debounce_override("fast");
        assert_eq!(config.debounce_ms, 200);
    }
}
