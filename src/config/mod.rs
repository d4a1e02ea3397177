//! Configuration Management
//!
//! Per-detector tunables plus the URL blacklist. The config is supplied
//! externally and read-only to the recognition core: detectors hold a
//! [`SharedGestureConfig`] handle and read it at decision points, never
//! caching values across a decision boundary.

pub mod blacklist;

use crate::event::types::{ModifierKey, MouseButton};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

pub use blacklist::UrlBlacklist;

/// Externally-mutable handle to the gesture configuration
pub type SharedGestureConfig = Arc<RwLock<GestureConfig>>;

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GestureConfig {
    /// Drag gesture settings
    pub drag: DragConfig,
    /// Wheel gesture settings
    pub wheel: WheelConfig,
    /// Rocker gesture settings
    pub rocker: RockerConfig,
    /// Pattern extraction settings
    pub pattern: PatternConfig,
    /// Ordered URL glob patterns on which all detectors are disabled
    #[serde(default)]
    pub blacklist: Vec<String>,
}

/// Drag gesture configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DragConfig {
    /// Whether drag gestures are recognized at all
    pub enabled: bool,
    /// Mouse button whose press initiates tracking
    pub trigger_button: MouseButton,
    /// Modifier key that disables initiation / aborts tracking
    pub suppression_key: ModifierKey,
    /// Distance from the initiating point before a gesture starts (pixels)
    pub distance_threshold_px: f64,
    /// Abort an active gesture after this much inactivity
    pub timeout_enabled: bool,
    /// Inactivity timeout (milliseconds)
    pub timeout_ms: u64,
}

/// Wheel gesture configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WheelConfig {
    pub enabled: bool,
    /// Button that must be held while scrolling
    pub trigger_button: MouseButton,
    /// Accumulated delta required to fire (accumulated-delta units)
    pub sensitivity: f64,
}

/// Rocker gesture configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RockerConfig {
    pub enabled: bool,
}

/// Pattern extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternConfig {
    /// Minimum displacement before a movement is considered (pixels)
    pub distance_threshold_px: f64,
    /// Angular difference before a new segment is extracted,
    /// normalized so that 1 = opposite direction
    pub angle_threshold: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            trigger_button: MouseButton::Right,
            suppression_key: ModifierKey::None,
            distance_threshold_px: 10.0,
            timeout_enabled: true,
            timeout_ms: 1000,
        }
    }
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            trigger_button: MouseButton::Right,
            sensitivity: 2.0,
        }
    }
}

impl Default for RockerConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            distance_threshold_px: 10.0,
            angle_threshold: 0.3,
        }
    }
}

impl GestureConfig {
    /// Validate config values are within acceptable ranges.
    /// Returns Ok(()) if valid, or Err with a description of the first invalid field.
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.drag.distance_threshold_px <= 0.0 || self.drag.distance_threshold_px > 1000.0 {
            return Err(crate::Error::Config(format!(
                "drag.distance_threshold_px must be in (0, 1000], got {}",
                self.drag.distance_threshold_px
            )));
        }
        if self.drag.timeout_enabled && self.drag.timeout_ms == 0 {
            return Err(crate::Error::Config(
                "drag.timeout_ms must be > 0 when the timeout is enabled".to_string(),
            ));
        }
        if self.wheel.sensitivity <= 0.0 {
            return Err(crate::Error::Config(format!(
                "wheel.sensitivity must be > 0, got {}",
                self.wheel.sensitivity
            )));
        }
        if self.pattern.distance_threshold_px < 0.0 || self.pattern.distance_threshold_px > 1000.0 {
            return Err(crate::Error::Config(format!(
                "pattern.distance_threshold_px must be in [0, 1000], got {}",
                self.pattern.distance_threshold_px
            )));
        }
        if !(0.0..=1.0).contains(&self.pattern.angle_threshold) {
            return Err(crate::Error::Config(format!(
                "pattern.angle_threshold must be in [0, 1], got {}",
                self.pattern.angle_threshold
            )));
        }
        Ok(())
    }

    /// Load config from file
    pub fn load(path: &PathBuf) -> Result<Self, crate::Error> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from the default location, falling back to defaults
    pub fn load_default() -> Result<Self, crate::Error> {
        let path = Self::default_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to file
    pub fn save(&self, path: &PathBuf) -> Result<(), crate::Error> {
        let content = toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Save to the default location
    pub fn save_default(&self) -> Result<(), crate::Error> {
        self.save(&Self::default_path())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".pointer_gestures").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Generate TOML representation
    pub fn to_toml(&self) -> Result<String, crate::Error> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Wrap in the shared, externally-mutable handle the detectors hold
    pub fn into_shared(self) -> SharedGestureConfig {
        Arc::new(RwLock::new(self))
    }

    /// Compile the blacklist patterns into a matcher
    pub fn compile_blacklist(&self) -> UrlBlacklist {
        UrlBlacklist::new(&self.blacklist)
    }
}
