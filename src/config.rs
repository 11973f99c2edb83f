//! Editor configuration.
//!
//! Settings that tune editing behaviour without changing schedule
//! semantics. Every field has a default, so an empty file is valid:
//!
//! ```toml
//! snap_threshold_ratio = 0.03
//! snapping_enabled = true
//! resize_policy = "in_place"   # or "reflow"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::editing::ResizePolicy;
use crate::error::ConfigError;
use crate::snapping::{Snapper, DEFAULT_SNAP_THRESHOLD_RATIO};

/// Editing behaviour settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Snap distance as a fraction of the major frame.
    pub snap_threshold_ratio: f64,
    /// Whether moves snap to neighbouring edges.
    pub snapping_enabled: bool,
    /// Policy applied by session resizes.
    pub resize_policy: ResizePolicy,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap_threshold_ratio: DEFAULT_SNAP_THRESHOLD_RATIO,
            snapping_enabled: true,
            resize_policy: ResizePolicy::default(),
        }
    }
}

impl EditorConfig {
    /// Parses and validates TOML text.
    ///
    /// # Errors
    /// [`ConfigError::Parse`] for malformed TOML or unknown keys,
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        debug!(?config, "editor config loaded");
        Ok(config)
    }

    /// Reads a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ratio = self.snap_threshold_ratio;
        if !(ratio > 0.0 && ratio < 1.0) {
            return Err(ConfigError::Invalid {
                key: "snap_threshold_ratio",
                message: format!("{ratio} is not in (0, 1)"),
            });
        }
        Ok(())
    }

    /// Snapper configured from these settings.
    pub fn snapper(&self) -> Snapper {
        let snapper = if self.snapping_enabled {
            Snapper::new()
        } else {
            Snapper::disabled()
        };
        snapper.with_threshold_ratio(self.snap_threshold_ratio)
    }
}
