//! Simulation configuration
//!
//! Validated at construction time; persisted as JSON next to the binary.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// What the solo loop does when the body touches an obstacle or leaves the
/// vertical play bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CollisionPolicy {
    /// Record the contact and keep running (matches the historical behavior,
    /// where the collision result was computed and discarded)
    #[default]
    Observe,
    /// Terminate the run on contact
    EndRun,
}

/// Configuration rejected at construction time
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("gap anchor range {min}..{max} is empty")]
    EmptyAnchorRange { min: i32, max: i32 },
    #[error("gap anchors {min}..{max} with gap height {gap} do not fit above the ground at {ground}")]
    AnchorOutOfBounds {
        min: i32,
        max: i32,
        gap: i32,
        ground: i32,
    },
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Simulation parameters that vary between runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Inclusive lower bound of the gap anchor range
    pub gap_anchor_min: i32,
    /// Exclusive upper bound of the gap anchor range
    pub gap_anchor_max: i32,
    /// Vertical extent of the gap between the two pipe silhouettes
    pub gap_height: i32,
    /// Solo-loop contact behavior
    pub collision_policy: CollisionPolicy,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gap_anchor_min: GAP_ANCHOR_MIN,
            gap_anchor_max: GAP_ANCHOR_MAX,
            gap_height: GAP_HEIGHT,
            collision_policy: CollisionPolicy::default(),
        }
    }
}

impl SimConfig {
    /// Reject anchor ranges that are empty or that place a gap outside the
    /// playfield. Sim constructors call this before touching the RNG.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gap_anchor_min >= self.gap_anchor_max {
            return Err(ConfigError::EmptyAnchorRange {
                min: self.gap_anchor_min,
                max: self.gap_anchor_max,
            });
        }
        if self.gap_anchor_min < 0 || self.gap_anchor_max + self.gap_height > GROUND_Y {
            return Err(ConfigError::AnchorOutOfBounds {
                min: self.gap_anchor_min,
                max: self.gap_anchor_max,
                gap: self.gap_height,
                ground: GROUND_Y,
            });
        }
        Ok(())
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file, falling back to defaults if it is missing or bad
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => {
                log::info!("loaded config from {}", path.display());
                config
            }
            Err(err) => {
                log::warn!("using default config ({err})");
                Self::default()
            }
        }
    }

    /// Write the config as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
