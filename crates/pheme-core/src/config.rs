//! Configuration System
//!
//! Loads tuning parameters from pheme.toml so coefficients can be adjusted
//! without recompiling. Every field has a default; a partial file overrides
//! only what it names.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::error::ConfigError;
use crate::systems::{DiffusionConfig, EvolutionConfig};
use crate::transform::TransformConfig;

/// Default tuning file path
pub const DEFAULT_TUNING_PATH: &str = "pheme.toml";

/// Top-level tuning structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub simulation: SimulationConfig,
    pub evolution: EvolutionConfig,
    pub engine: EngineConfig,
}

/// Run parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub seed: u64,
    pub default_ticks: u64,
    /// Ticks between intermediate snapshots; 0 disables them
    pub snapshot_interval: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            default_ticks: 100,
            snapshot_interval: 0,
        }
    }
}

/// Interaction engine parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Characters pass on what they hear to their own neighbors
    pub rediffuse_on_delivery: bool,
    pub transform: TransformConfig,
}

impl EngineConfig {
    pub fn diffusion(&self) -> DiffusionConfig {
        DiffusionConfig {
            rediffuse_on_delivery: self.rediffuse_on_delivery,
        }
    }
}

impl Tuning {
    /// Load tuning from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load tuning from `path`, or use defaults if it is missing or invalid
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::load(path).unwrap_or_else(|e| {
            warn!("could not load {}: {}; using defaults", path.display(), e);
            Self::default()
        })
    }
}
