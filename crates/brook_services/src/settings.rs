//! Settings management
//!
//! One JSON document holds the buffer config, the physical parameters and the
//! host controls. Missing fields fall back to defaults.

use brook_core::{SimulationConfig, SimulationError, SimulationParams};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings from {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

/// Engine settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub simulation: SimulationConfig,
    pub params: SimulationParams,
    pub controls: ControlSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSettings {
    pub wind_strength: f32,
    /// Particles streamed per frame while spawning is held.
    pub particles_per_frame: usize,
    /// Particles placed by one burst.
    pub burst_count: usize,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            wind_strength: 1.0,
            particles_per_frame: 50,
            burst_count: 50,
        }
    }
}

impl Settings {
    pub fn from_json(path: &Path, text: &str) -> Result<Self, SettingsError> {
        let settings: Settings =
            serde_json::from_str(text).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.simulation.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(path, &text)
    }

    /// Load `path`, or fall back to defaults with a warning.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => {
                tracing::info!(path = %path.display(), "loaded settings");
                settings
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, text).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
