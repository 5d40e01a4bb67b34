//! Configuration management for calibration tuning
//!
//! Runtime configuration is loaded from a JSON file so click thresholds and
//! the sampling window can be adjusted without recompiling. Missing or
//! invalid files fall back to the defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::calibration::DEFAULT_CLICKS_PER_TARGET;
use crate::precision::REQUIRED_SAMPLES;

/// Default location of the config file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config/gaze_calibration.json";

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub calibration: CalibrationConfig,
    #[serde(default)]
    pub measurement: MeasurementConfig,
}

/// Calibration click configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Clicks needed before a target counts as calibrated
    pub clicks_per_target: u32,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            clicks_per_target: DEFAULT_CLICKS_PER_TARGET,
        }
    }
}

/// Precision measurement configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementConfig {
    /// How long predictions are stored while the user stares at the center
    pub sampling_window_ms: u64,
    /// Predictions the estimator expects per axis
    pub sample_count: usize,
}

impl Default for MeasurementConfig {
    fn default() -> Self {
        Self {
            sampling_window_ms: 5_000,
            sample_count: REQUIRED_SAMPLES,
        }
    }
}

impl MeasurementConfig {
    pub fn sampling_window(&self) -> Duration {
        Duration::from_millis(self.sampling_window_ms)
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The parsed configuration, or the defaults if the file is missing or invalid
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Load configuration from the default path
    pub fn load() -> Self {
        Self::load_from_file(DEFAULT_CONFIG_PATH)
    }
}
