//! Configuration management for the head direction pipeline

use crate::constants::{
    DEFAULT_AMBIGUITY_THRESHOLD_DEG, DEFAULT_FRAME_COUNT, DEFAULT_GAP_RESET_FRAMES,
    DEFAULT_SMOOTHING_RADIUS, DEFAULT_STIMULUS_ONSET_FRAME,
};
use crate::disambiguation::Disambiguator;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Disambiguation configuration
    pub disambiguation: DisambiguationConfig,

    /// Smoothing configuration
    pub smoothing: SmoothingConfig,

    /// Trial layout configuration
    pub trial: TrialConfig,
}

/// Disambiguation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisambiguationConfig {
    /// Frames without an acceptance before the rolling history resets
    pub gap_reset_frames: usize,

    /// Rejection threshold in degrees (0-180)
    pub ambiguity_threshold_deg: f64,
}

/// Smoothing parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmoothingConfig {
    /// Window radius in frames (window covers 2 * radius + 1 frames)
    pub radius: usize,
}

/// Trial layout parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialConfig {
    /// Frames per trial video
    pub frame_count: usize,

    /// Frame at which the stimulus is played
    pub stimulus_onset_frame: usize,

    /// First frame index of a trial (0 or 1)
    pub base_index: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            disambiguation: DisambiguationConfig::default(),
            smoothing: SmoothingConfig::default(),
            trial: TrialConfig::default(),
        }
    }
}

impl Default for DisambiguationConfig {
    fn default() -> Self {
        Self {
            gap_reset_frames: DEFAULT_GAP_RESET_FRAMES,
            ambiguity_threshold_deg: DEFAULT_AMBIGUITY_THRESHOLD_DEG,
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_SMOOTHING_RADIUS,
        }
    }
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            frame_count: DEFAULT_FRAME_COUNT,
            stimulus_onset_frame: DEFAULT_STIMULUS_ONSET_FRAME,
            base_index: 0,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Create a disambiguator from configuration
    #[must_use]
    pub fn create_disambiguator(&self) -> Disambiguator {
        Disambiguator::new(
            self.disambiguation.gap_reset_frames,
            self.disambiguation.ambiguity_threshold_deg,
        )
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.disambiguation.gap_reset_frames == 0 {
            return Err(Error::ConfigError(
                "Gap reset frames must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=180.0).contains(&self.disambiguation.ambiguity_threshold_deg)
            || self.disambiguation.ambiguity_threshold_deg == 0.0
        {
            return Err(Error::ConfigError(
                "Ambiguity threshold must be in (0, 180]".to_string(),
            ));
        }
        if self.smoothing.radius == 0 {
            return Err(Error::ConfigError(
                "Smoothing radius must be greater than 0".to_string(),
            ));
        }
        if self.trial.frame_count == 0 {
            return Err(Error::ConfigError(
                "Frame count must be greater than 0".to_string(),
            ));
        }
        if self.trial.stimulus_onset_frame >= self.trial.base_index + self.trial.frame_count {
            return Err(Error::ConfigError(
                "Stimulus onset frame must fall inside the trial".to_string(),
            ));
        }
        if self.trial.base_index > 1 {
            return Err(Error::ConfigError(
                "Base index must be 0 or 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Head Direction Pipeline Configuration

# Disambiguation of the two-fold marker readings
disambiguation:
  gap_reset_frames: 10
  ambiguity_threshold_deg: 45.0

# Display-series smoothing
smoothing:
  radius: 10

# Trial video layout
trial:
  frame_count: 1000
  stimulus_onset_frame: 500
  base_index: 0
"#;
