//! Configuration structures for the phonemizer.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{PhonemizerError, PhonemizerResult};
use crate::types::TimeAxis;

/// Top-level phonemizer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhonemizerConfig {
    /// Directory holding plugin-local dictionaries (`<language>.yaml`).
    #[serde(default)]
    pub plugin_dir: Option<PathBuf>,

    /// Directory holding built-in CMU-format dictionaries.
    #[serde(default)]
    pub dictionaries_dir: Option<PathBuf>,

    /// Directory holding neural G2P packs (`<language>/`).
    #[serde(default)]
    pub models_dir: Option<PathBuf>,

    /// Neural predictor settings.
    #[serde(default)]
    pub neural: NeuralConfig,

    /// Timing settings.
    #[serde(default)]
    pub timing: TimingConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PhonemizerConfig {
    /// Parse a configuration from YAML text.
    pub fn from_yaml_str(text: &str) -> PhonemizerResult<Self> {
        serde_yaml::from_str(text)
            .map_err(|e| PhonemizerError::config(format!("invalid configuration: {e}")))
    }

    /// Load a configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> PhonemizerResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&text)
    }
}

/// Neural predictor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeuralConfig {
    /// Enable the neural fallback when a pack is present.
    #[serde(default = "default_neural_enabled")]
    pub enabled: bool,
    /// Maximum decoded length, including the start symbol.
    #[serde(default = "default_max_output_len")]
    pub max_output_len: usize,
}

fn default_neural_enabled() -> bool {
    true
}

fn default_max_output_len() -> usize {
    48
}

impl Default for NeuralConfig {
    fn default() -> Self {
        Self {
            enabled: default_neural_enabled(),
            max_output_len: default_max_output_len(),
        }
    }
}

/// Timing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Beats per minute.
    #[serde(default = "default_bpm")]
    pub bpm: f64,
    /// Note value of one beat.
    #[serde(default = "default_beat_unit")]
    pub beat_unit: u32,
    /// Ticks per quarter note.
    #[serde(default = "default_resolution")]
    pub resolution: u32,
    /// Base transition length in milliseconds before tempo scaling.
    #[serde(default = "default_transition_ms")]
    pub transition_ms: f64,
}

fn default_bpm() -> f64 {
    120.0
}

fn default_beat_unit() -> u32 {
    4
}

fn default_resolution() -> u32 {
    480
}

fn default_transition_ms() -> f64 {
    100.0
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            bpm: default_bpm(),
            beat_unit: default_beat_unit(),
            resolution: default_resolution(),
            transition_ms: default_transition_ms(),
        }
    }
}

impl TimingConfig {
    /// Time axis described by this configuration.
    pub fn time_axis(&self) -> TimeAxis {
        TimeAxis::new(self.bpm, self.beat_unit, self.resolution)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format (json or text).
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}
