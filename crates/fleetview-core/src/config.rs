//! Configuration types for heading estimation, camera follow and logging
//!
//! Every section deserializes with defaults for missing fields, so a
//! partial JSON document is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{FleetError, Result};

/// Default minimum reported speed for credible motion (km/h)
pub const DEFAULT_MIN_SPEED_KMH: f64 = 5.0;

/// Default minimum displacement for credible motion (meters)
pub const DEFAULT_MIN_DISTANCE_METERS: f64 = 10.0;

/// Default displacement below which movement is treated as GPS noise (meters)
pub const DEFAULT_JITTER_DISTANCE_METERS: f64 = 5.0;

/// Default number of segment bearings averaged into a heading
pub const DEFAULT_MAX_BEARINGS: usize = 3;

/// Default rotation needed before the displayed heading changes (degrees)
pub const DEFAULT_MIN_HEADING_DELTA: f64 = 15.0;

/// Default longest time the displayed heading may be held unchanged
pub const DEFAULT_MAX_HEADING_HOLD: Duration = Duration::from_millis(5000);

/// Default interpolation factor towards a newly accepted heading
pub const DEFAULT_SMOOTHING_FACTOR: f64 = 0.35;

/// Default quiet period after a manual selection
pub const DEFAULT_SELECTION_SETTLE: Duration = Duration::from_millis(1500);

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FleetConfig {
    /// Heading estimation and gating
    #[serde(default)]
    pub heading: HeadingConfig,

    /// Follow-camera behavior
    #[serde(default)]
    pub camera: CameraConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl FleetConfig {
    /// Parse and validate a JSON configuration document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: FleetConfig = serde_json::from_str(json)
            .map_err(|e| FleetError::Deserialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(FleetError::ConfigNotFound(path.display().to_string()));
        }
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Pretty JSON rendering
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every section
    pub fn validate(&self) -> Result<()> {
        self.heading.validate()
    }
}

/// Heading estimation and update-gate options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingConfig {
    /// Reported speed at or above which motion is credible (km/h)
    #[serde(default = "default_min_speed_kmh")]
    pub min_speed_kmh: f64,

    /// Displacement at or above which motion is credible (meters)
    #[serde(default = "default_min_distance_meters")]
    pub min_distance_meters: f64,

    /// Displacement below which a segment is treated as noise (meters)
    #[serde(default = "default_jitter_distance_meters")]
    pub jitter_distance_meters: f64,

    /// Maximum number of segment bearings averaged together
    #[serde(default = "default_max_bearings")]
    pub max_bearings: usize,

    /// Minimum rotation that replaces the displayed heading (degrees)
    #[serde(default = "default_min_heading_delta")]
    pub min_heading_delta: f64,

    /// Displayed heading is refreshed at least this often
    #[serde(with = "humantime_serde", default = "default_max_heading_hold")]
    pub max_heading_hold: Duration,

    /// Fraction of the remaining rotation applied per accepted update
    #[serde(default = "default_smoothing_factor")]
    pub smoothing_factor: f64,
}

fn default_min_speed_kmh() -> f64 {
    DEFAULT_MIN_SPEED_KMH
}

fn default_min_distance_meters() -> f64 {
    DEFAULT_MIN_DISTANCE_METERS
}

fn default_jitter_distance_meters() -> f64 {
    DEFAULT_JITTER_DISTANCE_METERS
}

fn default_max_bearings() -> usize {
    DEFAULT_MAX_BEARINGS
}

fn default_min_heading_delta() -> f64 {
    DEFAULT_MIN_HEADING_DELTA
}

fn default_max_heading_hold() -> Duration {
    DEFAULT_MAX_HEADING_HOLD
}

fn default_smoothing_factor() -> f64 {
    DEFAULT_SMOOTHING_FACTOR
}

impl Default for HeadingConfig {
    fn default() -> Self {
        Self {
            min_speed_kmh: DEFAULT_MIN_SPEED_KMH,
            min_distance_meters: DEFAULT_MIN_DISTANCE_METERS,
            jitter_distance_meters: DEFAULT_JITTER_DISTANCE_METERS,
            max_bearings: DEFAULT_MAX_BEARINGS,
            min_heading_delta: DEFAULT_MIN_HEADING_DELTA,
            max_heading_hold: DEFAULT_MAX_HEADING_HOLD,
            smoothing_factor: DEFAULT_SMOOTHING_FACTOR,
        }
    }
}

impl HeadingConfig {
    /// Hold window in milliseconds
    pub fn max_heading_hold_ms(&self) -> i64 {
        i64::try_from(self.max_heading_hold.as_millis()).unwrap_or(i64::MAX)
    }

    /// Reject values the estimator and gate cannot work with
    pub fn validate(&self) -> Result<()> {
        let thresholds = [
            ("min_speed_kmh", self.min_speed_kmh),
            ("min_distance_meters", self.min_distance_meters),
            ("jitter_distance_meters", self.jitter_distance_meters),
            ("min_heading_delta", self.min_heading_delta),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(FleetError::InvalidConfig(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        if self.max_bearings == 0 {
            return Err(FleetError::InvalidConfig(
                "max_bearings must be at least 1".to_string(),
            ));
        }

        if !(self.smoothing_factor > 0.0 && self.smoothing_factor <= 1.0) {
            return Err(FleetError::InvalidConfig(format!(
                "smoothing_factor must be in (0, 1], got {}",
                self.smoothing_factor
            )));
        }

        Ok(())
    }
}

/// Follow-camera options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Camera moves are suppressed for this long after a manual selection
    #[serde(with = "humantime_serde", default = "default_selection_settle")]
    pub selection_settle: Duration,

    /// Rotate the map to the followed device's heading
    #[serde(default = "default_rotate_with_heading")]
    pub rotate_with_heading: bool,
}

fn default_selection_settle() -> Duration {
    DEFAULT_SELECTION_SETTLE
}

fn default_rotate_with_heading() -> bool {
    true
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            selection_settle: DEFAULT_SELECTION_SETTLE,
            rotate_with_heading: true,
        }
    }
}

impl CameraConfig {
    /// Settle window in milliseconds
    pub fn selection_settle_ms(&self) -> i64 {
        i64::try_from(self.selection_settle.as_millis()).unwrap_or(i64::MAX)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default)]
    pub level: LogLevel,
}

/// Log level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Builder for FleetConfig
#[derive(Debug, Default)]
pub struct FleetConfigBuilder {
    config: FleetConfig,
}

impl FleetConfigBuilder {
    /// Create a new builder with defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_speed_kmh(mut self, kmh: f64) -> Self {
        self.config.heading.min_speed_kmh = kmh;
        self
    }

    pub fn min_distance_meters(mut self, meters: f64) -> Self {
        self.config.heading.min_distance_meters = meters;
        self
    }

    pub fn jitter_distance_meters(mut self, meters: f64) -> Self {
        self.config.heading.jitter_distance_meters = meters;
        self
    }

    pub fn max_bearings(mut self, count: usize) -> Self {
        self.config.heading.max_bearings = count;
        self
    }

    pub fn min_heading_delta(mut self, degrees: f64) -> Self {
        self.config.heading.min_heading_delta = degrees;
        self
    }

    pub fn max_heading_hold(mut self, hold: Duration) -> Self {
        self.config.heading.max_heading_hold = hold;
        self
    }

    pub fn smoothing_factor(mut self, factor: f64) -> Self {
        self.config.heading.smoothing_factor = factor;
        self
    }

    pub fn selection_settle(mut self, settle: Duration) -> Self {
        self.config.camera.selection_settle = settle;
        self
    }

    pub fn rotate_with_heading(mut self, enabled: bool) -> Self {
        self.config.camera.rotate_with_heading = enabled;
        self
    }

    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    /// Validate and build the configuration
    pub fn build(self) -> Result<FleetConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

// Custom serde module for Duration with humantime
mod humantime_serde {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = humantime::format_duration(*duration).to_string();
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        humantime::parse_duration(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = FleetConfig::default();
        assert_eq!(config.heading.min_speed_kmh, 5.0);
        assert_eq!(config.heading.min_distance_meters, 10.0);
        assert_eq!(config.heading.jitter_distance_meters, 5.0);
        assert_eq!(config.heading.max_bearings, 3);
        assert_eq!(config.heading.min_heading_delta, 15.0);
        assert_eq!(config.heading.max_heading_hold_ms(), 5000);
        assert_eq!(config.heading.smoothing_factor, 0.35);
        assert!(config.camera.rotate_with_heading);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = FleetConfig::from_json_str(
            r#"{"heading": {"max_heading_hold": "2s", "max_bearings": 5}}"#,
        )
        .unwrap();

        assert_eq!(config.heading.max_heading_hold, Duration::from_secs(2));
        assert_eq!(config.heading.max_bearings, 5);
        assert_eq!(config.heading.min_heading_delta, DEFAULT_MIN_HEADING_DELTA);
        assert_eq!(config.camera.selection_settle, DEFAULT_SELECTION_SETTLE);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_config_serialization() {
        let config = FleetConfigBuilder::new()
            .max_heading_hold(Duration::from_millis(2500))
            .log_level(LogLevel::Debug)
            .build()
            .unwrap();
        let json = config.to_json_pretty().unwrap();
        let recovered = FleetConfig::from_json_str(&json).unwrap();

        assert_eq!(recovered.heading, config.heading);
        assert_eq!(recovered.logging.level, LogLevel::Debug);
    }

    #[test]
    fn test_invalid_smoothing_factor() {
        let err = FleetConfigBuilder::new().smoothing_factor(0.0).build().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");

        assert!(FleetConfigBuilder::new().smoothing_factor(1.5).build().is_err());
        assert!(FleetConfigBuilder::new().smoothing_factor(1.0).build().is_ok());
    }

    #[test]
    fn test_invalid_thresholds() {
        assert!(FleetConfigBuilder::new().max_bearings(0).build().is_err());
        assert!(FleetConfigBuilder::new().min_distance_meters(-1.0).build().is_err());
        assert!(FleetConfigBuilder::new().min_speed_kmh(f64::NAN).build().is_err());
    }

    #[test]
    fn test_bad_json_is_deserialization_error() {
        let err = FleetConfig::from_json_str("{ not json").unwrap_err();
        assert_eq!(err.error_code(), "DESERIALIZATION_ERROR");

        let err = FleetConfig::from_json_str(r#"{"heading": {"max_heading_hold": "soon"}}"#)
            .unwrap_err();
        assert_eq!(err.error_code(), "DESERIALIZATION_ERROR");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"camera": {{"rotate_with_heading": false}}}}"#).unwrap();

        let config = FleetConfig::load(file.path()).unwrap();
        assert!(!config.camera.rotate_with_heading);
    }

    #[test]
    fn test_load_missing_file() {
        let err = FleetConfig::load("/nonexistent/fleetview.json").unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_NOT_FOUND");
    }
}
