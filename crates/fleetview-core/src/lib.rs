//! Fleetview Core - Geo math and heading estimation for the live fleet map
//!
//! This crate turns a stream of position reports into a stable heading the
//! map can rotate markers and the follow camera by.
//!
//! # Modules
//!
//! - [`geo`] - Haversine distance, bearings and angle arithmetic
//! - [`sample`] - Position samples and the bounded position buffer
//! - [`heading`] - Heading candidate estimator and display update gate
//! - [`config`] - Configuration types
//! - [`error`] - Error types
//!
//! # Example
//!
//! ```rust
//! use fleetview_core::{estimate_heading, HeadingConfig, PositionBuffer, PositionSample};
//!
//! let config = HeadingConfig::default();
//! let mut buffer = PositionBuffer::for_bearings(config.max_bearings);
//!
//! buffer.push(PositionSample::new(52.0, 13.0));
//! let latest = PositionSample::new(52.0, 13.001).with_speed(20.0);
//! buffer.push(latest);
//!
//! let candidate = estimate_heading(buffer.as_slice(), &latest, &config);
//! assert!(candidate.is_ready());
//! ```

pub mod config;
pub mod error;
pub mod geo;
pub mod heading;
pub mod sample;

// Re-exports for convenience
pub use error::{FleetError, Result};

pub use config::{
    CameraConfig, FleetConfig, FleetConfigBuilder, HeadingConfig, LogLevel, LoggingConfig,
};

pub use geo::{
    angular_diff, average_angles, bearing, distance_meters, normalize_angle,
    shortest_angle_delta, speed_knots_to_kmh, GeoPoint,
};

pub use heading::{
    estimate_heading, should_update_heading, smooth_heading, HeadingCandidate, HeadingStatus,
};

pub use sample::{PositionBuffer, PositionSample};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Current time as Unix milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
