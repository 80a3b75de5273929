//! Geographic math on a spherical Earth
//!
//! Distances use the haversine formula, bearings the standard initial
//! great-circle bearing. All angles are in degrees.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Kilometers per hour in one knot
pub const KMH_PER_KNOT: f64 = 1.852;

/// Geographic point in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a new point
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Calculate distance to another point in meters (Haversine formula)
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        distance_meters(self, other)
    }

    /// Initial bearing towards another point
    pub fn bearing_to(&self, other: &GeoPoint) -> f64 {
        bearing(self, other)
    }
}

/// Map any degree value into `[0, 360)`.
pub fn normalize_angle(angle: f64) -> f64 {
    let normalized = angle.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Signed minimal rotation from `from` to `to`, in `(-180, 180]`.
pub fn shortest_angle_delta(from: f64, to: f64) -> f64 {
    let delta = normalize_angle(to - from);
    if delta > 180.0 {
        delta - 360.0
    } else {
        delta
    }
}

/// Unsigned minimal rotation between two angles, in `[0, 180]`.
pub fn angular_diff(from: f64, to: f64) -> f64 {
    shortest_angle_delta(from, to).abs()
}

/// Great-circle distance in meters
pub fn distance_meters(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Initial bearing from `a` to `b` in `[0, 360)`.
///
/// Coincident points have no defined bearing; the result is still a
/// normalized angle (0 in practice).
pub fn bearing(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();

    normalize_angle(y.atan2(x).to_degrees())
}

/// Convert a speed in knots to km/h. Missing or non-finite speeds count as 0.
pub fn speed_knots_to_kmh(knots: Option<f64>) -> f64 {
    match knots {
        Some(v) if v.is_finite() => v * KMH_PER_KNOT,
        _ => 0.0,
    }
}

/// Circular mean of a set of angles, `None` when empty.
pub fn average_angles(angles: &[f64]) -> Option<f64> {
    if angles.is_empty() {
        return None;
    }

    let (sin_sum, cos_sum) = angles.iter().fold((0.0_f64, 0.0_f64), |(s, c), angle| {
        let rad = angle.to_radians();
        (s + rad.sin(), c + rad.cos())
    });
    let count = angles.len() as f64;

    Some(normalize_angle(
        (sin_sum / count).atan2(cos_sum / count).to_degrees(),
    ))
}
