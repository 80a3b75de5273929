//! Position samples and the rolling buffer the heading estimator reads

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// A single position report for a device
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    /// Reported location
    #[serde(flatten)]
    pub point: GeoPoint,
    /// Ground speed in knots
    #[serde(default)]
    pub speed: Option<f64>,
    /// Device-reported course in degrees
    #[serde(default)]
    pub course: Option<f64>,
    /// Fix time as Unix milliseconds
    #[serde(default)]
    pub fix_time: Option<i64>,
}

impl PositionSample {
    /// Create a sample with only a location
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            point: GeoPoint::new(latitude, longitude),
            speed: None,
            course: None,
            fix_time: None,
        }
    }

    /// Set the reported speed in knots
    pub fn with_speed(mut self, knots: f64) -> Self {
        self.speed = Some(knots);
        self
    }

    /// Set the reported course in degrees
    pub fn with_course(mut self, course: f64) -> Self {
        self.course = Some(course);
        self
    }

    /// Set the fix time
    pub fn with_fix_time(mut self, millis: i64) -> Self {
        self.fix_time = Some(millis);
        self
    }

    /// Course usable as a heading: finite and non-negative
    pub fn usable_course(&self) -> Option<f64> {
        self.course.filter(|c| c.is_finite() && *c >= 0.0)
    }
}

/// Bounded, ordered buffer of samples. Most recent last.
#[derive(Debug, Clone)]
pub struct PositionBuffer {
    samples: Vec<PositionSample>,
    capacity: usize,
}

impl PositionBuffer {
    /// Create a buffer holding at most `capacity` samples (minimum 2)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(2);
        Self {
            samples: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Buffer sized for a bearing window of `max_bearings` segments
    pub fn for_bearings(max_bearings: usize) -> Self {
        Self::new(max_bearings + 1)
    }

    /// Append a sample, discarding the oldest when full
    pub fn push(&mut self, sample: PositionSample) {
        if self.samples.len() == self.capacity {
            self.samples.remove(0);
        }
        self.samples.push(sample);
    }

    /// Most recent sample
    pub fn latest(&self) -> Option<&PositionSample> {
        self.samples.last()
    }

    /// Samples in arrival order
    pub fn as_slice(&self) -> &[PositionSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
