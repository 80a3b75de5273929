//! Heading candidate estimation from a rolling position buffer

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::HeadingConfig;
use crate::geo::{average_angles, bearing, distance_meters, normalize_angle, speed_knots_to_kmh};
use crate::sample::PositionSample;

/// Outcome of one estimation pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum HeadingCandidate {
    /// Not enough samples yet
    Loading,
    /// A heading in `[0, 360)` can be shown
    Ready { heading: f64 },
    /// Movement is too small or too noisy to trust
    Unavailable,
}

/// Status part of a candidate, without the heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingStatus {
    Loading,
    Ready,
    Unavailable,
}

impl HeadingCandidate {
    pub fn status(&self) -> HeadingStatus {
        match self {
            HeadingCandidate::Loading => HeadingStatus::Loading,
            HeadingCandidate::Ready { .. } => HeadingStatus::Ready,
            HeadingCandidate::Unavailable => HeadingStatus::Unavailable,
        }
    }

    pub fn heading(&self) -> Option<f64> {
        match self {
            HeadingCandidate::Ready { heading } => Some(*heading),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, HeadingCandidate::Ready { .. })
    }
}

impl std::fmt::Display for HeadingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeadingStatus::Loading => write!(f, "loading"),
            HeadingStatus::Ready => write!(f, "ready"),
            HeadingStatus::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// Estimate a heading from `samples` (most recent last) and the raw
/// `latest` report.
///
/// Precedence is device course, then averaged segment bearings, then
/// unavailable. Motion validity always looks at the two most recent
/// samples, even when bearings come from older segments.
pub fn estimate_heading(
    samples: &[PositionSample],
    latest: &PositionSample,
    config: &HeadingConfig,
) -> HeadingCandidate {
    let n = samples.len();
    if n < 2 {
        return HeadingCandidate::Loading;
    }

    let distance = distance_meters(&samples[n - 2].point, &samples[n - 1].point);
    let speed_kmh = speed_knots_to_kmh(latest.speed);
    let motion_valid =
        speed_kmh >= config.min_speed_kmh || distance >= config.min_distance_meters;

    if let Some(course) = latest.usable_course() {
        if motion_valid {
            trace!(course, speed_kmh, distance, "using reported course");
            return HeadingCandidate::Ready {
                heading: normalize_angle(course),
            };
        }
    }

    if !(distance >= config.jitter_distance_meters) {
        trace!(distance, "latest segment within jitter");
        return HeadingCandidate::Unavailable;
    }

    let mut bearings = Vec::with_capacity(config.max_bearings);
    for i in (1..n).rev() {
        if bearings.len() >= config.max_bearings {
            break;
        }
        let from = &samples[i - 1].point;
        let to = &samples[i].point;
        let segment = distance_meters(from, to);
        // NaN segments fail both comparisons and are skipped
        if !(segment >= config.jitter_distance_meters && segment >= config.min_distance_meters) {
            continue;
        }
        let segment_bearing = bearing(from, to);
        if segment_bearing.is_finite() {
            bearings.push(segment_bearing);
        }
    }

    if !motion_valid {
        return HeadingCandidate::Unavailable;
    }

    match average_angles(&bearings) {
        Some(heading) => {
            trace!(heading, segments = bearings.len(), "derived heading from bearings");
            HeadingCandidate::Ready { heading }
        }
        None => HeadingCandidate::Unavailable,
    }
}
