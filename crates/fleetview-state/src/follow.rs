//! Per-device heading tracking wired into the directory
//!
//! The tracker keeps the rolling position buffer and the last display
//! update time for every device. Each incoming position runs the
//! estimator, then the update gate against the heading the directory is
//! currently displaying, and writes accepted (smoothed) headings back
//! through [`DirectoryState::update_headings`].

use fleetview_core::{
    estimate_heading, should_update_heading, smooth_heading, GeoPoint, HeadingCandidate,
    HeadingConfig, PositionBuffer, PositionSample,
};
use serde::Serialize;
use std::collections::HashMap;
use tracing::trace;

use crate::directory::{DeviceId, DirectoryState};

/// Result of feeding one position to the tracker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadingOutcome {
    pub device_id: DeviceId,
    /// Estimator result for this position
    pub candidate: HeadingCandidate,
    /// Heading the directory displays after this position
    pub displayed: Option<f64>,
    /// Whether the displayed heading changed
    pub updated: bool,
}

#[derive(Debug, Clone)]
struct DeviceTrack {
    buffer: PositionBuffer,
    last_update_ms: Option<i64>,
    candidate: HeadingCandidate,
}

/// Heading tracker for all devices
#[derive(Debug, Clone)]
pub struct FollowTracker {
    config: HeadingConfig,
    tracks: HashMap<DeviceId, DeviceTrack>,
}

impl FollowTracker {
    pub fn new(config: HeadingConfig) -> Self {
        Self {
            config,
            tracks: HashMap::new(),
        }
    }

    pub fn config(&self) -> &HeadingConfig {
        &self.config
    }

    /// Feed a position for `device_id` observed at `now_ms`.
    ///
    /// Positions for devices the directory does not know yet are buffered,
    /// but no heading is written for them.
    pub fn observe(
        &mut self,
        directory: &mut DirectoryState,
        device_id: DeviceId,
        sample: PositionSample,
        now_ms: i64,
    ) -> HeadingOutcome {
        let max_bearings = self.config.max_bearings;
        let track = self.tracks.entry(device_id.clone()).or_insert_with(|| DeviceTrack {
            buffer: PositionBuffer::for_bearings(max_bearings),
            last_update_ms: None,
            candidate: HeadingCandidate::Loading,
        });

        track.buffer.push(sample);
        let candidate = estimate_heading(track.buffer.as_slice(), &sample, &self.config);
        track.candidate = candidate;

        let previous = directory.heading(&device_id);
        let mut updated = false;

        if let Some(next) = candidate.heading() {
            if directory.contains(&device_id)
                && should_update_heading(previous, next, track.last_update_ms, now_ms, &self.config)
            {
                let smoothed = smooth_heading(previous, next, self.config.smoothing_factor);
                directory.update_headings([(device_id.clone(), Some(smoothed))]);
                track.last_update_ms = Some(now_ms);
                updated = true;
                trace!(device = %device_id, next, smoothed, "displayed heading updated");
            }
        }

        HeadingOutcome {
            displayed: directory.heading(&device_id),
            device_id,
            candidate,
            updated,
        }
    }

    /// Last estimator result for a device
    pub fn candidate(&self, device_id: &DeviceId) -> Option<HeadingCandidate> {
        self.tracks.get(device_id).map(|t| t.candidate)
    }

    /// Most recent buffered position for a device
    pub fn latest_position(&self, device_id: &DeviceId) -> Option<GeoPoint> {
        self.tracks
            .get(device_id)
            .and_then(|t| t.buffer.latest())
            .map(|s| s.point)
    }

    /// Drop everything buffered for a device
    pub fn forget(&mut self, device_id: &DeviceId) {
        self.tracks.remove(device_id);
    }

    /// Drop buffers of devices no longer in the directory
    pub fn retain_known(&mut self, directory: &DirectoryState) {
        self.tracks.retain(|id, _| directory.contains(id));
    }

    /// Number of devices with buffered positions
    pub fn tracked_count(&self) -> usize {
        self.tracks.len()
    }
}

impl Default for FollowTracker {
    fn default() -> Self {
        Self::new(HeadingConfig::default())
    }
}
