//! Follow-camera directive derived from directory and tracker state

use fleetview_core::{CameraConfig, GeoPoint};
use serde::Serialize;

use crate::directory::{DeviceId, DirectoryState};
use crate::follow::FollowTracker;

/// Where the map camera should be and how it should be rotated
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CameraDirective {
    pub device_id: DeviceId,
    pub center: GeoPoint,
    /// Map rotation in degrees, `None` keeps north up
    pub rotation: Option<f64>,
}

/// Compute the camera directive for the followed device.
///
/// Returns `None` when nothing is followed, when the followed device has
/// no known position, or while a manual selection is still settling.
/// A selection stamped later than `now_ms` counts as settled.
pub fn camera_directive(
    directory: &DirectoryState,
    tracker: &FollowTracker,
    now_ms: i64,
    config: &CameraConfig,
) -> Option<CameraDirective> {
    let device_id = directory.follow_device_id()?;

    if let Some(selected_at) = directory.selected_at() {
        let elapsed = now_ms.saturating_sub(selected_at);
        if (0..config.selection_settle_ms()).contains(&elapsed) {
            return None;
        }
    }

    let center = tracker.latest_position(device_id)?;
    let rotation = if config.rotate_with_heading {
        directory.heading(device_id)
    } else {
        None
    };

    Some(CameraDirective {
        device_id: device_id.clone(),
        center,
        rotation,
    })
}
