//! Feed input and state-change output messages

use fleetview_core::{HeadingStatus, PositionSample};
use fleetview_state::{CameraDirective, DeviceId, DirectoryAction, HeadingOutcome};
use serde::{Deserialize, Serialize};

/// One line of the input feed.
///
/// Directory lines use the [`DirectoryAction`] format unchanged; position
/// reports are the only feed-specific shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FeedEvent {
    Position(PositionReport),
    Directory(DirectoryAction),
}

/// `{"type": "position", "device_id": .., <sample fields>}`
#[derive(Debug, Clone, Deserialize)]
pub struct PositionReport {
    #[serde(rename = "type")]
    kind: PositionTag,
    pub device_id: DeviceId,
    #[serde(flatten)]
    pub sample: PositionSample,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum PositionTag {
    Position,
}

/// Messages published to subscribers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StateChange {
    /// Directory moved to a new version
    Directory {
        version: u64,
        devices: usize,
        selected_id: Option<DeviceId>,
        follow_device_id: Option<DeviceId>,
    },

    /// Heading estimate for a position report
    Heading {
        device_id: DeviceId,
        status: HeadingStatus,
        candidate: Option<f64>,
        displayed: Option<f64>,
        updated: bool,
    },

    /// Follow camera moved
    Camera {
        device_id: DeviceId,
        latitude: f64,
        longitude: f64,
        rotation: Option<f64>,
    },

    /// A feed line could not be processed
    Error { line: usize, message: String },
}

impl From<HeadingOutcome> for StateChange {
    fn from(outcome: HeadingOutcome) -> Self {
        StateChange::Heading {
            device_id: outcome.device_id,
            status: outcome.candidate.status(),
            candidate: outcome.candidate.heading(),
            displayed: outcome.displayed,
            updated: outcome.updated,
        }
    }
}

impl From<CameraDirective> for StateChange {
    fn from(directive: CameraDirective) -> Self {
        StateChange::Camera {
            device_id: directive.device_id,
            latitude: directive.center.latitude,
            longitude: directive.center.longitude,
            rotation: directive.rotation,
        }
    }
}
