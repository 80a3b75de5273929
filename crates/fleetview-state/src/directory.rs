//! Device directory state
//!
//! One owned, versioned value holding the known devices, the selected and
//! followed device, and the heading currently displayed for each device.
//! It is only mutated through the named transitions below (or the
//! equivalent [`DirectoryAction`] passed to [`DirectoryState::apply`]),
//! each of which runs to completion and bumps the version.
//!
//! Invariants kept by every transition:
//! - displayed headings only exist for devices in `items`
//! - after `refresh` or `remove`, the follow target is a device in `items`

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Device identifier as assigned by the device registry.
///
/// Opaque: numeric ids and string ids are both accepted and kept in their
/// textual form, so `1` and `"1"` name the same device.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for DeviceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(id) => DeviceId(id),
            other => DeviceId(other.to_string()),
        })
    }
}

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for DeviceId {
    fn from(id: i64) -> Self {
        DeviceId(id.to_string())
    }
}

impl From<&str> for DeviceId {
    fn from(id: &str) -> Self {
        DeviceId(id.to_string())
    }
}

impl From<String> for DeviceId {
    fn from(id: String) -> Self {
        DeviceId(id)
    }
}

/// Device as delivered by the registry feed.
///
/// Only `id` is interpreted; every other attribute is carried as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub id: DeviceId,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl DeviceRecord {
    pub fn new(id: impl Into<DeviceId>) -> Self {
        Self {
            id: id.into(),
            attributes: Map::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Display name, when the registry provides one
    pub fn name(&self) -> Option<&str> {
        self.attributes.get("name").and_then(Value::as_str)
    }
}

/// Reducer-style transitions on [`DirectoryState`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DirectoryAction {
    /// Replace the device list
    Refresh { devices: Vec<DeviceRecord> },
    /// Upsert devices
    Update { devices: Vec<DeviceRecord> },
    /// Select a device (or clear the selection)
    Select {
        id: Option<DeviceId>,
        #[serde(default)]
        at: Option<i64>,
    },
    /// Set the device the camera follows
    Follow { id: Option<DeviceId> },
    /// Drop a device
    Remove { id: DeviceId },
    /// Store or clear displayed headings
    UpdateHeadings {
        headings: BTreeMap<DeviceId, Option<f64>>,
    },
}

/// Process-lifetime directory of devices
#[derive(Debug, Clone, Default, Serialize)]
pub struct DirectoryState {
    items: BTreeMap<DeviceId, DeviceRecord>,
    selected_id: Option<DeviceId>,
    selected_at: Option<i64>,
    follow_device_id: Option<DeviceId>,
    heading_by_device_id: BTreeMap<DeviceId, f64>,
    version: u64,
}

impl DirectoryState {
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Transitions
    // ─────────────────────────────────────────────────────────────────────────────

    /// Apply a transition by value
    pub fn apply(&mut self, action: DirectoryAction) {
        match action {
            DirectoryAction::Refresh { devices } => self.refresh(devices),
            DirectoryAction::Update { devices } => self.update(devices),
            DirectoryAction::Select { id, at: Some(at) } => self.select_id_at(id, at),
            DirectoryAction::Select { id, at: None } => self.select_id(id),
            DirectoryAction::Follow { id } => self.set_follow_device_id(id),
            DirectoryAction::Remove { id } => self.remove(&id),
            DirectoryAction::UpdateHeadings { headings } => self.update_headings(headings),
        }
    }

    /// Replace all devices. Headings and the follow target of devices that
    /// are gone are dropped with them.
    pub fn refresh(&mut self, devices: impl IntoIterator<Item = DeviceRecord>) {
        self.items = devices.into_iter().map(|d| (d.id.clone(), d)).collect();

        let items = &self.items;
        let before = self.heading_by_device_id.len();
        self.heading_by_device_id.retain(|id, _| items.contains_key(id));
        let pruned = before - self.heading_by_device_id.len();

        let follow_gone = self
            .follow_device_id
            .as_ref()
            .is_some_and(|follow| !self.items.contains_key(follow));
        if follow_gone {
            if let Some(follow) = self.follow_device_id.take() {
                debug!(device = %follow, "follow target left the directory");
            }
        }

        self.bump();
        debug!(
            devices = self.items.len(),
            pruned_headings = pruned,
            version = self.version,
            "directory refreshed"
        );
    }

    /// Upsert devices without touching the others
    pub fn update(&mut self, devices: impl IntoIterator<Item = DeviceRecord>) {
        let mut count = 0usize;
        for device in devices {
            self.items.insert(device.id.clone(), device);
            count += 1;
        }
        self.bump();
        debug!(upserted = count, version = self.version, "directory updated");
    }

    /// Select a device now
    pub fn select_id(&mut self, id: Option<DeviceId>) {
        self.select_id_at(id, fleetview_core::now_millis());
    }

    /// Select a device, recording when the selection happened
    pub fn select_id_at(&mut self, id: Option<DeviceId>, at: i64) {
        debug!(device = ?id, at, "device selected");
        self.selected_id = id;
        self.selected_at = Some(at);
        self.bump();
    }

    /// Drop a device, its heading and any follow pointing at it
    pub fn remove(&mut self, id: &DeviceId) {
        self.items.remove(id);
        self.heading_by_device_id.remove(id);
        if self.follow_device_id.as_ref() == Some(id) {
            self.follow_device_id = None;
        }
        self.bump();
        debug!(device = %id, version = self.version, "device removed");
    }

    /// Set the follow target. Not checked against `items` here; stale
    /// targets are cleared by `refresh` and `remove`.
    pub fn set_follow_device_id(&mut self, id: Option<DeviceId>) {
        debug!(device = ?id, "follow target set");
        self.follow_device_id = id;
        self.bump();
    }

    /// Store displayed headings. A missing or NaN heading clears the entry.
    /// Headings for devices not in the directory are ignored.
    pub fn update_headings(&mut self, headings: impl IntoIterator<Item = (DeviceId, Option<f64>)>) {
        for (id, heading) in headings {
            match heading.filter(|h| !h.is_nan()) {
                Some(heading) if self.items.contains_key(&id) => {
                    self.heading_by_device_id.insert(id, heading);
                }
                Some(_) => {
                    trace!(device = %id, "ignoring heading for unknown device");
                }
                None => {
                    self.heading_by_device_id.remove(&id);
                }
            }
        }
        self.bump();
    }

    fn bump(&mut self) {
        self.version += 1;
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Read access
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn items(&self) -> &BTreeMap<DeviceId, DeviceRecord> {
        &self.items
    }

    pub fn device(&self, id: &DeviceId) -> Option<&DeviceRecord> {
        self.items.get(id)
    }

    pub fn contains(&self, id: &DeviceId) -> bool {
        self.items.contains_key(id)
    }

    pub fn selected_id(&self) -> Option<&DeviceId> {
        self.selected_id.as_ref()
    }

    /// When the current selection was made (Unix ms)
    pub fn selected_at(&self) -> Option<i64> {
        self.selected_at
    }

    pub fn follow_device_id(&self) -> Option<&DeviceId> {
        self.follow_device_id.as_ref()
    }

    /// Displayed heading for a device
    pub fn heading(&self, id: &DeviceId) -> Option<f64> {
        self.heading_by_device_id.get(id).copied()
    }

    pub fn headings(&self) -> &BTreeMap<DeviceId, f64> {
        &self.heading_by_device_id
    }

    /// Incremented by every transition
    pub fn version(&self) -> u64 {
        self.version
    }
}
