//! Replay session: owns the directory and tracker and turns feed lines
//! into state changes

use fleetview_core::{CameraConfig, FleetConfig};
use fleetview_state::{camera_directive, CameraDirective, DirectoryAction, DirectoryState, FollowTracker};
use tracing::{debug, warn};

use crate::messages::{FeedEvent, StateChange};

/// Counters reported when the feed ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub events: u64,
    pub positions: u64,
    pub heading_updates: u64,
    pub rejected_lines: u64,
}

/// Single owner of the directory state for one replay
pub struct Session {
    directory: DirectoryState,
    tracker: FollowTracker,
    camera: CameraConfig,
    last_camera: Option<CameraDirective>,
    stats: SessionStats,
    line_number: usize,
    /// Time of the latest timed event; replays run on fix times
    clock: Option<i64>,
}

impl Session {
    pub fn new(config: &FleetConfig) -> Self {
        Self {
            directory: DirectoryState::new(),
            tracker: FollowTracker::new(config.heading.clone()),
            camera: config.camera.clone(),
            last_camera: None,
            stats: SessionStats::default(),
            line_number: 0,
            clock: None,
        }
    }

    /// Process one raw feed line. Blank lines are skipped, malformed ones
    /// produce an error change.
    pub fn handle_line(&mut self, line: &str) -> Vec<StateChange> {
        self.line_number += 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }

        match serde_json::from_str::<FeedEvent>(trimmed) {
            Ok(event) => self.handle_event(event, fleetview_core::now_millis()),
            Err(e) => {
                warn!(line = self.line_number, "Rejected feed line: {}", e);
                self.stats.rejected_lines += 1;
                vec![StateChange::Error {
                    line: self.line_number,
                    message: e.to_string(),
                }]
            }
        }
    }

    /// Apply an event.
    ///
    /// The session runs on a single clock: positions advance it to their
    /// fix time (or `now_ms` without one), a `select` with `at` moves it to
    /// that time, and a `select` without `at` is stamped with it.
    pub fn handle_event(&mut self, event: FeedEvent, now_ms: i64) -> Vec<StateChange> {
        self.stats.events += 1;
        let mut changes = Vec::new();

        let clock = match event {
            FeedEvent::Position(report) => {
                self.stats.positions += 1;
                let at = report.sample.fix_time.unwrap_or(now_ms);
                self.clock = Some(at);
                let outcome = self
                    .tracker
                    .observe(&mut self.directory, report.device_id, report.sample, at);
                if outcome.updated {
                    self.stats.heading_updates += 1;
                }
                changes.push(StateChange::from(outcome));
                at
            }
            FeedEvent::Directory(action) => {
                let action = match action {
                    DirectoryAction::Select { id, at } => {
                        let at = at.unwrap_or_else(|| self.clock.unwrap_or(now_ms));
                        self.clock = Some(at);
                        DirectoryAction::Select { id, at: Some(at) }
                    }
                    other => other,
                };
                let prunes = matches!(
                    action,
                    DirectoryAction::Refresh { .. } | DirectoryAction::Remove { .. }
                );
                self.directory.apply(action);
                if prunes {
                    self.tracker.retain_known(&self.directory);
                }
                debug!(version = self.directory.version(), "directory transition applied");
                changes.push(self.directory_change());
                self.clock.unwrap_or(now_ms)
            }
        };

        if let Some(directive) = self.camera_change(clock) {
            changes.push(StateChange::from(directive));
        }

        changes
    }

    fn directory_change(&self) -> StateChange {
        StateChange::Directory {
            version: self.directory.version(),
            devices: self.directory.items().len(),
            selected_id: self.directory.selected_id().cloned(),
            follow_device_id: self.directory.follow_device_id().cloned(),
        }
    }

    /// New camera directive, if it differs from the last one published
    fn camera_change(&mut self, now_ms: i64) -> Option<CameraDirective> {
        let directive = camera_directive(&self.directory, &self.tracker, now_ms, &self.camera);
        if directive == self.last_camera {
            return None;
        }
        self.last_camera = directive.clone();
        directive
    }

    pub fn directory(&self) -> &DirectoryState {
        &self.directory
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }
}
