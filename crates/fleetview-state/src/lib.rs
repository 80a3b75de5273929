//! Fleetview State - Device directory and follow-camera state
//!
//! This crate holds the state the live map renders from.
//!
//! ## Components
//!
//! - **directory**: versioned device directory with selection, follow target and displayed headings
//! - **follow**: per-device position buffers feeding the heading estimator and gate
//! - **camera**: follow-camera directive for the map layer
//!
//! ## Example
//!
//! ```rust
//! use fleetview_core::PositionSample;
//! use fleetview_state::{DeviceId, DeviceRecord, DirectoryState, FollowTracker};
//!
//! let mut directory = DirectoryState::new();
//! directory.refresh(vec![DeviceRecord::new("van-1")]);
//!
//! let van = DeviceId::new("van-1");
//! let mut tracker = FollowTracker::default();
//! let now = fleetview_core::now_millis();
//! tracker.observe(&mut directory, van.clone(), PositionSample::new(48.0, 11.0), now);
//! let outcome = tracker.observe(
//!     &mut directory,
//!     van,
//!     PositionSample::new(48.0, 11.0).with_speed(12.0).with_course(270.0),
//!     now + 1000,
//! );
//!
//! assert_eq!(outcome.displayed, Some(270.0));
//! ```

pub mod camera;
pub mod directory;
pub mod follow;

// Re-exports for convenience
pub use camera::{camera_directive, CameraDirective};
pub use directory::{DeviceId, DeviceRecord, DirectoryAction, DirectoryState};
pub use follow::{FollowTracker, HeadingOutcome};
