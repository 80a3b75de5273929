//! Heading estimation for the follow camera
//!
//! Turning noisy position reports into a stable on-screen heading happens
//! in two steps:
//!
//! - [`estimator`] decides whether a trustworthy heading exists right now.
//!   A device-reported course wins when motion is credible, otherwise the
//!   circular mean of recent segment bearings is used, otherwise nothing.
//! - [`gate`] decides whether that heading should replace the one on screen,
//!   and interpolates towards it so the marker rotates instead of jumping.
//!
//! Both are pure functions; callers own the buffer and the last displayed
//! heading.

pub mod estimator;
pub mod gate;

pub use estimator::{estimate_heading, HeadingCandidate, HeadingStatus};
pub use gate::{should_update_heading, smooth_heading};
