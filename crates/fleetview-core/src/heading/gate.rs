//! Hysteresis gate and interpolation for the displayed heading

use crate::config::HeadingConfig;
use crate::geo::{angular_diff, normalize_angle, shortest_angle_delta};

/// Decide whether `next` should replace the displayed heading.
///
/// A first value is always accepted. After that the display only changes
/// when the rotation reaches `min_heading_delta` or when it has been held
/// for `max_heading_hold`. A missing `last_update_ms` counts as stale.
pub fn should_update_heading(
    previous: Option<f64>,
    next: f64,
    last_update_ms: Option<i64>,
    now_ms: i64,
    config: &HeadingConfig,
) -> bool {
    if !next.is_finite() {
        return false;
    }

    let previous = match previous.filter(|p| p.is_finite()) {
        Some(p) => p,
        None => return true,
    };

    if angular_diff(previous, next) >= config.min_heading_delta {
        return true;
    }

    match last_update_ms {
        Some(last) => now_ms.saturating_sub(last) >= config.max_heading_hold_ms(),
        None => true,
    }
}

/// Move `factor` of the way from `previous` to `next` along the shorter arc.
pub fn smooth_heading(previous: Option<f64>, next: f64, factor: f64) -> f64 {
    match previous.filter(|p| p.is_finite()) {
        Some(p) => normalize_angle(p + shortest_angle_delta(p, next) * factor),
        None => normalize_angle(next),
    }
}
