//! Estimator and gate driven together over a simulated drive
//!
//! The caller side of the pipeline is reproduced here by hand: buffer the
//! sample, estimate, gate against the displayed heading, smooth.

use fleetview_core::{
    angular_diff, estimate_heading, should_update_heading, smooth_heading, HeadingCandidate,
    HeadingConfig, PositionBuffer, PositionSample,
};

const METER: f64 = 1.0 / 111_195.0;

struct Display {
    heading: Option<f64>,
    last_update_ms: Option<i64>,
    updates: usize,
}

impl Display {
    fn new() -> Self {
        Self {
            heading: None,
            last_update_ms: None,
            updates: 0,
        }
    }

    fn feed(
        &mut self,
        buffer: &mut PositionBuffer,
        sample: PositionSample,
        now_ms: i64,
        config: &HeadingConfig,
    ) -> HeadingCandidate {
        buffer.push(sample);
        let candidate = estimate_heading(buffer.as_slice(), &sample, config);
        if let Some(next) = candidate.heading() {
            if should_update_heading(self.heading, next, self.last_update_ms, now_ms, config) {
                self.heading = Some(smooth_heading(self.heading, next, config.smoothing_factor));
                self.last_update_ms = Some(now_ms);
                self.updates += 1;
            }
        }
        candidate
    }
}

#[test]
fn test_drive_east_then_park() {
    let config = HeadingConfig::default();
    let mut buffer = PositionBuffer::for_bearings(config.max_bearings);
    let mut display = Display::new();
    let mut now = 0;

    // Ten seconds eastbound at ~15 m/s
    for i in 0..10 {
        let sample = PositionSample::new(0.0, 15.0 * METER * i as f64);
        display.feed(&mut buffer, sample, now, &config);
        now += 1000;
    }
    let cruising = display.heading.unwrap();
    assert!(angular_diff(cruising, 90.0) < 0.01);

    // Parked: GPS wanders by well under the jitter distance
    let parked_at = 15.0 * METER * 9.0;
    let updates_before = display.updates;
    for i in 0..20 {
        let wobble = if i % 2 == 0 { 0.8 * METER } else { -0.6 * METER };
        let sample = PositionSample::new(wobble, parked_at + wobble).with_speed(0.1);
        let candidate = display.feed(&mut buffer, sample, now, &config);
        assert_eq!(candidate, HeadingCandidate::Unavailable);
        now += 1000;
    }

    // Heading is held, not spun by noise
    assert_eq!(display.updates, updates_before);
    assert_eq!(display.heading, Some(cruising));
}

#[test]
fn test_gentle_curve_stays_within_delta_until_hold_expires() {
    let config = HeadingConfig::default();
    let mut buffer = PositionBuffer::for_bearings(config.max_bearings);
    let mut display = Display::new();

    // Reported course drifts 2 degrees per second
    let mut lat = 0.0;
    for i in 0..8_i64 {
        lat += 20.0 * METER;
        let sample = PositionSample::new(lat, 0.0)
            .with_speed(20.0)
            .with_course(2.0 * i as f64);
        display.feed(&mut buffer, sample, i * 1000, &config);
    }

    // First Ready sample sets the display, the hold window forces one refresh
    // at t=6s; the 2 degree steps alone never reach the delta.
    assert_eq!(display.updates, 2);
    assert_eq!(display.last_update_ms, Some(6000));
}

#[test]
fn test_reversal_rotates_along_short_arc() {
    let config = HeadingConfig::default();
    let mut buffer = PositionBuffer::for_bearings(config.max_bearings);
    let mut display = Display::new();

    let moving = |course: f64| PositionSample::new(0.0, 0.0).with_speed(30.0).with_course(course);

    display.feed(&mut buffer, moving(350.0), 0, &config);
    display.feed(&mut buffer, moving(350.0), 100, &config);
    assert_eq!(display.heading, Some(350.0));

    display.feed(&mut buffer, moving(40.0), 200, &config);
    let heading = display.heading.unwrap();
    // 50 degrees clockwise through north, 35% of the way
    assert!(angular_diff(heading, 7.5) < 1e-9, "heading {}", heading);
}
