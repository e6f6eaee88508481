//! Frame timing.
//!
//! Animation state advances on animation-frame callbacks that carry a
//! monotonic timestamp in nanoseconds. [`FrameClock`] turns consecutive
//! timestamps into the time step used by the integrators.

use std::time::Duration;

/// Time step assumed for the very first frame.
pub const FIRST_FRAME_DELTA: f32 = 1.0 / 60.0;

/// Upper bound for a single frame step, in seconds.
///
/// A backgrounded page can deliver a frame seconds after the previous one;
/// feeding that gap into a spring integrator would overshoot.
pub const MAX_FRAME_DELTA: f32 = 0.05;

const NANOS_PER_SECOND: f32 = 1_000_000_000.0;

/// Tracks the timestamp of the last frame seen by one animated element.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameClock {
    last_frame_nanos: Option<u64>,
}

impl FrameClock {
    /// Creates a clock that has not seen any frame yet.
    pub const fn new() -> Self {
        Self {
            last_frame_nanos: None,
        }
    }

    /// Records `frame_nanos` and returns the elapsed seconds since the
    /// previous frame.
    ///
    /// The first frame assumes [`FIRST_FRAME_DELTA`]. Timestamps that go
    /// backwards yield zero. Large gaps are clamped to [`MAX_FRAME_DELTA`].
    ///
    /// # Examples
    ///
    /// ```
    /// use vitrine_ui::frame::{FIRST_FRAME_DELTA, FrameClock};
    ///
    /// let mut clock = FrameClock::new();
    /// assert_eq!(clock.advance(1_000), FIRST_FRAME_DELTA);
    /// assert_eq!(clock.advance(1_000 + 10_000_000), 0.01);
    /// ```
    pub fn advance(&mut self, frame_nanos: u64) -> f32 {
        let delta = match self.last_frame_nanos {
            Some(last) => frame_nanos.saturating_sub(last) as f32 / NANOS_PER_SECOND,
            None => FIRST_FRAME_DELTA,
        };
        self.last_frame_nanos = Some(
            self.last_frame_nanos
                .map_or(frame_nanos, |last| last.max(frame_nanos)),
        );
        delta.clamp(0.0, MAX_FRAME_DELTA)
    }

    /// Timestamp of the last frame, if any.
    pub fn last_frame_nanos(&self) -> Option<u64> {
        self.last_frame_nanos
    }

    /// Forgets the last frame so the next one is treated as the first.
    pub fn reset(&mut self) {
        self.last_frame_nanos = None;
    }
}

/// Converts a duration to whole nanoseconds, saturating at `u64::MAX`.
pub fn nanos_from_duration(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}

/// Converts a nanosecond count to a duration.
pub fn duration_from_nanos(nanos: u64) -> Duration {
    Duration::from_nanos(nanos)
}
