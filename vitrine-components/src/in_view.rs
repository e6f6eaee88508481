//! Fade-and-rise reveal for sections entering the viewport.
//!
//! ## Usage
//!
//! Section headings and project cards start transparent and slightly
//! lowered, then fade in and rise into place the first time any part of
//! them scrolls into view. Unlike [`scroll_progress`](crate::scroll_progress)
//! the motion is time based: once triggered it runs for a fixed duration no
//! matter how the page scrolls.
//!
//! ```
//! use vitrine_components::in_view::{InViewReveal, InViewState};
//! use vitrine_ui::{Px, PxSize, ScrollRegion, Viewport};
//!
//! let viewport = Viewport::new(PxSize::new(Px(1280), Px(800)));
//! let mut heading = InViewState::new(InViewReveal::default());
//! assert_eq!(heading.output().offset, 20.0);
//!
//! let region = ScrollRegion::new(Px(700), Px(60));
//! for frame in 0..=30 {
//!     heading.update_region(frame * 16_666_667, &region, &viewport);
//! }
//! assert_eq!(heading.output().opacity, 1.0);
//! assert_eq!(heading.output().offset, 0.0);
//! ```

use std::time::Duration;

use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use tracing::trace;
use vitrine_ui::{FrameClock, ScrollRegion, Viewport};

use crate::easing::Easing;

/// Length of the default reveal.
pub const REVEAL_DURATION: Duration = Duration::from_millis(500);
/// Distance in pixels the content rises while revealing.
pub const REVEAL_OFFSET: f32 = 20.0;

/// How an element reveals itself when scrolled into view.
#[derive(Clone, Copy, Debug, PartialEq, Setters, Serialize, Deserialize)]
#[serde(default)]
pub struct InViewReveal {
    /// Stay revealed after the first reveal instead of hiding again when the
    /// element leaves the viewport.
    pub once: bool,
    /// Time from hidden to fully shown.
    pub duration: Duration,
    /// Curve applied to the elapsed share of `duration`.
    pub easing: Easing,
    /// Downward offset while hidden, in pixels.
    pub from_offset: f32,
}

impl Default for InViewReveal {
    fn default() -> Self {
        Self {
            once: true,
            duration: REVEAL_DURATION,
            easing: Easing::EaseInOut,
            from_offset: REVEAL_OFFSET,
        }
    }
}

/// Presentation values of a reveal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InViewFrame {
    /// 0 hidden, 1 shown.
    pub opacity: f32,
    /// Downward offset in pixels, `from_offset` hidden and 0 shown.
    pub offset: f32,
}

/// Running reveal of one element.
#[derive(Clone, Debug)]
pub struct InViewState {
    config: InViewReveal,
    clock: FrameClock,
    /// Linear share of the transition, before easing.
    progress: f32,
    in_view: bool,
    revealed: bool,
}

impl InViewState {
    /// A hidden element.
    pub fn new(config: InViewReveal) -> Self {
        Self {
            config,
            clock: FrameClock::new(),
            progress: 0.0,
            in_view: false,
            revealed: false,
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &InViewReveal {
        &self.config
    }

    /// Whether the element has been in view at least once.
    pub fn has_revealed(&self) -> bool {
        self.revealed
    }

    /// Current presentation values.
    pub fn output(&self) -> InViewFrame {
        let shown = self.config.easing.apply(self.progress);
        InViewFrame {
            opacity: shown,
            offset: self.config.from_offset * (1.0 - shown),
        }
    }

    /// Runs one frame. `in_view` is `None` when the element could not be
    /// measured, which keeps the previous visibility.
    ///
    /// Returns the new values if they changed.
    pub fn update(&mut self, frame_nanos: u64, in_view: Option<bool>) -> Option<InViewFrame> {
        let dt = self.clock.advance(frame_nanos);
        if let Some(in_view) = in_view
            && in_view != self.in_view
            && !(self.config.once && self.revealed)
        {
            trace!(in_view, "in-view reveal retargeted");
            self.in_view = in_view;
            self.revealed |= in_view;
        }

        let target = if self.in_view { 1.0 } else { 0.0 };
        if self.progress == target {
            return None;
        }
        let duration = self.config.duration.as_secs_f32();
        let step = if duration > 0.0 { dt / duration } else { 1.0 };
        self.progress = if target > self.progress {
            (self.progress + step).min(target)
        } else {
            (self.progress - step).max(target)
        };
        Some(self.output())
    }

    /// Runs one frame for an element measured at `region`. Any overlap with
    /// the viewport counts as in view.
    pub fn update_region(
        &mut self,
        frame_nanos: u64,
        region: &ScrollRegion,
        viewport: &Viewport,
    ) -> Option<InViewFrame> {
        self.update(frame_nanos, Some(region.intersects(viewport)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: u64 = 16_666_667;

    fn run(state: &mut InViewState, frames: std::ops::Range<u64>, in_view: bool) {
        for frame in frames {
            state.update(frame * FRAME, Some(in_view));
        }
    }

    #[test]
    fn starts_hidden_and_lowered() {
        let state = InViewState::new(InViewReveal::default());
        assert_eq!(
            state.output(),
            InViewFrame {
                opacity: 0.0,
                offset: 20.0
            }
        );
        assert!(!state.has_revealed());
    }

    #[test]
    fn out_of_view_element_stays_quiet() {
        let mut state = InViewState::new(InViewReveal::default());
        for frame in 0..60 {
            assert_eq!(state.update(frame * FRAME, Some(false)), None);
        }
        assert_eq!(state.output().opacity, 0.0);
    }

    #[test]
    fn reveal_takes_configured_duration() {
        let mut state = InViewState::new(InViewReveal::default().easing(Easing::Linear));
        // Fifteen frames of 1/60 s each.
        run(&mut state, 0..15, true);
        let halfway = state.output();
        assert!((halfway.opacity - 0.5).abs() < 1e-3);
        assert!((halfway.offset - 10.0).abs() < 0.1);

        run(&mut state, 15..40, true);
        assert_eq!(state.output().opacity, 1.0);
        assert_eq!(state.output().offset, 0.0);
        assert_eq!(state.update(40 * FRAME, Some(true)), None);
    }

    #[test]
    fn once_never_hides_again() {
        let mut state = InViewState::new(InViewReveal::default());
        run(&mut state, 0..5, true);
        assert!(state.has_revealed());
        let partial = state.output().opacity;
        assert!(partial > 0.0 && partial < 1.0);

        // Leaving mid-reveal still finishes the reveal.
        let mut opacity = partial;
        for frame in 5..120 {
            state.update(frame * FRAME, Some(false));
            assert!(state.output().opacity >= opacity);
            opacity = state.output().opacity;
        }
        assert_eq!(opacity, 1.0);

        run(&mut state, 120..180, true);
        run(&mut state, 180..240, false);
        assert_eq!(state.output().opacity, 1.0);
    }

    #[test]
    fn repeating_reveal_hides_on_leave() {
        let mut state = InViewState::new(InViewReveal::default().once(false));
        run(&mut state, 0..60, true);
        assert_eq!(state.output().opacity, 1.0);

        run(&mut state, 60..120, false);
        assert_eq!(state.output().opacity, 0.0);
        assert_eq!(state.output().offset, 20.0);

        run(&mut state, 120..180, true);
        assert_eq!(state.output().opacity, 1.0);
    }

    #[test]
    fn zero_duration_jumps() {
        let mut state = InViewState::new(InViewReveal::default().duration(Duration::ZERO));
        let frame = state.update(0, Some(true)).unwrap();
        assert_eq!(frame.opacity, 1.0);
        assert_eq!(frame.offset, 0.0);
    }

    #[test]
    fn unmeasured_frames_keep_visibility() {
        let mut state = InViewState::new(InViewReveal::default().once(false));
        run(&mut state, 0..10, true);
        let before = state.output().opacity;
        state.update(10 * FRAME, None);
        assert!(state.output().opacity > before);
    }

    #[test]
    fn regions_count_as_in_view_on_any_overlap() {
        use vitrine_ui::{Px, PxSize};

        let viewport = Viewport::new(PxSize::new(Px(1000), Px(800)));
        let mut state = InViewState::new(InViewReveal::default());
        let below = ScrollRegion::new(Px(800), Px(100));
        assert_eq!(state.update_region(0, &below, &viewport), None);

        let peeking = ScrollRegion::new(Px(799), Px(100));
        assert!(state.update_region(FRAME, &peeking, &viewport).is_some());
        assert!(state.has_revealed());
    }

    #[test]
    fn config_reads_from_json() {
        let config: InViewReveal =
            serde_json::from_str(r#"{ "once": false, "from_offset": 40.0 }"#).unwrap();
        assert!(!config.once);
        assert_eq!(config.from_offset, 40.0);
        assert_eq!(config.duration, REVEAL_DURATION);
    }
}
