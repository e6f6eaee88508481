//! Light/dark theme switching with a radial reveal.
//!
//! ## Usage
//!
//! Clicking the theme toggle flips the page-wide [`ThemeMode`] immediately
//! and grows a circle of the new background color out of the click point.
//! Widgets whose own colors should only flip once the circle has covered
//! them hold a [`ThemeController::mirror`], which trails the mode by
//! [`MIRROR_DELAY`].
//!
//! ```
//! use vitrine_components::theme::{ThemeController, ThemeMode};
//! use vitrine_ui::{Px, PxPosition, PxSize};
//!
//! let mut theme = ThemeController::default();
//! let mut navbar_colors = theme.mirror();
//!
//! let click = PxPosition::new(Px(1200), Px(40));
//! theme.toggle(click, PxSize::new(Px(1280), Px(720)), 0);
//! assert_eq!(theme.mode(), ThemeMode::Dark);
//! assert_eq!(*navbar_colors.value(), ThemeMode::Light);
//!
//! let frame = theme.reveal_frame(350_000_000).unwrap();
//! assert_eq!(frame.center, click);
//! assert!(!frame.finished);
//!
//! navbar_colors.poll(500_000_000);
//! assert_eq!(*navbar_colors.value(), ThemeMode::Dark);
//! ```

use std::time::Duration;

use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use tracing::debug;
use vitrine_ui::{Deferred, PxPosition, PxSize, Signal, frame::duration_from_nanos};

use crate::easing::Easing;

/// Lag between a theme change and its mirrors.
pub const MIRROR_DELAY: Duration = Duration::from_millis(500);
/// Length of the radial reveal.
pub const REVEAL_DURATION: Duration = Duration::from_millis(700);
/// Final reveal radius as a multiple of the larger viewport dimension.
pub const REVEAL_SCALE: f32 = 1.45;

/// Page color scheme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Light background.
    #[default]
    Light,
    /// Dark background.
    Dark,
}

impl ThemeMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Whether this is [`ThemeMode::Dark`].
    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }

    /// Keyword used for the root class and persisted preference.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// How large the reveal circle grows.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum RevealExtent {
    /// The larger viewport dimension times the factor.
    ViewportScaled(f32),
    /// Exactly the distance to the farthest viewport corner.
    FarthestCorner,
}

impl Default for RevealExtent {
    fn default() -> Self {
        Self::ViewportScaled(REVEAL_SCALE)
    }
}

/// Shape and timing of the reveal.
#[derive(Clone, Copy, Debug, PartialEq, Setters, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Final radius.
    pub extent: RevealExtent,
    /// Time to reach the final radius.
    pub duration: Duration,
    /// Radius curve over time.
    pub easing: Easing,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            extent: RevealExtent::default(),
            duration: REVEAL_DURATION,
            easing: Easing::EaseInOut,
        }
    }
}

/// One sample of a running reveal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealFrame {
    /// Circle center: the click point.
    pub center: PxPosition,
    /// Circle radius in pixels.
    pub radius: f32,
    /// Eased progress in `[0, 1]`.
    pub progress: f32,
    /// Whether the circle has reached its final radius.
    pub finished: bool,
    /// The mode whose background fills the circle.
    pub mode: ThemeMode,
}

/// A circle of the new theme's background growing from a click point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadialReveal {
    center: PxPosition,
    viewport: PxSize,
    mode: ThemeMode,
    config: RevealConfig,
}

impl RadialReveal {
    /// A reveal of `mode` centered on `center` in a viewport of `viewport`.
    pub fn new(center: PxPosition, viewport: PxSize, mode: ThemeMode, config: RevealConfig) -> Self {
        Self {
            center,
            viewport,
            mode,
            config,
        }
    }

    /// Radius once the reveal has finished.
    pub fn final_radius(&self) -> f32 {
        match self.config.extent {
            RevealExtent::ViewportScaled(scale) => {
                self.viewport.max_dimension().to_f32() * scale.max(0.0)
            }
            RevealExtent::FarthestCorner => self
                .viewport
                .corners()
                .into_iter()
                .map(|corner| self.center.distance_to(corner))
                .fold(0.0, f32::max),
        }
    }

    /// Samples the reveal `elapsed` after it started.
    pub fn sample(&self, elapsed: Duration) -> RevealFrame {
        let duration = self.config.duration;
        let finished = elapsed >= duration;
        let t = if finished {
            1.0
        } else {
            elapsed.as_secs_f32() / duration.as_secs_f32()
        };
        let progress = self.config.easing.apply(t);
        RevealFrame {
            center: self.center,
            radius: self.final_radius() * progress,
            progress,
            finished,
            mode: self.mode,
        }
    }
}

/// Configuration of a [`ThemeController`].
#[derive(Clone, Copy, Debug, PartialEq, Setters, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Mode before the first toggle.
    pub initial: ThemeMode,
    /// Lag of [`ThemeController::mirror`].
    pub mirror_delay: Duration,
    /// Reveal shape and timing.
    pub reveal: RevealConfig,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            initial: ThemeMode::Light,
            mirror_delay: MIRROR_DELAY,
            reveal: RevealConfig::default(),
        }
    }
}

/// Owns the page-wide theme and the reveal running after a toggle.
#[derive(Debug)]
pub struct ThemeController {
    mode: Signal<ThemeMode>,
    config: ThemeConfig,
    reveal: Option<(RadialReveal, u64)>,
}

impl Default for ThemeController {
    fn default() -> Self {
        Self::new(ThemeConfig::default())
    }
}

impl ThemeController {
    /// Creates a controller in `config.initial`.
    pub fn new(config: ThemeConfig) -> Self {
        Self {
            mode: Signal::new(config.initial),
            config,
            reveal: None,
        }
    }

    /// The authoritative mode.
    pub fn mode(&self) -> ThemeMode {
        self.mode.get()
    }

    /// A handle to the mode shared with other owners.
    pub fn signal(&self) -> Signal<ThemeMode> {
        self.mode.clone()
    }

    /// A mirror of the mode trailing it by the configured delay.
    pub fn mirror(&self) -> Deferred<ThemeMode> {
        self.mode.subscribe_deferred(self.config.mirror_delay)
    }

    /// Flips the mode and starts a reveal from `click`.
    ///
    /// A reveal still running is replaced. Returns the new mode.
    pub fn toggle(&mut self, click: PxPosition, viewport: PxSize, frame_nanos: u64) -> ThemeMode {
        let mode = self.mode.get().toggled();
        self.mode.set(mode, frame_nanos);
        self.reveal = Some((
            RadialReveal::new(click, viewport, mode, self.config.reveal),
            frame_nanos,
        ));
        debug!(mode = mode.as_str(), x = click.x.raw(), y = click.y.raw(), "theme toggled");
        mode
    }

    /// Whether a reveal is running.
    pub fn is_revealing(&self) -> bool {
        self.reveal.is_some()
    }

    /// Samples the running reveal at `frame_nanos`.
    ///
    /// The frame that reports `finished` is the last one; afterwards this
    /// returns `None` until the next toggle.
    pub fn reveal_frame(&mut self, frame_nanos: u64) -> Option<RevealFrame> {
        let (reveal, started) = self.reveal?;
        let frame = reveal.sample(duration_from_nanos(frame_nanos.saturating_sub(started)));
        if frame.finished {
            self.reveal = None;
        }
        Some(frame)
    }
}

#[cfg(test)]
mod tests {
    use vitrine_ui::Px;

    use super::*;

    const MS: u64 = 1_000_000;

    fn viewport() -> PxSize {
        PxSize::new(Px(1280), Px(720))
    }

    #[test]
    fn toggled_round_trips() {
        assert_eq!(ThemeMode::Light.toggled(), ThemeMode::Dark);
        assert_eq!(ThemeMode::Dark.toggled().toggled(), ThemeMode::Dark);
        assert!(ThemeMode::Dark.is_dark());
        assert_eq!(serde_json::to_string(&ThemeMode::Dark).unwrap(), "\"dark\"");
    }

    #[test]
    fn default_radius_covers_the_viewport_from_any_click() {
        let size = viewport();
        for click in size.corners().into_iter().chain([PxPosition::new(Px(640), Px(360))]) {
            let reveal = RadialReveal::new(click, size, ThemeMode::Dark, RevealConfig::default());
            let farthest = size
                .corners()
                .into_iter()
                .map(|corner| click.distance_to(corner))
                .fold(0.0, f32::max);
            assert!(reveal.final_radius() >= farthest, "{click:?}");
            assert_eq!(reveal.final_radius(), 1280.0 * REVEAL_SCALE);
        }
    }

    #[test]
    fn farthest_corner_extent_is_tight() {
        let reveal = RadialReveal::new(
            PxPosition::new(Px(0), Px(0)),
            PxSize::new(Px(300), Px(400)),
            ThemeMode::Light,
            RevealConfig::default().extent(RevealExtent::FarthestCorner),
        );
        assert!((reveal.final_radius() - 500.0).abs() < 1e-3);
    }

    #[test]
    fn reveal_eases_over_its_duration() {
        let reveal = RadialReveal::new(
            PxPosition::new(Px(100), Px(100)),
            viewport(),
            ThemeMode::Dark,
            RevealConfig::default(),
        );
        let start = reveal.sample(Duration::ZERO);
        assert_eq!(start.radius, 0.0);
        assert!(!start.finished);

        let middle = reveal.sample(Duration::from_millis(350));
        assert!((middle.progress - 0.5).abs() < 1e-3);

        // Ease-in-out starts slower than linear.
        let early = reveal.sample(Duration::from_millis(70));
        assert!(early.progress < 0.1);

        let end = reveal.sample(Duration::from_secs(3));
        assert!(end.finished);
        assert_eq!(end.radius, reveal.final_radius());
        assert_eq!(end.mode, ThemeMode::Dark);
    }

    #[test]
    fn controller_runs_reveal_then_clears_it() {
        let mut theme = ThemeController::default();
        assert!(theme.reveal_frame(0).is_none());

        let click = PxPosition::new(Px(20), Px(700));
        assert_eq!(theme.toggle(click, viewport(), 1_000 * MS), ThemeMode::Dark);
        assert!(theme.is_revealing());

        let frame = theme.reveal_frame(1_200 * MS).unwrap();
        assert!(!frame.finished);
        assert_eq!(frame.mode, ThemeMode::Dark);

        let last = theme.reveal_frame(1_700 * MS).unwrap();
        assert!(last.finished);
        assert!(theme.reveal_frame(1_716 * MS).is_none());
        assert!(!theme.is_revealing());
    }

    #[test]
    fn mirror_lags_and_keeps_order() {
        let mut theme = ThemeController::default();
        let mut mirror = theme.mirror();
        let size = viewport();
        let click = PxPosition::ZERO;

        theme.toggle(click, size, 0);
        theme.toggle(click, size, 100 * MS);
        assert_eq!(theme.mode(), ThemeMode::Light);

        assert!(!mirror.poll(499 * MS));
        assert_eq!(*mirror.value(), ThemeMode::Light);

        assert!(mirror.poll(500 * MS));
        assert_eq!(*mirror.value(), ThemeMode::Dark);
        assert!(mirror.is_pending());

        assert!(mirror.poll(600 * MS));
        assert_eq!(*mirror.value(), ThemeMode::Light);
        assert!(!mirror.is_pending());
    }

    #[test]
    fn dropped_mirror_unsubscribes() {
        let theme = ThemeController::default();
        let mirror = theme.mirror();
        assert_eq!(theme.signal().subscriber_count(), 1);
        drop(mirror);
        assert_eq!(theme.signal().subscriber_count(), 0);
    }
}
