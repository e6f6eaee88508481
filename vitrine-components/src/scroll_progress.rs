//! Scroll-linked progress and the animator built on it.
//!
//! ## Usage
//!
//! Fade and slide an element in as it scrolls into view. The host calls
//! [`ScrollProgressAnimator::invalidate`] on every scroll or resize event and
//! [`ScrollProgressAnimator::tick`] on every animation frame; the returned
//! values go straight to presentation.
//!
//! ```
//! use vitrine_components::scroll_progress::{AnimatorConfig, ScrollProgressAnimator};
//! use vitrine_ui::{Px, PxSize, ScrollRegion, Viewport};
//!
//! let viewport = Viewport::new(PxSize::new(Px(800), Px(600)));
//! let mut animator = ScrollProgressAnimator::new(AnimatorConfig::default()).unwrap();
//!
//! // Element top still below the viewport: fully faded, fully offset.
//! let first = animator
//!     .tick(0, &viewport, || Some(ScrollRegion::new(Px(700), Px(200))))
//!     .unwrap();
//! assert_eq!(first.opacity, 0.0);
//! assert_eq!(first.offset, 100.0);
//! ```

use std::str::FromStr;

use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use vitrine_ui::{FrameClock, ScrollRegion, Viewport};

use crate::{
    error::ConfigError,
    keyframes::Keyframes,
    spring::{Spring, SpringSpec},
};

/// Breakpoints of the line-fill remap used by the timeline: the line finishes
/// drawing slightly before the scroll window ends.
pub const LINE_FILL_REMAP: [(f32, f32); 3] = [(0.0, 0.0), (0.85, 0.85), (0.9, 1.0)];

/// A point on the element meeting a point on the viewport.
///
/// Both values are fractions of the respective height: `0` is the top edge,
/// `1` the bottom edge.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AnchorRepr")]
pub struct ScrollAnchor {
    /// Fraction of the element's height.
    pub element: f32,
    /// Fraction of the viewport's height.
    pub viewport: f32,
}

impl ScrollAnchor {
    /// Element top meets viewport bottom.
    pub const START_END: Self = Self::new(0.0, 1.0);
    /// Element top meets viewport top.
    pub const START_START: Self = Self::new(0.0, 0.0);
    /// Element top meets viewport center.
    pub const START_CENTER: Self = Self::new(0.0, 0.5);
    /// Element center meets viewport center.
    pub const CENTER_CENTER: Self = Self::new(0.5, 0.5);
    /// Element bottom meets viewport center.
    pub const END_CENTER: Self = Self::new(1.0, 0.5);
    /// Element bottom meets viewport top.
    pub const END_START: Self = Self::new(1.0, 0.0);

    /// Creates an anchor from two fractions.
    pub const fn new(element: f32, viewport: f32) -> Self {
        Self { element, viewport }
    }

    /// Signed distance from the viewport point down to the element point.
    ///
    /// Positive while the element point is still below the viewport point;
    /// decreases one-for-one as the page scrolls down.
    fn distance(&self, region: &ScrollRegion, viewport: &Viewport) -> f32 {
        region.point_at(self.element) - viewport.height().to_f32() * self.viewport
    }

    fn is_finite(&self) -> bool {
        self.element.is_finite() && self.viewport.is_finite()
    }
}

fn parse_edge(token: &str) -> Option<f32> {
    match token {
        "start" | "top" => Some(0.0),
        "center" => Some(0.5),
        "end" | "bottom" => Some(1.0),
        other => other.parse::<f32>().ok(),
    }
}

impl FromStr for ScrollAnchor {
    type Err = ConfigError;

    /// Parses `"<element> <viewport>"`, each part being `start`, `center`,
    /// `end` or a fraction.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidAnchor {
            anchor: s.to_owned(),
        };
        let mut parts = s.split_whitespace();
        let (Some(element), Some(viewport), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        match (parse_edge(element), parse_edge(viewport)) {
            (Some(element), Some(viewport)) => Ok(Self::new(element, viewport)),
            _ => Err(invalid()),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AnchorRepr {
    Named(String),
    Fractions { element: f32, viewport: f32 },
}

impl TryFrom<AnchorRepr> for ScrollAnchor {
    type Error = ConfigError;

    fn try_from(repr: AnchorRepr) -> Result<Self, Self::Error> {
        match repr {
            AnchorRepr::Named(name) => name.parse(),
            AnchorRepr::Fractions { element, viewport } => Ok(Self::new(element, viewport)),
        }
    }
}

/// The stretch of scrolling over which progress runs from 0 to 1.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScrollWindow {
    /// Where progress is 0.
    pub start: ScrollAnchor,
    /// Where progress is 1.
    pub end: ScrollAnchor,
}

impl Default for ScrollWindow {
    fn default() -> Self {
        Self::ENTER_TO_CENTER
    }
}

impl ScrollWindow {
    /// From the element's top entering at the viewport bottom to its center
    /// reaching the viewport center.
    pub const ENTER_TO_CENTER: Self = Self {
        start: ScrollAnchor::START_END,
        end: ScrollAnchor::CENTER_CENTER,
    };

    /// From the element's top passing the viewport center to its bottom
    /// passing the viewport center.
    pub const THROUGH_CENTER: Self = Self {
        start: ScrollAnchor::START_CENTER,
        end: ScrollAnchor::END_CENTER,
    };

    /// Creates a window from two anchors.
    pub const fn new(start: ScrollAnchor, end: ScrollAnchor) -> Self {
        Self { start, end }
    }

    /// How far `region` has travelled through the window.
    ///
    /// The result is not clamped: it is negative before the window and
    /// above 1 after it. A window whose anchors coincide jumps from 0 to 1
    /// when the anchor is crossed.
    pub fn raw_progress(&self, region: &ScrollRegion, viewport: &Viewport) -> f32 {
        let start = self.start.distance(region, viewport);
        let end = self.end.distance(region, viewport);
        let span = end - start;
        if span.abs() <= f32::EPSILON {
            return if start <= 0.0 { 1.0 } else { 0.0 };
        }
        -start / span
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.start.is_finite() {
            return Err(ConfigError::NonFiniteAnchor { field: "start" });
        }
        if !self.end.is_finite() {
            return Err(ConfigError::NonFiniteAnchor { field: "end" });
        }
        Ok(())
    }
}

/// Presentation values derived from one progress sample.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionValues {
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
    /// Signed slide distance in pixels.
    pub offset: f32,
    /// Vertical fill of a connecting line in `[0, 1]`.
    pub fill_ratio: f32,
}

/// Output of [`ChannelMap::map`]: a pure function of progress.
pub type MappedOutput = MotionValues;

/// Output of [`ScrollProgressAnimator::tick`]: [`MappedOutput`] after spring
/// smoothing.
pub type SmoothedOutput = MotionValues;

/// Keyframe curves turning progress into presentation values.
#[derive(Clone, Debug, PartialEq, Setters, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelMap {
    /// Progress to opacity.
    pub opacity: Keyframes,
    /// Progress to slide offset.
    pub offset: Keyframes,
    /// Progress to line fill.
    pub fill: Keyframes,
}

impl Default for ChannelMap {
    fn default() -> Self {
        Self {
            opacity: Keyframes::new([(0.1, 0.0), (0.4, 1.0)]).unwrap_or_default(),
            offset: Keyframes::new([(0.1, 100.0), (0.4, 0.0)]).unwrap_or_default(),
            fill: Keyframes::identity(),
        }
    }
}

impl ChannelMap {
    /// Maps `progress`, clamped to `[0, 1]`, through every channel.
    ///
    /// Opacity and fill are additionally clamped to `[0, 1]` so custom
    /// curves cannot push them out of their presentable range.
    pub fn map(&self, progress: f32) -> MappedOutput {
        let progress = clamp_progress(progress);
        MotionValues {
            opacity: self.opacity.sample(progress).clamp(0.0, 1.0),
            offset: self.offset.sample(progress),
            fill_ratio: self.fill.sample(progress).clamp(0.0, 1.0),
        }
    }
}

/// Clamps a raw progress sample to `[0, 1]`; `NaN` maps to 0.
pub fn clamp_progress(progress: f32) -> f32 {
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    }
}

/// Configuration of a [`ScrollProgressAnimator`].
///
/// # Examples
///
/// ```
/// use vitrine_components::scroll_progress::{AnimatorConfig, ScrollWindow};
/// use vitrine_components::spring::SpringSpec;
///
/// let config = AnimatorConfig::default()
///     .window(ScrollWindow::THROUGH_CENTER)
///     .spring(SpringSpec::new(80.0, 20.0))
///     .with_remap([(0.0, 0.0), (0.9, 1.0)])
///     .unwrap();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Setters, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimatorConfig {
    /// Scroll window mapped onto progress 0..1.
    pub window: ScrollWindow,
    /// Smoothing applied to every channel.
    pub spring: SpringSpec,
    /// Progress to presentation curves.
    pub channels: ChannelMap,
}

impl AnimatorConfig {
    /// Configuration of a timeline entry card: fade and slide in between
    /// 10% and 40% of [`ScrollWindow::ENTER_TO_CENTER`].
    pub fn timeline_entry() -> Self {
        Self::default()
    }

    /// Configuration of the timeline's connecting line: fill follows
    /// [`ScrollWindow::THROUGH_CENTER`] through [`LINE_FILL_REMAP`]; the line
    /// itself neither fades nor slides.
    pub fn timeline_line() -> Self {
        let channels = ChannelMap {
            opacity: Keyframes::new([(0.0, 1.0), (1.0, 1.0)]).unwrap_or_default(),
            offset: Keyframes::new([(0.0, 0.0), (1.0, 0.0)]).unwrap_or_default(),
            fill: Keyframes::new(LINE_FILL_REMAP).unwrap_or_default(),
        };
        Self {
            window: ScrollWindow::THROUGH_CENTER,
            spring: SpringSpec::default(),
            channels,
        }
    }

    /// Replaces the fill channel with a breakpoint remap of progress.
    pub fn with_remap(
        mut self,
        points: impl IntoIterator<Item = (f32, f32)>,
    ) -> Result<Self, ConfigError> {
        self.channels.fill = Keyframes::new(points)?;
        Ok(self)
    }

    /// Checks the window and spring parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.window.validate()?;
        self.spring.validate()
    }

    /// Parses [`AnimatorOptions`] from JSON and converts them.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let options: AnimatorOptions = serde_json::from_str(json)?;
        Self::try_from(options)
    }
}

/// The flat option set accepted from host configuration.
///
/// ```
/// use vitrine_components::scroll_progress::{AnimatorConfig, ScrollAnchor};
///
/// let config = AnimatorConfig::from_json(
///     r#"{
///         "windowStart": "start center",
///         "windowEnd": "end center",
///         "stiffness": 50,
///         "damping": 15,
///         "restDelta": 0.001,
///         "remap": [[0, 0], [0.85, 0.85], [0.9, 1]]
///     }"#,
/// )
/// .unwrap();
/// assert_eq!(config.window.start, ScrollAnchor::START_CENTER);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnimatorOptions {
    /// Where progress is 0.
    pub window_start: ScrollAnchor,
    /// Where progress is 1.
    pub window_end: ScrollAnchor,
    /// Spring stiffness.
    pub stiffness: f32,
    /// Spring damping coefficient.
    pub damping: f32,
    /// Spring settle threshold.
    pub rest_delta: f32,
    /// Optional fill remap breakpoints.
    pub remap: Option<Vec<(f32, f32)>>,
}

impl Default for AnimatorOptions {
    fn default() -> Self {
        let spring = SpringSpec::default();
        Self {
            window_start: ScrollWindow::ENTER_TO_CENTER.start,
            window_end: ScrollWindow::ENTER_TO_CENTER.end,
            stiffness: spring.stiffness,
            damping: spring.damping,
            rest_delta: spring.rest_delta,
            remap: None,
        }
    }
}

impl TryFrom<AnimatorOptions> for AnimatorConfig {
    type Error = ConfigError;

    fn try_from(options: AnimatorOptions) -> Result<Self, Self::Error> {
        let spring = SpringSpec::default()
            .stiffness(options.stiffness)
            .damping(options.damping)
            .rest_delta(options.rest_delta);
        let mut config = AnimatorConfig::default()
            .window(ScrollWindow::new(options.window_start, options.window_end))
            .spring(spring);
        if let Some(remap) = options.remap {
            config = config.with_remap(remap)?;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Turns a stream of region measurements into smoothed presentation values
/// for one element.
///
/// Each instance owns its springs; two animators never share state. Dropping
/// the animator is the teardown: nothing is emitted for its element after
/// that.
#[derive(Clone, Debug)]
pub struct ScrollProgressAnimator {
    config: AnimatorConfig,
    clock: FrameClock,
    opacity: Spring,
    offset: Spring,
    fill: Spring,
    progress: Option<f32>,
    mapped: Option<MappedOutput>,
    dirty: bool,
}

impl ScrollProgressAnimator {
    /// Creates an animator; the first tick measures.
    ///
    /// Until then the output holds the values of progress 0.
    pub fn new(config: AnimatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let start = config.channels.map(0.0);
        Ok(Self {
            config,
            clock: FrameClock::new(),
            opacity: Spring::new(start.opacity),
            offset: Spring::new(start.offset),
            fill: Spring::new(start.fill_ratio),
            progress: None,
            mapped: None,
            dirty: true,
        })
    }

    /// The configuration in use.
    pub fn config(&self) -> &AnimatorConfig {
        &self.config
    }

    /// Marks the last measurement as stale. Call on scroll and resize.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Whether the next tick will measure.
    pub fn needs_measure(&self) -> bool {
        self.dirty
    }

    /// Runs one animation frame: measure, map, smooth, emit.
    ///
    /// `measure` is only called when the last measurement is stale. If it
    /// returns `None` (element not laid out yet, or gone) nothing changes
    /// this frame and the measurement is retried on the next one.
    ///
    /// The first successful measurement places the springs directly on the
    /// mapped values. Afterwards a value is emitted whenever progress moved
    /// or the springs are still travelling; once everything is at rest the
    /// animator returns `None` until the next invalidation changes something.
    pub fn tick(
        &mut self,
        frame_nanos: u64,
        viewport: &Viewport,
        measure: impl FnOnce() -> Option<ScrollRegion>,
    ) -> Option<SmoothedOutput> {
        let mut progress_changed = false;
        if self.dirty {
            let Some(region) = measure() else {
                trace!("region unavailable, skipping frame");
                return None;
            };
            self.dirty = false;

            let raw = self.config.window.raw_progress(&region, viewport);
            let mapped = self.config.channels.map(raw);
            progress_changed = self.progress != Some(raw);
            self.progress = Some(raw);

            if self.mapped.replace(mapped).is_none() {
                self.opacity.snap_to(mapped.opacity);
                self.offset.snap_to(mapped.offset);
                self.fill.snap_to(mapped.fill_ratio);
                self.clock.advance(frame_nanos);
                trace!(progress = raw, ?mapped, "initial measurement");
                return Some(mapped);
            }
            self.opacity.set_target(mapped.opacity);
            self.offset.set_target(mapped.offset);
            self.fill.set_target(mapped.fill_ratio);
        }

        let dt = self.clock.advance(frame_nanos);
        let before = self.output();
        let spec = self.config.spring;
        let opacity_moving = self.opacity.step(dt, &spec);
        let offset_moving = self.offset.step(dt, &spec);
        let fill_moving = self.fill.step(dt, &spec);
        let after = self.output();

        if after == before && !progress_changed {
            return None;
        }
        if !(opacity_moving || offset_moving || fill_moving) {
            debug!(?after, "scroll animation settled");
        } else {
            trace!(?after, "scroll animation frame");
        }
        Some(after)
    }

    /// Last raw (unclamped) progress, if anything was measured yet.
    pub fn progress(&self) -> Option<f32> {
        self.progress
    }

    /// Last mapped target, if anything was measured yet.
    pub fn mapped(&self) -> Option<MappedOutput> {
        self.mapped
    }

    /// Current smoothed values.
    pub fn output(&self) -> SmoothedOutput {
        MotionValues {
            opacity: self.opacity.value().clamp(0.0, 1.0),
            offset: self.offset.value(),
            fill_ratio: self.fill.value().clamp(0.0, 1.0),
        }
    }

    /// Whether every spring is at rest on its target.
    pub fn is_settled(&self) -> bool {
        self.opacity.is_at_rest() && self.offset.is_at_rest() && self.fill.is_at_rest()
    }
}
