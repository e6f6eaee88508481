//! Scroll-animated career timeline.
//!
//! ## Usage
//!
//! A vertical line that draws itself as the page scrolls through the
//! timeline, with entry cards that fade and slide in and a marker dot that
//! pops in while its entry is on screen.
//!
//! Every entry owns its own animator and springs. Unmounting an entry drops
//! them, and the entry never shows up in a frame again.

use std::time::Duration;

use derive_setters::Setters;
use slotmap::SlotMap;
use smallvec::SmallVec;
use tracing::{debug, trace};
use vitrine_ui::{FrameClock, ScrollRegion, Viewport, ViewportEvent, frame::nanos_from_duration};

use crate::{
    error::ConfigError,
    scroll_progress::{AnimatorConfig, ScrollProgressAnimator, SmoothedOutput},
    spring::{Spring, SpringSpec},
};

const DEFAULT_MARKER_STIFFNESS: f32 = 100.0;
const DEFAULT_MARKER_DAMPING: f32 = 15.0;
const DEFAULT_MARKER_DELAY: Duration = Duration::from_millis(200);

slotmap::new_key_type! {
    /// Identifies a mounted timeline entry.
    pub struct EntryKey;
}

/// Supplies current geometry to [`Timeline::tick`].
///
/// Returning `None` for a region means it cannot be measured this frame
/// (not laid out yet); the affected animator skips the frame.
pub trait RegionSource {
    /// The viewport regions are measured against.
    fn viewport(&self) -> Viewport;
    /// The element wrapping all entries, which drives the line.
    fn container(&self) -> Option<ScrollRegion>;
    /// The card of one entry.
    fn entry(&self, key: EntryKey) -> Option<ScrollRegion>;
}

/// Marker dot animation.
#[derive(Clone, Copy, Debug, PartialEq, Setters)]
pub struct MarkerConfig {
    /// Spring driving the marker scale.
    pub spring: SpringSpec,
    /// Lag between the entry entering or leaving the viewport and the marker
    /// reacting.
    pub delay: Duration,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            spring: SpringSpec::new(DEFAULT_MARKER_STIFFNESS, DEFAULT_MARKER_DAMPING),
            delay: DEFAULT_MARKER_DELAY,
        }
    }
}

/// Configuration of a [`Timeline`].
#[derive(Clone, Debug, PartialEq, Setters)]
pub struct TimelineConfig {
    /// Animator of the connecting line.
    pub line: AnimatorConfig,
    /// Animator shared by every entry card.
    pub entry: AnimatorConfig,
    /// Marker dot animation.
    pub marker: MarkerConfig,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            line: AnimatorConfig::timeline_line(),
            entry: AnimatorConfig::timeline_entry(),
            marker: MarkerConfig::default(),
        }
    }
}

/// Scale of an entry's marker, springing towards 1 while the entry is in
/// view and back to 0 once it leaves.
#[derive(Clone, Debug)]
struct MarkerReveal {
    spring: Spring,
    clock: FrameClock,
    in_view: bool,
    due_nanos: Option<u64>,
}

impl MarkerReveal {
    fn new() -> Self {
        Self {
            spring: Spring::new(0.0),
            clock: FrameClock::new(),
            in_view: false,
            due_nanos: None,
        }
    }

    /// Returns whether the scale changed this frame.
    fn update(&mut self, frame_nanos: u64, in_view: Option<bool>, config: &MarkerConfig) -> bool {
        let dt = self.clock.advance(frame_nanos);
        if let Some(in_view) = in_view
            && in_view != self.in_view
        {
            self.in_view = in_view;
            self.due_nanos = Some(frame_nanos.saturating_add(nanos_from_duration(config.delay)));
        }
        if let Some(due) = self.due_nanos
            && frame_nanos >= due
        {
            self.due_nanos = None;
            self.spring
                .set_target(if self.in_view { 1.0 } else { 0.0 });
        }

        let before = self.spring.value();
        self.spring.step(dt, &config.spring);
        self.spring.value() != before
    }

    fn scale(&self) -> f32 {
        self.spring.value().max(0.0)
    }

    /// The date label fades with the marker but never past fully opaque.
    fn label_opacity(&self) -> f32 {
        self.spring.value().clamp(0.0, 1.0)
    }
}

#[derive(Clone, Debug)]
struct TimelineEntry {
    animator: ScrollProgressAnimator,
    marker: MarkerReveal,
}

/// Presentation values of one entry for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntryFrame {
    /// The entry the values belong to.
    pub key: EntryKey,
    /// Card opacity and slide offset.
    pub motion: SmoothedOutput,
    /// Marker dot scale, 0 hidden and 1 full size. Overshoots 1 briefly
    /// while popping in.
    pub marker_scale: f32,
    /// Date label opacity, driven by the marker spring.
    pub label_opacity: f32,
}

/// Everything that changed in one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimelineFrame {
    /// New line values, if the line moved.
    pub line: Option<SmoothedOutput>,
    /// Entries whose card or marker moved.
    pub entries: SmallVec<[EntryFrame; 4]>,
}

impl TimelineFrame {
    /// Whether nothing changed.
    pub fn is_empty(&self) -> bool {
        self.line.is_none() && self.entries.is_empty()
    }

    /// Values emitted for `key` this frame.
    pub fn entry(&self, key: EntryKey) -> Option<&EntryFrame> {
        self.entries.iter().find(|frame| frame.key == key)
    }
}

/// The line and the mounted entries of a timeline section.
#[derive(Debug)]
pub struct Timeline {
    config: TimelineConfig,
    line: ScrollProgressAnimator,
    entry_template: ScrollProgressAnimator,
    entries: SlotMap<EntryKey, TimelineEntry>,
}

impl Timeline {
    /// Creates an empty timeline.
    pub fn new(config: TimelineConfig) -> Result<Self, ConfigError> {
        config.marker.spring.validate()?;
        let line = ScrollProgressAnimator::new(config.line.clone())?;
        let entry_template = ScrollProgressAnimator::new(config.entry.clone())?;
        Ok(Self {
            config,
            line,
            entry_template,
            entries: SlotMap::with_key(),
        })
    }

    /// The configuration in use.
    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    /// Starts animating a new entry.
    pub fn mount_entry(&mut self) -> EntryKey {
        let key = self.entries.insert(TimelineEntry {
            animator: self.entry_template.clone(),
            marker: MarkerReveal::new(),
        });
        debug!(?key, "timeline entry mounted");
        key
    }

    /// Stops animating an entry and releases its state.
    ///
    /// Returns `false` if the entry was not mounted.
    pub fn unmount_entry(&mut self, key: EntryKey) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            debug!(?key, "timeline entry unmounted");
        }
        removed
    }

    /// Whether `key` is mounted.
    pub fn contains(&self, key: EntryKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of mounted entries.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Invalidates every measurement after a scroll or resize.
    pub fn on_viewport_event(&mut self, event: ViewportEvent) {
        trace!(?event, "timeline measurements invalidated");
        self.line.invalidate();
        for entry in self.entries.values_mut() {
            entry.animator.invalidate();
        }
    }

    /// Current line values.
    pub fn line_output(&self) -> SmoothedOutput {
        self.line.output()
    }

    /// Current values of one entry.
    pub fn entry_output(&self, key: EntryKey) -> Option<SmoothedOutput> {
        self.entries.get(key).map(|entry| entry.animator.output())
    }

    /// Runs one animation frame for the line and every mounted entry.
    #[tracing::instrument(level = "trace", skip(self, source))]
    pub fn tick(&mut self, frame_nanos: u64, source: &impl RegionSource) -> TimelineFrame {
        let viewport = source.viewport();
        let line = self
            .line
            .tick(frame_nanos, &viewport, || source.container());

        let mut entries = SmallVec::new();
        for (key, entry) in self.entries.iter_mut() {
            let mut measured = None;
            let motion = entry.animator.tick(frame_nanos, &viewport, || {
                measured = source.entry(key);
                measured
            });
            let in_view = measured.map(|region| region.intersects(&viewport));
            let marker_moved = entry
                .marker
                .update(frame_nanos, in_view, &self.config.marker);

            if motion.is_some() || marker_moved {
                entries.push(EntryFrame {
                    key,
                    motion: motion.unwrap_or_else(|| entry.animator.output()),
                    marker_scale: entry.marker.scale(),
                    label_opacity: entry.marker.label_opacity(),
                });
            }
        }

        TimelineFrame { line, entries }
    }
}
