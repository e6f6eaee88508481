//! Page and section analytics.
//!
//! Events go to an optional [`AnalyticsSink`]. Analytics never affect the
//! page: without a sink nothing happens, and a failing sink is logged and
//! ignored.

use std::{fmt, sync::Arc};

use rustc_hash::FxHashMap;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};
use vitrine_ui::{ScrollRegion, Viewport};

/// Visible share of a section at which it counts as viewed.
pub const SECTION_VIEW_THRESHOLD: f32 = 0.5;

/// Name of the event sent when a page is shown.
pub const PAGE_VIEW: &str = "page_view";
/// Name of the event sent when a section comes into view.
pub const SECTION_VIEW: &str = "section_view";
/// Name of the event sent when a section leaves the view.
pub const SECTION_ENGAGEMENT_TIME: &str = "section_engagement_time";

/// Errors reported by an [`AnalyticsSink`].
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// The backend is not initialised or was shut down.
    #[error("analytics backend unavailable")]
    Unavailable,
    /// The backend rejected or failed to send an event.
    #[error("failed to deliver `{event}`: {reason}")]
    Delivery {
        /// Name of the event.
        event: String,
        /// Backend-provided reason.
        reason: String,
    },
}

/// A named event with JSON parameters.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnalyticsEvent {
    /// Event name.
    pub name: String,
    /// Event parameters.
    pub params: Map<String, Value>,
}

impl AnalyticsEvent {
    /// An event without parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Map::new(),
        }
    }

    /// Adds a parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// A page was shown.
    pub fn page_view(path: &str, search: &str) -> Self {
        Self::new(PAGE_VIEW)
            .with_param("page_path", path)
            .with_param("page_search", search)
    }

    /// Adds a parameter if `value` is present; `None` leaves the key out.
    pub fn with_optional_param(
        self,
        key: impl Into<String>,
        value: Option<impl Into<Value>>,
    ) -> Self {
        match value {
            Some(value) => self.with_param(key, value),
            None => self,
        }
    }

    /// A section came into view.
    pub fn section_view(name: &str, id: Option<&str>) -> Self {
        Self::new(SECTION_VIEW)
            .with_param("section_name", name)
            .with_optional_param("section_id", id)
    }

    /// A section was viewed for `seconds`.
    pub fn section_engagement(name: &str, id: Option<&str>, seconds: u64) -> Self {
        Self::new(SECTION_ENGAGEMENT_TIME)
            .with_param("section_name", name)
            .with_optional_param("section_id", id)
            .with_param("engagement_time_sec", seconds)
    }
}

/// Analytics backend.
pub trait AnalyticsSink: Send + Sync {
    /// Records one event.
    fn log_event(&self, event: &AnalyticsEvent) -> Result<(), AnalyticsError>;
}

/// Fire-and-forget front of an optional [`AnalyticsSink`].
#[derive(Clone, Default)]
pub struct Analytics {
    sink: Option<Arc<dyn AnalyticsSink>>,
}

impl fmt::Debug for Analytics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Analytics")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl Analytics {
    /// Sends events to `sink`.
    pub fn new(sink: Arc<dyn AnalyticsSink>) -> Self {
        Self { sink: Some(sink) }
    }

    /// Drops every event.
    pub fn disabled() -> Self {
        Self { sink: None }
    }

    /// Whether a sink is attached.
    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Sends `event`; failures are logged, never returned.
    pub fn track(&self, event: AnalyticsEvent) {
        let Some(sink) = &self.sink else {
            return;
        };
        match sink.log_event(&event) {
            Ok(()) => debug!(event = %event.name, "analytics event sent"),
            Err(err) => warn!(event = %event.name, error = %err, "analytics event dropped"),
        }
    }

    /// Sends a [`PAGE_VIEW`] event.
    pub fn track_page_view(&self, path: &str, search: &str) {
        self.track(AnalyticsEvent::page_view(path, search));
    }
}

#[derive(Debug)]
struct SectionState {
    id: Option<String>,
    entered_at: Option<u64>,
}

/// Reports when page sections are viewed and for how long.
#[derive(Debug)]
pub struct SectionTracker {
    analytics: Analytics,
    threshold: f32,
    sections: FxHashMap<String, SectionState>,
}

impl SectionTracker {
    /// Tracks sections with [`SECTION_VIEW_THRESHOLD`].
    pub fn new(analytics: Analytics) -> Self {
        Self::with_threshold(analytics, SECTION_VIEW_THRESHOLD)
    }

    /// Tracks sections that count as viewed once `threshold` of them is
    /// visible.
    pub fn with_threshold(analytics: Analytics, threshold: f32) -> Self {
        let threshold = if threshold.is_nan() {
            SECTION_VIEW_THRESHOLD
        } else {
            threshold.clamp(0.0, 1.0)
        };
        Self {
            analytics,
            threshold,
            sections: FxHashMap::default(),
        }
    }

    /// Starts tracking a section. Observing it again replaces its id and
    /// resets its state without reporting.
    pub fn observe(&mut self, name: impl Into<String>, id: Option<String>) {
        self.sections.insert(
            name.into(),
            SectionState {
                id,
                entered_at: None,
            },
        );
    }

    /// Whether `name` is observed.
    pub fn is_observed(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    /// Whether `name` is currently counted as viewed.
    pub fn is_viewing(&self, name: &str) -> bool {
        self.sections
            .get(name)
            .is_some_and(|state| state.entered_at.is_some())
    }

    /// Feeds the visible share of a section at `now_nanos`.
    ///
    /// The section enters once `visible_share` reaches the threshold and
    /// leaves when it drops below. Unknown sections are ignored.
    pub fn update(&mut self, name: &str, visible_share: f32, now_nanos: u64) {
        let Some(state) = self.sections.get_mut(name) else {
            return;
        };
        let visible = visible_share >= self.threshold;
        match (visible, state.entered_at) {
            (true, None) => {
                state.entered_at = Some(now_nanos);
                self.analytics
                    .track(AnalyticsEvent::section_view(name, state.id.as_deref()));
            }
            (false, Some(entered_at)) => {
                state.entered_at = None;
                let seconds = engagement_seconds(entered_at, now_nanos);
                self.analytics.track(AnalyticsEvent::section_engagement(
                    name,
                    state.id.as_deref(),
                    seconds,
                ));
            }
            _ => {}
        }
    }

    /// Feeds a section region measured against `viewport`.
    ///
    /// Visibility is [`ScrollRegion::visible_share`], so sections taller than
    /// the viewport still count as viewed while they fill enough of it.
    pub fn update_region(
        &mut self,
        name: &str,
        region: &ScrollRegion,
        viewport: &Viewport,
        now_nanos: u64,
    ) {
        self.update(name, region.visible_share(viewport), now_nanos);
    }

    /// Stops tracking a section, reporting its engagement time if it was
    /// being viewed. Returns `false` if it was not observed.
    pub fn unobserve(&mut self, name: &str, now_nanos: u64) -> bool {
        let Some(state) = self.sections.remove(name) else {
            return false;
        };
        if let Some(entered_at) = state.entered_at {
            let seconds = engagement_seconds(entered_at, now_nanos);
            self.analytics.track(AnalyticsEvent::section_engagement(
                name,
                state.id.as_deref(),
                seconds,
            ));
        }
        true
    }
}

fn engagement_seconds(entered_at: u64, now_nanos: u64) -> u64 {
    let nanos = now_nanos.saturating_sub(entered_at);
    (nanos as f64 / 1_000_000_000.0).round() as u64
}
