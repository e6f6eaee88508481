//! Drives the vitrine components through a simulated visit of a portfolio
//! page: scroll down through the timeline, toggle the theme, resize, leave.

mod page;

use std::sync::Arc;

use tracing::{debug, info};
use vitrine_components::{
    analytics::{Analytics, AnalyticsError, AnalyticsEvent, AnalyticsSink, SectionTracker},
    easing::Easing,
    in_view::{InViewReveal, InViewState},
    navbar::ScrolledFlag,
    theme::ThemeController,
    timeline::{RegionSource, Timeline, TimelineConfig},
};
use vitrine_ui::{Px, PxPosition, PxSize};

use crate::page::{Block, Page};

const FRAME_NANOS: u64 = 16_666_667;
const SCROLL_FRAMES: u64 = 240;
const SCROLL_DISTANCE: f32 = 3000.0;
const LOG_FILTER: &str = "error,vitrine_components=info,example=debug,analytics=info";

/// Writes analytics events to the log instead of a backend.
struct LogSink;

impl AnalyticsSink for LogSink {
    fn log_event(&self, event: &AnalyticsEvent) -> Result<(), AnalyticsError> {
        let params = serde_json::to_string(&event.params).map_err(|err| {
            AnalyticsError::Delivery {
                event: event.name.clone(),
                reason: err.to_string(),
            }
        })?;
        info!(target: "analytics", name = %event.name, %params);
        Ok(())
    }
}

/// Runs the simulated visit, logging every animation frame.
pub fn run() {
    vitrine_ui::init_tracing_with_default(LOG_FILTER);

    let mut timeline = match Timeline::new(TimelineConfig::default()) {
        Ok(timeline) => timeline,
        Err(err) => {
            tracing::error!(%err, "invalid timeline configuration");
            return;
        }
    };
    let mut theme = ThemeController::default();
    let mut navbar_theme = theme.mirror();
    let analytics = Analytics::new(Arc::new(LogSink));
    let mut sections = SectionTracker::new(analytics.clone());
    let mut navbar = ScrolledFlag::default();

    let mut page = Page::new(PxSize::new(Px(1280), Px(800)));
    let mut entries = Vec::new();
    for index in 0..4 {
        let key = timeline.mount_entry();
        page.place_entry(key, Block::new(1250 + index * 420, 360));
        entries.push(key);
    }

    analytics.track_page_view("/", "");
    let mut headings = Vec::new();
    for (name, _) in page.sections() {
        sections.observe(name, Some(name.to_owned()));
        headings.push((name, InViewState::new(InViewReveal::default())));
    }

    let mut now = 0;
    for frame in 0..=SCROLL_FRAMES {
        now = frame * FRAME_NANOS;

        let t = frame as f32 / SCROLL_FRAMES as f32;
        let target = Px::saturating_from_f32(Easing::EaseInOut.apply(t) * SCROLL_DISTANCE);
        if target != page.scroll_y() {
            timeline.on_viewport_event(page.scroll_to(target));
            if navbar.update(page.scroll_y()) {
                info!(frame, scrolled = navbar.is_scrolled(), "navbar style changed");
            }
        }

        if frame == 90 {
            let click = PxPosition::new(Px(1220), Px(36));
            theme.toggle(click, page.size(), now);
        }
        if frame == 150 {
            timeline.on_viewport_event(page.resize(PxSize::new(Px(900), Px(1000))));
        }

        let output = timeline.tick(now, &page);
        if let Some(line) = output.line {
            debug!(frame, fill = line.fill_ratio, "timeline line");
        }
        for entry in &output.entries {
            debug!(
                frame,
                key = ?entry.key,
                opacity = entry.motion.opacity,
                offset = entry.motion.offset,
                marker = entry.marker_scale,
                label = entry.label_opacity,
                "timeline entry"
            );
        }

        if let Some(reveal) = theme.reveal_frame(now) {
            debug!(frame, radius = reveal.radius, mode = reveal.mode.as_str(), "theme reveal");
        }
        if navbar_theme.poll(now) {
            info!(frame, mode = navbar_theme.value().as_str(), "navbar theme updated");
        }

        let viewport = page.viewport();
        for ((name, region), (_, heading)) in page.sections().zip(headings.iter_mut()) {
            sections.update_region(name, &region, &viewport, now);
            if let Some(reveal) = heading.update_region(now, &region, &viewport) {
                debug!(
                    frame,
                    name,
                    opacity = reveal.opacity,
                    offset = reveal.offset,
                    "heading reveal"
                );
            }
        }
    }

    for key in entries {
        timeline.unmount_entry(key);
        page.remove_entry(key);
    }
    let names: Vec<_> = page.sections().map(|(name, _)| name).collect();
    for name in names {
        sections.unobserve(name, now);
    }
    info!(
        scroll_y = page.scroll_y().raw(),
        theme = theme.mode().as_str(),
        "visit finished"
    );
}
