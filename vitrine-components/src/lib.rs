//! Scroll-linked motion components built on `vitrine-ui`.
//!
//! - [`scroll_progress`]: progress of an element through a scroll window,
//!   mapped through [`keyframes`] and smoothed by a [`spring`].
//! - [`timeline`]: the career timeline, a line plus independently animated
//!   entries.
//! - [`in_view`]: time-based fade-and-rise when an element scrolls into
//!   view.
//! - [`navbar`]: the navbar's scrolled flag.
//! - [`theme`]: light/dark switching with a radial reveal and delayed
//!   mirrors.
//! - [`analytics`]: page views and per-section engagement.
//!
//! # Example
//!
//! ```
//! use vitrine_components::timeline::{EntryKey, RegionSource, Timeline, TimelineConfig};
//! use vitrine_ui::{Px, PxSize, ScrollRegion, Viewport};
//!
//! struct Page {
//!     scroll_y: i32,
//! }
//!
//! impl RegionSource for Page {
//!     fn viewport(&self) -> Viewport {
//!         Viewport::new(PxSize::new(Px(1280), Px(800)))
//!     }
//!     fn container(&self) -> Option<ScrollRegion> {
//!         Some(ScrollRegion::new(Px(1200 - self.scroll_y), Px(1600)))
//!     }
//!     fn entry(&self, _key: EntryKey) -> Option<ScrollRegion> {
//!         Some(ScrollRegion::new(Px(1300 - self.scroll_y), Px(300)))
//!     }
//! }
//!
//! let mut timeline = Timeline::new(TimelineConfig::default()).unwrap();
//! let card = timeline.mount_entry();
//!
//! let frame = timeline.tick(0, &Page { scroll_y: 0 });
//! assert_eq!(frame.entry(card).unwrap().motion.opacity, 0.0);
//! ```
#![deny(missing_docs, clippy::unwrap_used)]

pub mod analytics;
pub mod easing;
pub mod error;
pub mod in_view;
pub mod keyframes;
pub mod navbar;
pub mod scroll_progress;
pub mod spring;
pub mod theme;
pub mod timeline;

pub use crate::error::ConfigError;
