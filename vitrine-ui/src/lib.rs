//! Core primitives for vitrine, a scroll-linked motion engine for single-page
//! sites.
//!
//! This crate holds the pieces every effect shares:
//!
//! - [`px`]: physical pixel geometry ([`Px`], [`PxPosition`], [`PxSize`]).
//! - [`viewport`]: element regions measured relative to the viewport and the
//!   events that invalidate them.
//! - [`frame`]: animation-frame timing.
//! - [`deferred`]: shared flags ([`Signal`]) and their delayed mirrors
//!   ([`Deferred`]).
//! - [`logging`]: `tracing` subscriber setup for binaries.
//!
//! The motion components themselves live in `vitrine-components`.
//!
//! # Example
//!
//! ```
//! use vitrine_ui::{Px, PxSize, ScrollRegion, Viewport, ViewportEvent};
//!
//! let mut viewport = Viewport::new(PxSize::new(Px(1280), Px(720)));
//! let stale = viewport.apply(ViewportEvent::Resized(PxSize::new(Px(800), Px(600))));
//! assert!(stale);
//!
//! let card = ScrollRegion::new(Px(450), Px(300));
//! assert!(card.intersects(&viewport));
//! ```
#![deny(missing_docs, clippy::unwrap_used)]

pub mod deferred;
pub mod frame;
pub mod logging;
pub mod px;
pub mod viewport;

pub use crate::{
    deferred::{Deferred, Signal},
    frame::FrameClock,
    logging::{init_tracing, init_tracing_with_default},
    px::{Px, PxPosition, PxSize},
    viewport::{ScrollRegion, Viewport, ViewportEvent},
};
