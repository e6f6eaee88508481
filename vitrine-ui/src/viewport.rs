//! Viewport and element geometry as seen by scroll-linked effects.
//!
//! ## Usage
//!
//! The host measures every observed element relative to the viewport and
//! hands the result over as a [`ScrollRegion`]. [`ViewportEvent`]s mark the
//! points at which those measurements go stale.

use crate::px::{Px, PxSize};

/// Vertical extent of one observed element, relative to the viewport's top
/// edge.
///
/// The region is re-measured on every scroll or resize; it is never cached
/// across events.
///
/// # Examples
///
/// ```
/// use vitrine_ui::{Px, PxSize, ScrollRegion, Viewport};
///
/// let viewport = Viewport::new(PxSize::new(Px(800), Px(600)));
/// let region = ScrollRegion::new(Px(500), Px(200));
///
/// assert_eq!(region.bottom(), Px(700));
/// assert_eq!(region.visible_ratio(&viewport), 0.5);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollRegion {
    top: Px,
    bottom: Px,
}

impl ScrollRegion {
    /// Creates a region from its top edge and height. Negative heights are
    /// treated as zero.
    pub fn new(top: Px, height: Px) -> Self {
        Self {
            top,
            bottom: top.saturating_add(height.positive()),
        }
    }

    /// Creates a region from both edges. Edges given in the wrong order are
    /// swapped.
    pub fn from_edges(top: Px, bottom: Px) -> Self {
        Self {
            top: top.min(bottom),
            bottom: top.max(bottom),
        }
    }

    /// Top edge relative to the viewport top.
    pub fn top(&self) -> Px {
        self.top
    }

    /// Bottom edge relative to the viewport top.
    pub fn bottom(&self) -> Px {
        self.bottom
    }

    /// Height of the region, never negative.
    pub fn height(&self) -> Px {
        self.bottom - self.top
    }

    /// Vertical center, in fractional pixels.
    pub fn center(&self) -> f32 {
        (self.top.to_f32() + self.bottom.to_f32()) * 0.5
    }

    /// Position of a point at `fraction` of the region's height (0 = top,
    /// 1 = bottom).
    pub fn point_at(&self, fraction: f32) -> f32 {
        self.top.to_f32() + self.height().to_f32() * fraction
    }

    /// Returns the same region moved by `dy` pixels.
    pub fn translated(&self, dy: Px) -> Self {
        Self {
            top: self.top.saturating_add(dy),
            bottom: self.bottom.saturating_add(dy),
        }
    }

    /// Whether any part of the region lies inside the viewport.
    pub fn intersects(&self, viewport: &Viewport) -> bool {
        let height = viewport.height();
        if self.height() == Px::ZERO {
            return self.top >= Px::ZERO && self.top <= height;
        }
        self.bottom > Px::ZERO && self.top < height
    }

    /// Fraction of the region's own height that is inside the viewport.
    ///
    /// A zero-height region counts as fully visible while it sits inside the
    /// viewport and invisible otherwise.
    pub fn visible_ratio(&self, viewport: &Viewport) -> f32 {
        let height = self.height();
        if height == Px::ZERO {
            return if self.intersects(viewport) { 1.0 } else { 0.0 };
        }
        let visible_top = self.top.max(Px::ZERO);
        let visible_bottom = self.bottom.min(viewport.height());
        let overlap = (visible_bottom - visible_top).positive();
        (overlap.to_f32() / height.to_f32()).clamp(0.0, 1.0)
    }

    /// Visible part of the region relative to the most of it that could be
    /// visible at once: its own height, or the viewport height for regions
    /// taller than the viewport.
    ///
    /// Unlike [`visible_ratio`](Self::visible_ratio) this reaches 1 for a
    /// tall region filling the viewport.
    pub fn visible_share(&self, viewport: &Viewport) -> f32 {
        let capacity = self.height().min(viewport.height());
        if capacity <= Px::ZERO {
            return if self.intersects(viewport) { 1.0 } else { 0.0 };
        }
        let visible_top = self.top.max(Px::ZERO);
        let visible_bottom = self.bottom.min(viewport.height());
        let overlap = (visible_bottom - visible_top).positive();
        (overlap.to_f32() / capacity.to_f32()).clamp(0.0, 1.0)
    }
}

/// The visible area that scroll regions are measured against.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    size: PxSize,
}

impl Viewport {
    /// Creates a viewport of the given size.
    pub const fn new(size: PxSize) -> Self {
        Self { size }
    }

    /// Viewport size.
    pub fn size(&self) -> PxSize {
        self.size
    }

    /// Viewport height, the axis scroll progress is measured on.
    pub fn height(&self) -> Px {
        self.size.height
    }

    /// Applies an event to the viewport.
    ///
    /// Returns `true` when measurements taken before the event are stale,
    /// which is the case for every scroll and every resize.
    pub fn apply(&mut self, event: ViewportEvent) -> bool {
        if let ViewportEvent::Resized(size) = event {
            self.size = size;
        }
        true
    }
}

/// Events after which every observed region must be re-measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportEvent {
    /// The page scrolled.
    Scrolled,
    /// The viewport changed size.
    Resized(PxSize),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(height: i32) -> Viewport {
        Viewport::new(PxSize::new(Px(1000), Px(height)))
    }

    #[test]
    fn region_edges_are_normalized() {
        let region = ScrollRegion::from_edges(Px(300), Px(100));
        assert_eq!(region.top(), Px(100));
        assert_eq!(region.bottom(), Px(300));
        assert_eq!(region.height(), Px(200));
        assert_eq!(region.center(), 200.0);

        let negative = ScrollRegion::new(Px(10), Px(-20));
        assert_eq!(negative.height(), Px::ZERO);
    }

    #[test]
    fn visible_ratio_tracks_overlap() {
        let vp = viewport(600);
        assert_eq!(ScrollRegion::new(Px(100), Px(200)).visible_ratio(&vp), 1.0);
        assert_eq!(ScrollRegion::new(Px(-100), Px(200)).visible_ratio(&vp), 0.5);
        assert_eq!(ScrollRegion::new(Px(600), Px(200)).visible_ratio(&vp), 0.0);
        assert_eq!(ScrollRegion::new(Px(-400), Px(200)).visible_ratio(&vp), 0.0);
        // Taller than the viewport.
        assert_eq!(ScrollRegion::new(Px(-300), Px(1200)).visible_ratio(&vp), 0.5);
    }

    #[test]
    fn visible_share_caps_at_viewport_height() {
        let vp = viewport(800);
        let tall = ScrollRegion::new(Px(-500), Px(2200));
        assert_eq!(tall.visible_ratio(&vp), 800.0 / 2200.0);
        assert_eq!(tall.visible_share(&vp), 1.0);
        assert_eq!(ScrollRegion::new(Px(400), Px(2200)).visible_share(&vp), 0.5);
        // Short regions behave like `visible_ratio`.
        let short = ScrollRegion::new(Px(-100), Px(200));
        assert_eq!(short.visible_share(&vp), short.visible_ratio(&vp));
        assert_eq!(ScrollRegion::new(Px(900), Px(2200)).visible_share(&vp), 0.0);
    }

    #[test]
    fn zero_height_regions() {
        let vp = viewport(600);
        let inside = ScrollRegion::new(Px(300), Px::ZERO);
        let outside = ScrollRegion::new(Px(-1), Px::ZERO);
        assert!(inside.intersects(&vp));
        assert_eq!(inside.visible_ratio(&vp), 1.0);
        assert!(!outside.intersects(&vp));
        assert_eq!(outside.visible_ratio(&vp), 0.0);
    }

    #[test]
    fn resize_updates_viewport() {
        let mut vp = viewport(600);
        assert!(vp.apply(ViewportEvent::Scrolled));
        assert_eq!(vp.height(), Px(600));
        assert!(vp.apply(ViewportEvent::Resized(PxSize::new(Px(400), Px(900)))));
        assert_eq!(vp.height(), Px(900));
    }

    #[test]
    fn translated_moves_both_edges() {
        let region = ScrollRegion::new(Px(100), Px(50)).translated(Px(-30));
        assert_eq!(region.top(), Px(70));
        assert_eq!(region.bottom(), Px(120));
    }
}
