//! Navigation bar state driven by the page scroll position.

use vitrine_ui::Px;

/// Scroll distance past which the navbar counts as scrolled.
pub const SCROLLED_THRESHOLD: Px = Px(20);

/// Whether the page has scrolled far enough for the navbar to switch to its
/// compact, backed style.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrolledFlag {
    threshold: Px,
    scrolled: bool,
}

impl Default for ScrolledFlag {
    fn default() -> Self {
        Self::with_threshold(SCROLLED_THRESHOLD)
    }
}

impl ScrolledFlag {
    /// A flag that is set once the scroll position exceeds `threshold`.
    pub const fn with_threshold(threshold: Px) -> Self {
        Self {
            threshold,
            scrolled: false,
        }
    }

    /// Whether the page is scrolled past the threshold.
    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    /// Feeds the current vertical scroll position. Returns `true` if the flag
    /// flipped.
    pub fn update(&mut self, scroll_y: Px) -> bool {
        let scrolled = scroll_y > self.threshold;
        let changed = scrolled != self.scrolled;
        self.scrolled = scrolled;
        changed
    }
}
