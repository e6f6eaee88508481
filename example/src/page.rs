//! A portfolio page laid out in document coordinates.

use rustc_hash::FxHashMap;
use vitrine_components::timeline::{EntryKey, RegionSource};
use vitrine_ui::{Px, PxSize, ScrollRegion, Viewport, ViewportEvent};

/// A block of the page, positioned from the document top.
#[derive(Clone, Copy, Debug)]
pub struct Block {
    pub top: Px,
    pub height: Px,
}

impl Block {
    pub const fn new(top: i32, height: i32) -> Self {
        Self {
            top: Px(top),
            height: Px(height),
        }
    }

    fn region(&self, scroll_y: Px) -> ScrollRegion {
        ScrollRegion::new(self.top - scroll_y, self.height)
    }
}

/// Page geometry plus the current scroll position.
pub struct Page {
    viewport: Viewport,
    scroll_y: Px,
    timeline: Block,
    entries: FxHashMap<EntryKey, Block>,
    sections: Vec<(&'static str, Block)>,
}

impl Page {
    pub fn new(size: PxSize) -> Self {
        Self {
            viewport: Viewport::new(size),
            scroll_y: Px::ZERO,
            timeline: Block::new(1200, 1800),
            entries: FxHashMap::default(),
            sections: vec![
                ("hero", Block::new(0, 900)),
                ("experience", Block::new(1000, 2200)),
                ("projects", Block::new(3300, 1400)),
                ("contact", Block::new(4800, 600)),
            ],
        }
    }

    pub fn place_entry(&mut self, key: EntryKey, block: Block) {
        self.entries.insert(key, block);
    }

    pub fn remove_entry(&mut self, key: EntryKey) {
        self.entries.remove(&key);
    }

    pub fn size(&self) -> PxSize {
        self.viewport.size()
    }

    pub fn scroll_y(&self) -> Px {
        self.scroll_y
    }

    /// Scrolls to `y`; returns the event to forward to animators.
    pub fn scroll_to(&mut self, y: Px) -> ViewportEvent {
        self.scroll_y = y.max(Px::ZERO);
        let event = ViewportEvent::Scrolled;
        self.viewport.apply(event);
        event
    }

    pub fn resize(&mut self, size: PxSize) -> ViewportEvent {
        let event = ViewportEvent::Resized(size);
        self.viewport.apply(event);
        event
    }

    pub fn sections(&self) -> impl Iterator<Item = (&'static str, ScrollRegion)> + '_ {
        self.sections
            .iter()
            .map(|(name, block)| (*name, block.region(self.scroll_y)))
    }
}

impl RegionSource for Page {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn container(&self) -> Option<ScrollRegion> {
        Some(self.timeline.region(self.scroll_y))
    }

    fn entry(&self, key: EntryKey) -> Option<ScrollRegion> {
        self.entries
            .get(&key)
            .map(|block| block.region(self.scroll_y))
    }
}
