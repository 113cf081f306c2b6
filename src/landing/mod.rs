//! Landing controller
//!
//! Cosmetic state only: the typewriter headline, the header's scrolled
//! look, the mobile menu, anchor targets, reveal-on-scroll and the star
//! count. Nothing here gates the rest of the application.

pub mod typewriter;

use std::collections::HashSet;

/// Header switches to its compact look past this offset
pub const SCROLL_THRESHOLD: f64 = 10.0;

/// Fraction of an element that must be visible before it is revealed
pub const REVEAL_THRESHOLD: f64 = 0.1;

pub fn header_scrolled(scroll_y: f64) -> bool {
    scroll_y > SCROLL_THRESHOLD
}

/// Mobile navigation menu
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavMenu {
    open: bool,
}

impl NavMenu {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Following any nav link closes the menu
    pub fn follow_link(&mut self) {
        self.open = false;
    }
}

/// In-page target of `href`, if it is an anchor to an existing id
pub fn anchor_target<'a>(href: &'a str, ids: &HashSet<String>) -> Option<&'a str> {
    let id = href.strip_prefix('#')?;
    ids.contains(id).then_some(id)
}

/// Elements revealed so far; once revealed they stay revealed
#[derive(Debug, Clone, Default)]
pub struct RevealTracker {
    revealed: HashSet<String>,
}

impl RevealTracker {
    /// Record an intersection change; returns true on first reveal
    pub fn observe(&mut self, id: &str, visible_ratio: f64) -> bool {
        if visible_ratio >= REVEAL_THRESHOLD {
            self.revealed.insert(id.to_string())
        } else {
            false
        }
    }

    pub fn is_revealed(&self, id: &str) -> bool {
        self.revealed.contains(id)
    }
}
