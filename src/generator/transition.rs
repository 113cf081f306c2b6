//! Page and image transitions
//!
//! Purely visual descriptors. Renderers may animate them, or apply the end
//! state at once; no data depends on them.

use std::time::Duration;

pub const PAGE_EXIT: Duration = Duration::from_millis(400);
pub const PAGE_ENTER: Duration = Duration::from_millis(400);
pub const SELECT_IMAGE: Duration = Duration::from_millis(750);

/// Two-phase swap between the input and result steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTransition {
    pub forward: bool,
    pub exit_class: &'static str,
    pub enter_class: &'static str,
    /// Delay before visibility swaps
    pub exit: Duration,
    pub enter: Duration,
}

impl PageTransition {
    pub fn new(forward: bool) -> Self {
        let (exit_class, enter_class) = if forward {
            ("slide-out-left", "slide-in-right")
        } else {
            ("slide-out-right", "slide-in-left")
        };
        Self {
            forward,
            exit_class,
            enter_class,
            exit: PAGE_EXIT,
            enter: PAGE_ENTER,
        }
    }

    pub fn total(&self) -> Duration {
        self.exit + self.enter
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Card-to-preview move played when an image is picked
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageTransition {
    pub from: Rect,
    pub to: Rect,
    pub duration: Duration,
}

impl ImageTransition {
    /// Target is 90% of the left half, aspect kept, centred in that half
    pub fn to_preview(card: Rect, viewport_width: f64, viewport_height: f64) -> Self {
        let panel_width = viewport_width * 0.5;
        let width = panel_width * 0.9;
        let height = if card.width > 0.0 {
            card.height / card.width * width
        } else {
            0.0
        };

        Self {
            from: card,
            to: Rect {
                left: (panel_width - width) / 2.0,
                top: (viewport_height - height) / 2.0,
                width,
                height,
            },
            duration: SELECT_IMAGE,
        }
    }

    /// Linear interpolation; `t` is clamped to [0, 1]
    pub fn at(&self, t: f64) -> Rect {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: f64, b: f64| a + (b - a) * t;
        Rect {
            left: lerp(self.from.left, self.to.left),
            top: lerp(self.from.top, self.to.top),
            width: lerp(self.from.width, self.to.width),
            height: lerp(self.from.height, self.to.height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_transition_classes() {
        let fwd = PageTransition::new(true);
        assert_eq!(fwd.exit_class, "slide-out-left");
        assert_eq!(fwd.enter_class, "slide-in-right");
        let back = PageTransition::new(false);
        assert_eq!(back.exit_class, "slide-out-right");
        assert_eq!(back.enter_class, "slide-in-left");
        assert_eq!(fwd.total(), Duration::from_millis(800));
    }

    #[test]
    fn test_preview_target_geometry() {
        let card = Rect {
            left: 600.0,
            top: 300.0,
            width: 200.0,
            height: 100.0,
        };
        let t = ImageTransition::to_preview(card, 1000.0, 800.0);
        assert_eq!(t.to.width, 450.0);
        assert_eq!(t.to.height, 225.0);
        assert_eq!(t.to.left, 25.0);
        assert_eq!(t.to.top, 287.5);

        assert_eq!(t.at(0.0), card);
        assert_eq!(t.at(2.0), t.to);
        assert_eq!(t.at(0.5).width, 325.0);
    }
}
