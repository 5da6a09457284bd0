/// Scroll container geometry in content coordinates
///
/// All rectangles are measured relative to the scrollable content of the tab
/// list, so they do not change when the list scrolls.

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Rect {
        Rect {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// No layout box, e.g. a tab inside a collapsed section
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 && self.height <= 0.0
    }

    /// Edges count as inside
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right() && y >= self.top && y <= self.bottom()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollPosition {
    pub left: f64,
    pub top: f64,
}

impl ScrollPosition {
    pub fn new(left: f64, top: f64) -> ScrollPosition {
        ScrollPosition { left, top }
    }
}

/// Snapshot of the scroll container's metrics
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub scroll_left: f64,
    pub scroll_top: f64,
    pub client_width: f64,
    pub client_height: f64,
    pub scroll_width: f64,
    pub scroll_height: f64,
}

impl Viewport {
    pub fn position(&self) -> ScrollPosition {
        ScrollPosition::new(self.scroll_left, self.scroll_top)
    }

    pub fn max_scroll_left(&self) -> f64 {
        (self.scroll_width - self.client_width).max(0.0)
    }

    pub fn max_scroll_top(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }

    /// Clamp a target into the scrollable extent
    pub fn clamp(&self, target: ScrollPosition) -> ScrollPosition {
        ScrollPosition {
            left: target.left.min(self.max_scroll_left()).max(0.0),
            top: target.top.min(self.max_scroll_top()).max(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport {
            scroll_left: 0.0,
            scroll_top: 0.0,
            client_width: 400.0,
            client_height: 200.0,
            scroll_width: 1000.0,
            scroll_height: 500.0,
        }
    }

    #[test]
    fn test_rect_contains_edges() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);

        assert!(rect.contains(10.0, 20.0));
        assert!(rect.contains(40.0, 60.0));
        assert!(!rect.contains(40.5, 30.0));
        assert!(!rect.contains(15.0, 19.0));
    }

    #[test]
    fn test_collapsed_box_is_empty() {
        assert!(Rect::default().is_empty());
        assert!(Rect::new(240.0, 0.0, 0.0, 0.0).is_empty());
        assert!(!Rect::new(0.0, 0.0, 120.0, 0.0).is_empty());
        assert!(!Rect::new(0.0, 0.0, 120.0, 80.0).is_empty());
    }

    #[test]
    fn test_clamp() {
        let vp = viewport();

        assert_eq!(vp.max_scroll_left(), 600.0);
        assert_eq!(vp.max_scroll_top(), 300.0);
        assert_eq!(
            vp.clamp(ScrollPosition::new(-5.0, 900.0)),
            ScrollPosition::new(0.0, 300.0)
        );
    }

    #[test]
    fn test_content_smaller_than_viewport() {
        let vp = Viewport {
            scroll_width: 100.0,
            scroll_height: 50.0,
            ..viewport()
        };

        assert_eq!(vp.clamp(ScrollPosition::new(30.0, 30.0)), ScrollPosition::default());
    }
}
