/// Scroll and keyboard navigation over the tab list
use crate::geometry::{Rect, ScrollPosition, Viewport};
use crate::tab_data::{TabId, TabInfo};

/// Space kept between a revealed tab and the viewport edge
const REVEAL_PADDING: f64 = 10.0;
/// Moves smaller than this are not worth an animated scroll
const SCROLL_EPSILON: f64 = 5.0;

pub fn scroll_to_first() -> ScrollPosition {
    ScrollPosition::default()
}

pub fn scroll_to_last(viewport: &Viewport) -> ScrollPosition {
    ScrollPosition::new(viewport.max_scroll_left(), viewport.max_scroll_top())
}

pub fn page_back(viewport: &Viewport) -> ScrollPosition {
    viewport.clamp(ScrollPosition::new(
        viewport.scroll_left - viewport.client_width,
        viewport.scroll_top - viewport.client_height,
    ))
}

pub fn page_forward(viewport: &Viewport) -> ScrollPosition {
    viewport.clamp(ScrollPosition::new(
        viewport.scroll_left + viewport.client_width,
        viewport.scroll_top + viewport.client_height,
    ))
}

/// Bring a tab into view: centered horizontally, and vertically moved only as
/// far as needed to show it whole. `None` when the view is already close
/// enough.
pub fn reveal(viewport: &Viewport, tab: &Rect) -> Option<ScrollPosition> {
    let left = tab.left - viewport.client_width / 2.0 + tab.width / 2.0;

    let visible_top = viewport.scroll_top;
    let visible_bottom = viewport.scroll_top + viewport.client_height;
    let top = if tab.top < visible_top {
        tab.top - REVEAL_PADDING
    } else if tab.bottom() > visible_bottom {
        tab.bottom() - viewport.client_height + REVEAL_PADDING
    } else {
        viewport.scroll_top
    };

    let target = viewport.clamp(ScrollPosition::new(left, top));

    let moved = (viewport.scroll_left - target.left).abs() > SCROLL_EPSILON
        || (viewport.scroll_top - target.top).abs() > SCROLL_EPSILON;
    moved.then_some(target)
}

/// Vertical wheel motion scrolls the strip horizontally
pub fn wheel_scroll_left(viewport: &Viewport, delta_y: f64, scroll_speed: f64) -> Option<f64> {
    if delta_y == 0.0 {
        return None;
    }
    Some(viewport.scroll_left + delta_y * scroll_speed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Make this tab the active one
    Activate(TabId),
    /// Key handled, selection already at the edge
    Stay,
    ClosePopup,
    Unhandled,
}

impl KeyAction {
    pub fn is_handled(&self) -> bool {
        !matches!(self, KeyAction::Unhandled)
    }
}

/// Map a `KeyboardEvent.key` to a navigation action
pub fn key_action(tabs: &[TabInfo], key: &str) -> KeyAction {
    let Some(current) = tabs.iter().position(|tab| tab.active) else {
        return KeyAction::Unhandled;
    };
    let last = tabs.len() - 1;

    let next = match key {
        "ArrowLeft" => current.saturating_sub(1),
        "ArrowRight" => (current + 1).min(last),
        "Home" => 0,
        "End" => last,
        "Enter" => return KeyAction::ClosePopup,
        _ => return KeyAction::Unhandled,
    };

    if next == current {
        KeyAction::Stay
    } else {
        KeyAction::Activate(tabs[next].id)
    }
}
