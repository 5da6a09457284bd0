/// Scroll anchoring across full re-renders of the tab list
///
/// Before the list is rebuilt we remember which tab sits under the
/// viewport's top-left corner and how far into it the corner is. After the
/// rebuild the same tab is looked up again and the scroll offset is chosen so
/// the corner lands on the same spot inside it.
use crate::geometry::{Rect, ScrollPosition, Viewport};
use crate::tab_data::TabId;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollAnchor {
    pub tab_id: TabId,
    pub offset_x: f64,
    pub offset_y: f64,
}

/// Everything needed to restore the view after a rebuild
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorCapture {
    pub anchor: Option<ScrollAnchor>,
    pub saved: ScrollPosition,
}

fn anchor_at(tab_id: TabId, rect: &Rect, corner: ScrollPosition) -> ScrollAnchor {
    ScrollAnchor {
        tab_id,
        offset_x: corner.left - rect.left,
        offset_y: corner.top - rect.top,
    }
}

/// Pick the anchor tab from rendered tabs given in document order.
///
/// The first tab containing the viewport corner wins. Otherwise the tab with
/// the smallest distance past the scroll position is used.
pub fn capture_anchor(viewport: &Viewport, tabs: &[(TabId, Rect)]) -> AnchorCapture {
    let corner = viewport.position();

    let covering = tabs
        .iter()
        .find(|(_, rect)| rect.contains(corner.left, corner.top));

    let anchor = covering
        .or_else(|| {
            let distance = |rect: &Rect| {
                (rect.top - corner.top).max(0.0) + (rect.left - corner.left).max(0.0)
            };
            // Keeps the earliest tab on ties
            tabs.iter().fold(None, |best: Option<&(TabId, Rect)>, candidate| match best {
                Some(current) if distance(&current.1) <= distance(&candidate.1) => Some(current),
                _ => Some(candidate),
            })
        })
        .map(|(tab_id, rect)| anchor_at(*tab_id, rect, corner));

    AnchorCapture {
        anchor,
        saved: corner,
    }
}

/// Scroll position that puts the anchor back under the viewport corner.
///
/// `anchor_rect` is the anchor tab's rectangle in the rebuilt list, or `None`
/// when it is gone; then the previous raw offsets are clamped instead.
pub fn restore_position(
    capture: &AnchorCapture,
    anchor_rect: Option<Rect>,
    viewport: &Viewport,
) -> ScrollPosition {
    let target = match (capture.anchor, anchor_rect) {
        (Some(anchor), Some(rect)) => ScrollPosition::new(
            rect.left + anchor.offset_x,
            rect.top + anchor.offset_y,
        ),
        _ => capture.saved,
    };

    viewport.clamp(target)
}
