/// DOM measurement and listener plumbing for the tab list
use crate::geometry::{Rect, ScrollPosition, Viewport};
use crate::tab_data::TabId;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Element, EventTarget, ScrollBehavior, ScrollToOptions};

pub const TAB_ID_ATTR: &str = "data-tab-id";

pub fn viewport(container: &Element) -> Viewport {
    Viewport {
        scroll_left: f64::from(container.scroll_left()),
        scroll_top: f64::from(container.scroll_top()),
        client_width: f64::from(container.client_width()),
        client_height: f64::from(container.client_height()),
        scroll_width: f64::from(container.scroll_width()),
        scroll_height: f64::from(container.scroll_height()),
    }
}

/// Element rectangle relative to the container's scrollable content
fn content_rect(container: &Element, element: &Element) -> Rect {
    let outer = container.get_bounding_client_rect();
    let inner = element.get_bounding_client_rect();
    Rect::new(
        inner.left() - outer.left() + f64::from(container.scroll_left()),
        inner.top() - outer.top() + f64::from(container.scroll_top()),
        inner.width(),
        inner.height(),
    )
}

/// Rendered tab rectangles in document order; tabs inside collapsed
/// sections have no box and are skipped
pub fn tab_rects(container: &Element) -> Vec<(TabId, Rect)> {
    let Ok(nodes) = container.query_selector_all(&format!("[{}]", TAB_ID_ATTR)) else {
        return Vec::new();
    };

    (0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .filter_map(|element| {
            let tab_id = element.get_attribute(TAB_ID_ATTR)?.parse::<TabId>().ok()?;
            let rect = content_rect(container, &element);
            (!rect.is_empty()).then_some((tab_id, rect))
        })
        .collect()
}

/// `None` when the tab is not rendered or has no box
pub fn tab_rect(container: &Element, tab_id: TabId) -> Option<Rect> {
    let selector = format!("[{}=\"{}\"]", TAB_ID_ATTR, tab_id);
    let element = container.query_selector(&selector).ok()??;
    let rect = content_rect(container, &element);
    (!rect.is_empty()).then_some(rect)
}

/// Jump without animation, used when restoring after a re-render
pub fn set_scroll(container: &Element, position: ScrollPosition) {
    container.set_scroll_left(position.left.round() as i32);
    container.set_scroll_top(position.top.round() as i32);
}

pub fn smooth_scroll(container: &Element, position: ScrollPosition) {
    let options = ScrollToOptions::new();
    options.set_left(position.left);
    options.set_top(position.top);
    options.set_behavior(ScrollBehavior::Smooth);
    container.scroll_to_with_scroll_to_options(&options);
}

/// A registered DOM listener, removed again on drop
pub struct EventListener {
    target: EventTarget,
    event_type: &'static str,
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

impl EventListener {
    pub fn new(
        target: &EventTarget,
        event_type: &'static str,
        passive: bool,
        callback: impl FnMut(web_sys::Event) + 'static,
    ) -> Result<EventListener, JsValue> {
        let callback = Closure::wrap(Box::new(callback) as Box<dyn FnMut(web_sys::Event)>);
        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            event_type,
            callback.as_ref().unchecked_ref(),
            &options,
        )?;

        Ok(EventListener {
            target: target.clone(),
            event_type,
            callback,
        })
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event_type, self.callback.as_ref().unchecked_ref());
    }
}
