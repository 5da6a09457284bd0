/// Popup UI for Tab Navigator

use crate::anchor::{capture_anchor, restore_position};
use crate::bridge::{self, TabEventSubscription};
use crate::colors::resolve_group_color;
use crate::geometry::{ScrollPosition, Viewport};
use crate::hover::{HIDE_AFTER_BAR_LEAVE_MS, HIDE_AFTER_TAB_LEAVE_MS, SCROLL_QUIET_MS};
use crate::navigation::{self, KeyAction};
use crate::sections::{group_ids, tab_counter_text};
use crate::settings::{POPUP_HEIGHT, SettingsStore};
use crate::tab_data::{TabId, TabInfo};
use crate::ui::components::{ActionBar, SectionView, TabInfoPanel};
use crate::ui::dom::{self, EventListener};
use crate::ui::session::{AfterRender, PopupSession};
use gloo_timers::callback::Timeout;
use patternfly_yew::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, KeyboardEvent, WheelEvent};
use yew::prelude::*;

/// Lets the first layout settle before centering the active tab
const FIRST_CENTER_DELAY_MS: u32 = 100;
/// Lets an expanded section lay out before revealing a tab inside it
const EXPAND_SETTLE_MS: u32 = 50;

fn now() -> f64 {
    js_sys::Date::now()
}

/// Shared handle the popup's callbacks, timers and listeners act through
#[derive(Clone)]
struct PopupHandle {
    session: Rc<RefCell<PopupSession>>,
    list: NodeRef,
    redraw: UseForceUpdateHandle,
}

impl PopupHandle {
    fn redraw(&self) {
        self.redraw.force_update();
    }

    fn container(&self) -> Option<Element> {
        self.list.cast::<Element>()
    }

    /// Re-query the window and replace the snapshot. Overlapping refreshes
    /// are not coalesced; whichever finishes last wins.
    fn refresh(&self) {
        let handle = self.clone();
        spawn_local(async move {
            let tabs = match bridge::current_window_tabs().await {
                Ok(tabs) => tabs,
                Err(e) => {
                    log::error!("Error fetching tabs: {}", e);
                    return;
                }
            };
            let groups = bridge::tab_groups(&group_ids(&tabs)).await;

            let anchor = handle
                .container()
                .map(|list| capture_anchor(&dom::viewport(&list), &dom::tab_rects(&list)));
            log::debug!("Refreshed {} tabs, anchor {:?}", tabs.len(), anchor);

            handle.session.borrow_mut().apply_snapshot(tabs, groups, anchor);
            handle.redraw();
        });
    }

    fn after_render(&self) {
        let follow_up = self.session.borrow_mut().take_after_render();
        let Some(list) = self.container() else {
            return;
        };

        match follow_up {
            AfterRender::Nothing => {}
            AfterRender::RestoreAnchor(capture) => {
                let rect = capture
                    .anchor
                    .and_then(|anchor| dom::tab_rect(&list, anchor.tab_id));
                let target = restore_position(&capture, rect, &dom::viewport(&list));
                dom::set_scroll(&list, target);
            }
            AfterRender::CenterActive => {
                let handle = self.clone();
                let timeout = Timeout::new(FIRST_CENTER_DELAY_MS, move || {
                    handle.session.borrow_mut().reveal_timer.clear();
                    handle.reveal_active();
                });
                self.session.borrow_mut().reveal_timer.schedule(timeout);
            }
        }
    }

    fn reveal_active(&self) {
        let Some(list) = self.container() else {
            return;
        };
        let active_id = self.session.borrow().active_tab().map(|tab| tab.id);
        let Some(rect) = active_id.and_then(|tab_id| dom::tab_rect(&list, tab_id)) else {
            return;
        };
        if let Some(target) = navigation::reveal(&dom::viewport(&list), &rect) {
            dom::smooth_scroll(&list, target);
        }
    }

    fn scroll_to_active(&self) {
        let expanded = {
            let mut session = self.session.borrow_mut();
            let active_id = session.active_tab().map(|tab| tab.id);
            active_id.map(|tab_id| session.expand_section_of(tab_id))
        };

        match expanded {
            None => return,
            Some(true) => self.redraw(),
            Some(false) => {}
        }

        let handle = self.clone();
        let timeout = Timeout::new(EXPAND_SETTLE_MS, move || {
            handle.session.borrow_mut().reveal_timer.clear();
            handle.reveal_active();
        });
        self.session.borrow_mut().reveal_timer.schedule(timeout);
    }

    fn scroll_with(&self, target: impl FnOnce(&Viewport) -> ScrollPosition) {
        if let Some(list) = self.container() {
            let position = target(&dom::viewport(&list));
            dom::smooth_scroll(&list, position);
        }
    }

    fn signal_scroll(&self) {
        let was_scrolling = {
            let mut session = self.session.borrow_mut();
            let was_scrolling = session.hover.is_scrolling(now());
            session.hover.signal_scroll(now());
            was_scrolling
        };

        let handle = self.clone();
        let timeout = Timeout::new(SCROLL_QUIET_MS, move || {
            let ended = {
                let mut session = handle.session.borrow_mut();
                session.scroll_timer.clear();
                session.hover.end_scroll()
            };
            if ended {
                handle.redraw();
            }
        });
        self.session.borrow_mut().scroll_timer.schedule(timeout);

        if !was_scrolling {
            self.redraw();
        }
    }

    fn tab_enter(&self, tab: TabInfo) {
        let shown = {
            let mut session = self.session.borrow_mut();
            let shown = session.hover.enter_tab(&tab, now());
            if shown {
                session.hide_timer.cancel();
            }
            shown
        };
        if shown {
            self.redraw();
        }
    }

    fn tab_leave(&self, tab_id: TabId) {
        self.session.borrow_mut().hover.leave_tab(tab_id);

        let handle = self.clone();
        let timeout = Timeout::new(HIDE_AFTER_TAB_LEAVE_MS, move || {
            let hidden = {
                let mut session = handle.session.borrow_mut();
                session.hide_timer.clear();
                session.hover.hide_after_tab_leave()
            };
            if hidden {
                handle.redraw();
            }
        });
        self.session.borrow_mut().hide_timer.schedule(timeout);
    }

    fn bar_enter(&self) {
        {
            let mut session = self.session.borrow_mut();
            session.hide_timer.cancel();
            session.hover.enter_bar();
        }
        self.redraw();
    }

    fn bar_leave(&self) {
        self.session.borrow_mut().hover.leave_bar();

        let handle = self.clone();
        let timeout = Timeout::new(HIDE_AFTER_BAR_LEAVE_MS, move || {
            let hidden = {
                let mut session = handle.session.borrow_mut();
                session.hide_timer.clear();
                session.hover.hide_after_bar_leave()
            };
            if hidden {
                handle.redraw();
            }
        });
        self.session.borrow_mut().hide_timer.schedule(timeout);
    }

    fn toggle_pin(&self) {
        let Some(tab) = self.session.borrow().hover.target().cloned() else {
            return;
        };
        spawn_local(async move {
            if let Err(e) = bridge::set_pinned(tab.id, !tab.pinned).await {
                log::error!("Failed to toggle pin on tab {}: {}", tab.id, e);
            }
        });
    }

    fn toggle_mute(&self) {
        let Some(tab) = self.session.borrow().hover.target().cloned() else {
            return;
        };
        spawn_local(async move {
            if let Err(e) = bridge::set_muted(tab.id, !tab.is_muted()).await {
                log::error!("Failed to toggle mute on tab {}: {}", tab.id, e);
            }
        });
    }

    fn close_target(&self) {
        let target = {
            let mut session = self.session.borrow_mut();
            session.hide_timer.cancel();
            session.hover.take_close_target()
        };
        let Some(tab_id) = target else {
            return;
        };
        self.redraw();

        spawn_local(async move {
            if let Err(e) = bridge::remove_tab(tab_id).await {
                log::error!("Failed to close tab {}: {}", tab_id, e);
            }
        });
    }

    fn switch_to(&self, tab_id: TabId) {
        spawn_local(async move {
            match bridge::activate_tab(tab_id).await {
                Ok(()) => bridge::close_popup(),
                Err(e) => log::error!("Failed to activate tab {}: {}", tab_id, e),
            }
        });
    }

    fn toggle_section(&self, key: String) {
        self.session.borrow_mut().toggle_section(&key);
        self.redraw();
    }

    fn handle_key(&self, event: &KeyboardEvent) {
        let action = {
            let session = self.session.borrow();
            if !session.settings_loaded || !session.settings.keyboard_nav {
                return;
            }
            navigation::key_action(&session.tabs, &event.key())
        };
        if !action.is_handled() {
            return;
        }
        event.prevent_default();

        match action {
            KeyAction::Activate(tab_id) => {
                spawn_local(async move {
                    if let Err(e) = bridge::activate_tab(tab_id).await {
                        log::error!("Failed to activate tab {}: {}", tab_id, e);
                    }
                });
            }
            KeyAction::ClosePopup => bridge::close_popup(),
            KeyAction::Stay | KeyAction::Unhandled => {}
        }
    }

    fn handle_wheel(&self, event: &WheelEvent) {
        self.signal_scroll();

        let Some(list) = self.container() else {
            return;
        };
        let speed = self.session.borrow().settings.scroll_speed;
        if let Some(left) = navigation::wheel_scroll_left(&dom::viewport(&list), event.delta_y(), speed) {
            event.prevent_default();
            list.set_scroll_left(left.round() as i32);
        }
    }

    fn handle_resize(&self) {
        if self.session.borrow().settings.auto_center {
            self.scroll_to_active();
        }
    }

    /// Document keyboard, window resize and non-passive wheel listeners
    fn install_listeners(&self) -> Vec<EventListener> {
        let mut listeners = Vec::new();
        let Some(window) = web_sys::window() else {
            return listeners;
        };

        if let Some(document) = window.document() {
            let handle = self.clone();
            match EventListener::new(&document, "keydown", false, move |event| {
                if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                    handle.handle_key(event);
                }
            }) {
                Ok(listener) => listeners.push(listener),
                Err(e) => log::error!("Failed to listen for keys: {:?}", e),
            }
        }

        let handle = self.clone();
        match EventListener::new(&window, "resize", true, move |_| handle.handle_resize()) {
            Ok(listener) => listeners.push(listener),
            Err(e) => log::error!("Failed to listen for resize: {:?}", e),
        }

        // Registered by hand: the wheel handler must be able to preventDefault
        if let Some(list) = self.container() {
            let handle = self.clone();
            match EventListener::new(&list, "wheel", false, move |event| {
                if let Some(event) = event.dyn_ref::<WheelEvent>() {
                    handle.handle_wheel(event);
                }
            }) {
                Ok(listener) => listeners.push(listener),
                Err(e) => log::error!("Failed to listen for wheel: {:?}", e),
            }
        }

        listeners
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let handle = PopupHandle {
        session: use_mut_ref(PopupSession::default),
        list: use_node_ref(),
        redraw: use_force_update(),
    };
    let fallback_icon = use_memo((), |_| AttrValue::from(bridge::default_favicon_url()));

    // Tab event subscription and DOM listeners, installed once settings load
    let subscriptions = use_mut_ref(|| None::<(TabEventSubscription, Vec<EventListener>)>);

    // Load settings, take the first snapshot, then start listening
    {
        let handle = handle.clone();
        let subscriptions = subscriptions.clone();
        use_effect_with((), move |_| {
            let init = handle.clone();
            let installed = subscriptions.clone();
            spawn_local(async move {
                let settings = SettingsStore::new(bridge::ChromeSyncStorage).load().await;
                init.session.borrow_mut().apply_settings(settings);
                init.refresh();

                let on_event = init.clone();
                let subscription = bridge::subscribe_tab_events(move |event| {
                    if event.requires_refresh() {
                        on_event.refresh();
                    }
                });
                let listeners = init.install_listeners();
                *installed.borrow_mut() = Some((subscription, listeners));
            });

            move || {
                subscriptions.borrow_mut().take();
            }
        });
    }

    // Runs after every render, once the DOM matches the snapshot
    {
        let handle = handle.clone();
        use_effect(move || {
            handle.after_render();
            || ()
        });
    }

    let on_tab_enter = {
        let handle = handle.clone();
        Callback::from(move |tab: TabInfo| handle.tab_enter(tab))
    };
    let on_tab_leave = {
        let handle = handle.clone();
        Callback::from(move |tab_id: TabId| handle.tab_leave(tab_id))
    };
    let on_tab_activate = {
        let handle = handle.clone();
        Callback::from(move |tab_id: TabId| handle.switch_to(tab_id))
    };
    let on_toggle_section = {
        let handle = handle.clone();
        Callback::from(move |key: String| handle.toggle_section(key))
    };
    let on_bar_enter = {
        let handle = handle.clone();
        Callback::from(move |_| handle.bar_enter())
    };
    let on_bar_leave = {
        let handle = handle.clone();
        Callback::from(move |_| handle.bar_leave())
    };
    let on_pin = {
        let handle = handle.clone();
        Callback::from(move |_| handle.toggle_pin())
    };
    let on_mute = {
        let handle = handle.clone();
        Callback::from(move |_| handle.toggle_mute())
    };
    let on_close = {
        let handle = handle.clone();
        Callback::from(move |_| handle.close_target())
    };
    let on_scroll = {
        let handle = handle.clone();
        Callback::from(move |_: Event| handle.signal_scroll())
    };
    let on_scroll_to_active = {
        let handle = handle.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            handle.scroll_to_active();
        })
    };
    let nav = |target: fn(&Viewport) -> ScrollPosition| {
        let handle = handle.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            handle.scroll_with(target);
        })
    };
    let on_first = nav(|_| navigation::scroll_to_first());
    let on_page_back = nav(navigation::page_back);
    let on_page_forward = nav(navigation::page_forward);
    let on_last = nav(navigation::scroll_to_last);
    let on_settings = Callback::from(|_: MouseEvent| bridge::open_options_page());

    let session = handle.session.borrow();
    let settings = session.settings.clone();
    let hovered = session.hover.shown_tab().cloned();
    let scrolling = session.hover.is_scrolling(now());
    let counter = tab_counter_text(&session.tabs, settings.show_indices);
    let (current_title, current_host) = match session.active_tab() {
        Some(tab) => (tab.display_title().to_string(), tab.hostname()),
        None => ("No active tab".to_string(), String::new()),
    };

    let sections: Vec<Html> = session
        .sections
        .iter()
        .map(|section| {
            let tint = section
                .group_id()
                .and_then(|group_id| session.groups.get(&group_id))
                .and_then(|group| group.color.as_deref())
                .and_then(resolve_group_color)
                .map(|color| color.section_style());
            let key = section.key();

            html! {
                <SectionView
                    key={key.clone()}
                    section={section.clone()}
                    label={section.label(&session.groups)}
                    {tint}
                    collapsed={session.collapsed.contains(&key)}
                    on_toggle={on_toggle_section.clone()}
                    show_titles={settings.show_titles}
                    fallback_icon={(*fallback_icon).clone()}
                    on_tab_enter={on_tab_enter.clone()}
                    on_tab_leave={on_tab_leave.clone()}
                    on_tab_activate={on_tab_activate.clone()}
                />
            }
        })
        .collect();
    drop(session);

    let size = format!(
        "width: {}px; height: {}px;",
        settings.popup_width_px(),
        POPUP_HEIGHT
    );

    html! {
        <div class="popup-container" style={size}>
            <div class="popup-header">
                <TabInfoPanel
                    class="current-tab-info"
                    title={current_title}
                    host={current_host}
                    onclick={Some(on_scroll_to_active.clone())}
                />
                if let Some(tab) = hovered.as_ref() {
                    <TabInfoPanel
                        class="hovered-tab-info"
                        title={tab.display_title().to_string()}
                        host={tab.hostname()}
                    />
                }
                <div class="tab-counter-wrapper" onclick={on_scroll_to_active}>
                    <span class="tab-counter">{counter}</span>
                </div>
                <Button variant={ButtonVariant::Plain} onclick={on_settings}>
                    {"⚙"}
                </Button>
            </div>

            <ActionBar
                tab={hovered.clone()}
                {on_pin}
                {on_mute}
                {on_close}
                on_enter={on_bar_enter}
                on_leave={on_bar_leave}
            />

            <div
                ref={handle.list.clone()}
                class={classes!("tab-container", scrolling.then_some("is-scrolling"))}
                onscroll={on_scroll}
            >
                {for sections}
            </div>

            <div class="scroll-nav">
                <Button variant={ButtonVariant::Plain} onclick={on_first}>{"⏮"}</Button>
                <Button variant={ButtonVariant::Plain} onclick={on_page_back}>{"◀"}</Button>
                <Button variant={ButtonVariant::Plain} onclick={on_page_forward}>{"▶"}</Button>
                <Button variant={ButtonVariant::Plain} onclick={on_last}>{"⏭"}</Button>
            </div>
        </div>
    }
}
