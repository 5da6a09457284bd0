/// Reusable UI components

use crate::sections::TabSection;
use crate::tab_data::{TabId, TabInfo};
use patternfly_yew::prelude::*;
use web_sys::HtmlImageElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct TabTileProps {
    pub tab: TabInfo,
    pub show_title: bool,
    pub fallback_icon: AttrValue,
    pub on_enter: Callback<TabInfo>,
    pub on_leave: Callback<TabId>,
    pub on_activate: Callback<TabId>,
}

#[function_component(TabTile)]
pub fn tab_tile(props: &TabTileProps) -> Html {
    let tab = &props.tab;

    let icon = tab
        .loadable_favicon()
        .map(|icon| AttrValue::from(icon.to_string()))
        .unwrap_or_else(|| props.fallback_icon.clone());

    let on_icon_error = {
        let fallback = props.fallback_icon.clone();
        Callback::from(move |e: Event| {
            if let Some(img) = e.target_dyn_into::<HtmlImageElement>() {
                // Guard against the fallback itself failing
                if img.src() != fallback.as_str() {
                    img.set_src(&fallback);
                }
            }
        })
    };

    let onmouseenter = {
        let on_enter = props.on_enter.clone();
        let tab = tab.clone();
        Callback::from(move |_: MouseEvent| on_enter.emit(tab.clone()))
    };

    let onmouseleave = {
        let on_leave = props.on_leave.clone();
        let tab_id = tab.id;
        Callback::from(move |_: MouseEvent| on_leave.emit(tab_id))
    };

    let onclick = {
        let on_activate = props.on_activate.clone();
        let tab_id = tab.id;
        Callback::from(move |_: MouseEvent| on_activate.emit(tab_id))
    };

    let data_tab_id = tab.id.to_string();

    html! {
        <div
            class={classes!("tab-item", tab.active.then_some("active-tab"))}
            {onmouseenter}
            {onmouseleave}
            {onclick}
            data-tab-id={data_tab_id}
        >
            <img class="favicon" src={icon} onerror={on_icon_error} alt="" />
            if props.show_title {
                <span class="title" title={tab.display_title().to_string()}>
                    {tab.display_title()}
                </span>
            }
            if tab.pinned {
                <span class="indicator pin-indicator" title="Pinned">{"📌"}</span>
            }
            if tab.audible {
                <span class="indicator audio-indicator" title="Audio playing">{"🔊"}</span>
            }
            if tab.is_playing() {
                <span class="indicator pip-indicator" title="Media playing">{"📺"}</span>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct SectionViewProps {
    pub section: TabSection,
    pub label: String,
    /// Inline tint for group sections
    #[prop_or_default]
    pub tint: Option<String>,
    pub collapsed: bool,
    pub on_toggle: Callback<String>,
    pub show_titles: bool,
    pub fallback_icon: AttrValue,
    pub on_tab_enter: Callback<TabInfo>,
    pub on_tab_leave: Callback<TabId>,
    pub on_tab_activate: Callback<TabId>,
}

#[function_component(SectionView)]
pub fn section_view(props: &SectionViewProps) -> Html {
    let section = &props.section;
    let collapsible = section.is_collapsible();

    let on_header_click = {
        let on_toggle = props.on_toggle.clone();
        let key = section.key();
        Callback::from(move |_: MouseEvent| on_toggle.emit(key.clone()))
    };

    let section_class = classes!(
        "tab-group-section",
        if collapsible { "collapsible-section" } else { "pinned-section" },
        props.collapsed.then_some("collapsed"),
    );

    html! {
        <>
            <div class={section_class} style={props.tint.clone()}>
                if collapsible {
                    <div class="group-header" onclick={on_header_click}>
                        <span class="group-label">{&props.label}</span>
                        <span class="group-count">{section.tabs.len()}</span>
                        <button class="collapse-btn">
                            {if props.collapsed { "◀" } else { "▼" }}
                        </button>
                    </div>
                } else {
                    <div class="group-header group-header-pinned">
                        <span class="group-label">{&props.label}</span>
                        <span class="group-count">{section.tabs.len()}</span>
                    </div>
                }
                <div class="group-tabs-container">
                    {for section.tabs.iter().map(|tab| html! {
                        <TabTile
                            key={tab.id}
                            tab={tab.clone()}
                            show_title={props.show_titles}
                            fallback_icon={props.fallback_icon.clone()}
                            on_enter={props.on_tab_enter.clone()}
                            on_leave={props.on_tab_leave.clone()}
                            on_activate={props.on_tab_activate.clone()}
                        />
                    })}
                </div>
            </div>
            if !collapsible {
                <div class="tab-divider"></div>
            }
        </>
    }
}

#[derive(Properties, PartialEq)]
pub struct ActionBarProps {
    /// Tab the bar is shown for; hidden when `None`
    pub tab: Option<TabInfo>,
    pub on_pin: Callback<()>,
    pub on_mute: Callback<()>,
    pub on_close: Callback<()>,
    pub on_enter: Callback<()>,
    pub on_leave: Callback<()>,
}

#[function_component(ActionBar)]
pub fn action_bar(props: &ActionBarProps) -> Html {
    let pinned = props.tab.as_ref().is_some_and(|tab| tab.pinned);
    let muted = props.tab.as_ref().is_some_and(TabInfo::is_muted);

    let on_pin = {
        let on_pin = props.on_pin.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            on_pin.emit(());
        })
    };

    let on_mute = {
        let on_mute = props.on_mute.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            on_mute.emit(());
        })
    };

    // Close on mousedown so a mouseleave cannot hide the bar before the click lands
    let on_close = {
        let on_close = props.on_close.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            e.stop_propagation();
            on_close.emit(());
        })
    };

    let onmouseenter = props.on_enter.reform(|_: MouseEvent| ());
    let onmouseleave = props.on_leave.reform(|_: MouseEvent| ());

    html! {
        <div
            class={classes!("hover-actions-bar", props.tab.is_some().then_some("visible"))}
            {onmouseenter}
            {onmouseleave}
        >
            <button
                class="hover-action-btn"
                title={if pinned { "Unpin tab" } else { "Pin tab" }}
                onclick={on_pin}
            >
                {"📌"}
            </button>
            <button
                class="hover-action-btn"
                title={if muted { "Unmute tab" } else { "Mute tab" }}
                onclick={on_mute}
            >
                {if muted { "🔇" } else { "🔊" }}
            </button>
            <button class="hover-action-btn close" title="Close tab" onmousedown={on_close}>
                {"×"}
            </button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct TabInfoPanelProps {
    pub class: &'static str,
    pub title: String,
    pub host: String,
    #[prop_or_default]
    pub onclick: Option<Callback<MouseEvent>>,
}

#[function_component(TabInfoPanel)]
pub fn tab_info_panel(props: &TabInfoPanelProps) -> Html {
    html! {
        <div class={props.class} onclick={props.onclick.clone()}>
            <span class="tab-info-title">{&props.title}</span>
            <span class="tab-info-url">{&props.host}</span>
        </div>
    }
}

#[derive(Clone, Copy, PartialEq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Properties, PartialEq)]
pub struct NoticeProps {
    pub message: String,
    pub kind: NoticeKind,
}

/// Transient notification pinned to the top-right corner
#[function_component(Notice)]
pub fn notice(props: &NoticeProps) -> Html {
    let alert_type = match props.kind {
        NoticeKind::Success => AlertType::Success,
        NoticeKind::Error => AlertType::Danger,
    };

    html! {
        <div class="message-toast">
            <Alert r#type={alert_type} title={props.message.clone()} inline={true}>
            </Alert>
        </div>
    }
}
