/// Settings page

use crate::bridge::ChromeSyncStorage;
use crate::settings::{
    MAX_POPUP_WIDTH, MAX_SCROLL_SPEED, MIN_POPUP_WIDTH, MIN_SCROLL_SPEED, Settings, SettingsStore,
};
use crate::ui::components::{Notice, NoticeKind};
use gloo_timers::callback::Timeout;
use patternfly_yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

/// How long a save / reset notice stays up
const NOTICE_MS: u32 = 3_000;

#[derive(Clone, PartialEq)]
struct NoticeState {
    message: String,
    kind: NoticeKind,
}

fn store() -> SettingsStore<ChromeSyncStorage> {
    SettingsStore::new(ChromeSyncStorage)
}

fn confirm_reset() -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message("Reset all settings to defaults?").ok())
        .unwrap_or(false)
}

/// Checkbox row bound to one boolean field of the form
fn checkbox(
    id: &'static str,
    label: &'static str,
    checked: bool,
    form: &UseStateHandle<Settings>,
    apply: fn(&mut Settings, bool),
) -> Html {
    let onchange = {
        let form = form.clone();
        Callback::from(move |e: Event| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                let mut next = (*form).clone();
                apply(&mut next, input.checked());
                form.set(next);
            }
        })
    };

    html! {
        <div class="setting-row">
            <label for={id}>
                <input type="checkbox" {id} {checked} {onchange} />
                {label}
            </label>
        </div>
    }
}

#[function_component(SettingsPage)]
pub fn settings_page() -> Html {
    // Form values; only written to storage on save
    let form = use_state(Settings::default);
    let notice = use_state(|| None::<NoticeState>);
    let notice_timer = use_mut_ref(|| None::<Timeout>);

    // Load settings on mount
    {
        let form = form.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                form.set(store().load().await);
            });
            || ()
        });
    }

    let show_notice = {
        let notice = notice.clone();
        let notice_timer = notice_timer.clone();
        Callback::from(move |next: NoticeState| {
            notice.set(Some(next));

            let notice = notice.clone();
            let timeout = Timeout::new(NOTICE_MS, move || notice.set(None));
            // Replacing drops, and so cancels, any earlier notice's timer
            *notice_timer.borrow_mut() = Some(timeout);
        })
    };

    let on_width_input = {
        let form = form.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                if let Ok(width) = input.value().parse::<u32>() {
                    form.set(Settings {
                        popup_width: width,
                        ..(*form).clone()
                    });
                }
            }
        })
    };

    let on_speed_input = {
        let form = form.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                if let Ok(speed) = input.value().parse::<f64>() {
                    form.set(Settings {
                        scroll_speed: speed,
                        ..(*form).clone()
                    });
                }
            }
        })
    };

    let on_save = {
        let form = form.clone();
        let show_notice = show_notice.clone();
        Callback::from(move |_| {
            let settings = (*form).clone().normalized();
            let form = form.clone();
            let show_notice = show_notice.clone();
            spawn_local(async move {
                match store().save(&settings).await {
                    Ok(()) => {
                        form.set(settings);
                        show_notice.emit(NoticeState {
                            message: "Settings saved successfully!".to_string(),
                            kind: NoticeKind::Success,
                        });
                    }
                    Err(e) => {
                        log::error!("Error saving settings: {}", e);
                        show_notice.emit(NoticeState {
                            message: "Error saving settings. Please try again.".to_string(),
                            kind: NoticeKind::Error,
                        });
                    }
                }
            });
        })
    };

    let on_reset = {
        let form = form.clone();
        let show_notice = show_notice.clone();
        Callback::from(move |_| {
            if !confirm_reset() {
                return;
            }
            let form = form.clone();
            let show_notice = show_notice.clone();
            spawn_local(async move {
                match store().reset().await {
                    Ok(defaults) => {
                        form.set(defaults);
                        show_notice.emit(NoticeState {
                            message: "Settings reset to defaults.".to_string(),
                            kind: NoticeKind::Success,
                        });
                    }
                    Err(e) => {
                        log::error!("Error resetting settings: {}", e);
                        show_notice.emit(NoticeState {
                            message: "Error resetting settings.".to_string(),
                            kind: NoticeKind::Error,
                        });
                    }
                }
            });
        })
    };

    html! {
        <div class="settings-container">
            <h1>{"Tab Navigator Settings"}</h1>

            if let Some(current) = (*notice).clone() {
                <Notice message={current.message} kind={current.kind} />
            }

            <section class="settings-section">
                <h2>{"Appearance"}</h2>
                <div class="setting-row">
                    <label for="popupWidth">
                        {"Popup width: "}
                        <span id="popupWidthValue">{form.popup_width}</span>
                        {"px"}
                    </label>
                    <input
                        type="range"
                        id="popupWidth"
                        min={MIN_POPUP_WIDTH.to_string()}
                        max={MAX_POPUP_WIDTH.to_string()}
                        step="10"
                        value={form.popup_width.to_string()}
                        oninput={on_width_input}
                    />
                </div>
                {checkbox("showTitles", "Show tab titles", form.show_titles, &form, |s, v| s.show_titles = v)}
                {checkbox("showIndices", "Show tab position in the counter", form.show_indices, &form, |s, v| s.show_indices = v)}
            </section>

            <section class="settings-section">
                <h2>{"Behavior"}</h2>
                {checkbox("autoCenter", "Center the active tab on open", form.auto_center, &form, |s, v| s.auto_center = v)}
                {checkbox("keyboardNav", "Keyboard navigation", form.keyboard_nav, &form, |s, v| s.keyboard_nav = v)}
                <div class="setting-row">
                    <label for="scrollSpeed">
                        {"Scroll speed: "}
                        <span id="scrollSpeedValue">{format!("{:.1}", form.scroll_speed)}</span>
                    </label>
                    <input
                        type="range"
                        id="scrollSpeed"
                        min={MIN_SCROLL_SPEED.to_string()}
                        max={MAX_SCROLL_SPEED.to_string()}
                        step="0.1"
                        value={form.scroll_speed.to_string()}
                        oninput={on_speed_input}
                    />
                </div>
            </section>

            <div class="settings-actions">
                <Button onclick={on_save}>{"Save"}</Button>
                <Button variant={ButtonVariant::Secondary} onclick={on_reset}>
                    {"Reset to defaults"}
                </Button>
            </div>
        </div>
    }
}
