/// Rust side of the `chrome.*` bridge in `js/chrome_bridge.js`
use crate::error::BridgeError;
use crate::events::TabEvent;
use crate::settings::KeyValueStore;
use crate::tab_data::{GroupId, TabGroupInfo, TabId, TabInfo};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use wasm_bindgen::prelude::*;

pub const DEFAULT_FAVICON_PATH: &str = "assets/default-favicon.svg";

#[wasm_bindgen(module = "/js/chrome_bridge.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getCurrentWindowTabs() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn updateTab(tab_id: i32, properties: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn removeTab(tab_id: i32) -> Result<JsValue, JsValue>;

    fn hasTabGroups() -> bool;

    #[wasm_bindgen(catch)]
    async fn getTabGroup(group_id: i32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn storageSyncGet(defaults: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn storageSyncSet(values: JsValue) -> Result<JsValue, JsValue>;

    fn openOptionsPage();

    fn extensionUrl(path: &str) -> String;

    fn subscribeTabEvents(callback: &js_sys::Function) -> js_sys::Function;
}

/// Properties accepted by `chrome.tabs.update`
#[derive(Debug, Default, Serialize)]
struct TabUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pinned: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    muted: Option<bool>,
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, BridgeError> {
    Ok(value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?)
}

pub async fn current_window_tabs() -> Result<Vec<TabInfo>, BridgeError> {
    let tabs_js = getCurrentWindowTabs().await?;
    Ok(serde_wasm_bindgen::from_value(tabs_js)?)
}

async fn update_tab(tab_id: TabId, update: TabUpdate) -> Result<(), BridgeError> {
    updateTab(tab_id, to_js(&update)?).await?;
    Ok(())
}

pub async fn activate_tab(tab_id: TabId) -> Result<(), BridgeError> {
    update_tab(
        tab_id,
        TabUpdate {
            active: Some(true),
            ..TabUpdate::default()
        },
    )
    .await
}

pub async fn set_pinned(tab_id: TabId, pinned: bool) -> Result<(), BridgeError> {
    update_tab(
        tab_id,
        TabUpdate {
            pinned: Some(pinned),
            ..TabUpdate::default()
        },
    )
    .await
}

pub async fn set_muted(tab_id: TabId, muted: bool) -> Result<(), BridgeError> {
    update_tab(
        tab_id,
        TabUpdate {
            muted: Some(muted),
            ..TabUpdate::default()
        },
    )
    .await
}

pub async fn remove_tab(tab_id: TabId) -> Result<(), BridgeError> {
    removeTab(tab_id).await?;
    Ok(())
}

pub async fn tab_group(group_id: GroupId) -> Result<TabGroupInfo, BridgeError> {
    if !hasTabGroups() {
        return Err(BridgeError::Unavailable("chrome.tabGroups"));
    }
    let group_js = getTabGroup(group_id).await?;
    Ok(serde_wasm_bindgen::from_value(group_js)?)
}

/// Fetch descriptors for the given groups. Groups that fail to load are left
/// out, which renders them untinted under a generic label.
pub async fn tab_groups(group_ids: &[GroupId]) -> HashMap<GroupId, TabGroupInfo> {
    let mut groups = HashMap::new();
    if group_ids.is_empty() {
        return groups;
    }
    if !hasTabGroups() {
        log::debug!("chrome.tabGroups unavailable, rendering groups untinted");
        return groups;
    }

    for &group_id in group_ids {
        match tab_group(group_id).await {
            Ok(group) => {
                groups.insert(group_id, group);
            }
            Err(e) => log::warn!("Failed to load tab group {}: {}", group_id, e),
        }
    }
    groups
}

pub fn open_options_page() {
    openOptionsPage();
}

pub fn default_favicon_url() -> String {
    extensionUrl(DEFAULT_FAVICON_PATH)
}

pub fn close_popup() {
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.close() {
            log::error!("Failed to close popup: {:?}", e);
        }
    }
}

/// `chrome.storage.sync` as a settings backend
pub struct ChromeSyncStorage;

impl KeyValueStore for ChromeSyncStorage {
    async fn get_with_defaults(&self, defaults: Value) -> Result<Value, BridgeError> {
        let stored = storageSyncGet(to_js(&defaults)?).await?;
        Ok(serde_wasm_bindgen::from_value(stored)?)
    }

    async fn set(&self, values: Value) -> Result<(), BridgeError> {
        storageSyncSet(to_js(&values)?).await?;
        Ok(())
    }
}

/// Live listener registration; listeners are removed on drop
pub struct TabEventSubscription {
    _callback: Closure<dyn FnMut(JsValue)>,
    unsubscribe: js_sys::Function,
}

impl Drop for TabEventSubscription {
    fn drop(&mut self) {
        if let Err(e) = self.unsubscribe.call0(&JsValue::NULL) {
            log::warn!("Failed to remove tab listeners: {:?}", e);
        }
    }
}

pub fn subscribe_tab_events(mut on_event: impl FnMut(TabEvent) + 'static) -> TabEventSubscription {
    let callback = Closure::wrap(Box::new(move |event_js: JsValue| {
        match serde_wasm_bindgen::from_value::<TabEvent>(event_js) {
            Ok(event) => on_event(event),
            Err(e) => log::warn!("Ignoring unrecognised tab event: {}", e),
        }
    }) as Box<dyn FnMut(JsValue)>);

    let unsubscribe = subscribeTabEvents(callback.as_ref().unchecked_ref());

    TabEventSubscription {
        _callback: callback,
        unsubscribe,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_update_only_sends_set_fields() {
        let update = TabUpdate {
            pinned: Some(true),
            ..TabUpdate::default()
        };

        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({ "pinned": true })
        );
    }
}
