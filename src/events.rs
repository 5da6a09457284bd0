/// Browser tab events forwarded from the JS bridge
use crate::tab_data::TabId;
use serde::Deserialize;
use serde_json::Value;

/// `changeInfo` from `chrome.tabs.onUpdated`; only the keys we react to
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChangeInfo {
    pub title: Option<String>,
    pub fav_icon_url: Option<String>,
    pub audible: Option<bool>,
    pub muted_info: Option<Value>,
    pub pinned: Option<bool>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TabEvent {
    Activated,
    Created,
    Removed,
    Moved,
    #[serde(rename_all = "camelCase")]
    Updated {
        tab_id: TabId,
        #[serde(default)]
        change_info: ChangeInfo,
    },
    GroupUpdated,
}

impl TabEvent {
    /// Whether the event changes anything the popup shows.
    ///
    /// Loading-status churn on `onUpdated` is ignored; every other event
    /// kind re-queries the window.
    pub fn requires_refresh(&self) -> bool {
        match self {
            TabEvent::Updated { change_info, .. } => {
                change_info.title.is_some()
                    || change_info.fav_icon_url.is_some()
                    || change_info.audible.is_some()
                    || change_info.muted_info.is_some()
                    || change_info.pinned.is_some()
            }
            _ => true,
        }
    }
}
