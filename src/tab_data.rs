/// Data structures for Tab Navigator
use serde::{Deserialize, Serialize};

pub type TabId = i32;
pub type GroupId = i32;

/// `chrome.tabGroups.TAB_GROUP_ID_NONE`
pub const TAB_GROUP_ID_NONE: GroupId = -1;

/// Muted state as reported by `chrome.tabs`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MutedInfo {
    #[serde(default)]
    pub muted: bool,
}

/// Snapshot of a browser tab
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabInfo {
    pub id: TabId,
    pub index: i32,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default = "no_group")]
    pub group_id: GroupId,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub audible: bool,
    #[serde(default)]
    pub muted_info: Option<MutedInfo>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub fav_icon_url: Option<String>,
}

fn no_group() -> GroupId {
    TAB_GROUP_ID_NONE
}

impl TabInfo {
    pub fn new(id: TabId, index: i32, url: String, title: String) -> TabInfo {
        TabInfo {
            id,
            index,
            pinned: false,
            group_id: TAB_GROUP_ID_NONE,
            active: false,
            audible: false,
            muted_info: None,
            title,
            url,
            fav_icon_url: None,
        }
    }

    /// Group this tab belongs to, if any
    pub fn group(&self) -> Option<GroupId> {
        // Chrome reports -1, some builds leave 0 for "no group"
        if self.group_id == TAB_GROUP_ID_NONE || self.group_id == 0 {
            None
        } else {
            Some(self.group_id)
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted_info.as_ref().is_some_and(|info| info.muted)
    }

    /// Media is playing and has not been muted
    pub fn is_playing(&self) -> bool {
        self.audible && !self.is_muted()
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "New Tab"
        } else {
            &self.title
        }
    }

    /// Favicon the popup may load; `chrome://` icons are blocked in extension pages
    pub fn loadable_favicon(&self) -> Option<&str> {
        self.fav_icon_url
            .as_deref()
            .filter(|icon| !icon.is_empty() && !icon.starts_with("chrome://"))
    }

    /// Hostname shown in the info panels; empty when the URL does not parse
    pub fn hostname(&self) -> String {
        url::Url::parse(&self.url)
            .ok()
            .and_then(|parsed| parsed.host_str().map(str::to_string))
            .unwrap_or_default()
    }
}

/// A tab group descriptor from `chrome.tabGroups.get`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TabGroupInfo {
    pub id: GroupId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_info_creation() {
        let tab = TabInfo::new(
            1,
            0,
            "https://google.com".to_string(),
            "Google".to_string(),
        );

        assert_eq!(tab.id, 1);
        assert_eq!(tab.url, "https://google.com");
        assert_eq!(tab.title, "Google");
        assert!(!tab.pinned);
        assert_eq!(tab.index, 0);
        assert_eq!(tab.group(), None);
    }

    #[test]
    fn test_deserialize_chrome_tab() {
        let json = r#"{
            "id": 42,
            "index": 3,
            "pinned": false,
            "groupId": 7,
            "active": true,
            "audible": true,
            "mutedInfo": { "muted": false, "reason": "user" },
            "title": "Rust",
            "url": "https://www.rust-lang.org/learn",
            "favIconUrl": "https://www.rust-lang.org/favicon.ico",
            "windowId": 1,
            "discarded": false
        }"#;

        let tab: TabInfo = serde_json::from_str(json).unwrap();

        assert_eq!(tab.id, 42);
        assert_eq!(tab.group(), Some(7));
        assert!(tab.active);
        assert!(tab.is_playing());
        assert_eq!(tab.hostname(), "www.rust-lang.org");
        assert_eq!(
            tab.fav_icon_url.as_deref(),
            Some("https://www.rust-lang.org/favicon.ico")
        );
    }

    #[test]
    fn test_deserialize_sparse_tab() {
        // Tabs still loading may lack url, title and favicon
        let tab: TabInfo = serde_json::from_str(r#"{ "id": 5, "index": 0 }"#).unwrap();

        assert_eq!(tab.group(), None);
        assert!(!tab.is_muted());
        assert_eq!(tab.display_title(), "New Tab");
        assert_eq!(tab.hostname(), "");
    }

    #[test]
    fn test_muted_tab_is_not_playing() {
        let mut tab = TabInfo::new(1, 0, "https://example.com".to_string(), String::new());
        tab.audible = true;
        tab.muted_info = Some(MutedInfo { muted: true });

        assert!(tab.is_muted());
        assert!(!tab.is_playing());
    }

    #[test]
    fn test_loadable_favicon() {
        let mut tab = TabInfo::new(1, 0, "chrome://settings".to_string(), "Settings".to_string());
        assert_eq!(tab.loadable_favicon(), None);

        tab.fav_icon_url = Some("chrome://theme/IDR_SETTINGS_FAVICON".to_string());
        assert_eq!(tab.loadable_favicon(), None);

        tab.fav_icon_url = Some(String::new());
        assert_eq!(tab.loadable_favicon(), None);

        tab.fav_icon_url = Some("https://example.com/favicon.ico".to_string());
        assert_eq!(tab.loadable_favicon(), Some("https://example.com/favicon.ico"));
    }

    #[test]
    fn test_group_descriptor() {
        let group: TabGroupInfo =
            serde_json::from_str(r#"{ "id": 3, "title": "Work", "color": "blue", "collapsed": false }"#)
                .unwrap();

        assert_eq!(group.title.as_deref(), Some("Work"));
        assert_eq!(group.color.as_deref(), Some("blue"));
    }
}
