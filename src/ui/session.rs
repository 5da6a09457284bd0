/// Popup session: everything the popup keeps between renders
use crate::anchor::AnchorCapture;
use crate::hover::HoverController;
use crate::sections::{TabSection, build_sections};
use crate::settings::Settings;
use crate::tab_data::{GroupId, TabGroupInfo, TabId, TabInfo};
use gloo_timers::callback::Timeout;
use std::collections::{HashMap, HashSet};

/// Work left for after the DOM reflects a new snapshot
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AfterRender {
    Nothing,
    RestoreAnchor(AnchorCapture),
    CenterActive,
}

/// A pending single-shot timer; scheduling again cancels the previous one
#[derive(Default)]
pub struct TimerSlot(Option<Timeout>);

impl TimerSlot {
    pub fn schedule(&mut self, timeout: Timeout) {
        self.cancel();
        self.0 = Some(timeout);
    }

    pub fn cancel(&mut self) {
        if let Some(timeout) = self.0.take() {
            timeout.cancel();
        }
    }

    /// Forget a timer that already fired. Called from inside the timer's own
    /// callback, so the closure is leaked rather than dropped while running.
    pub fn clear(&mut self) {
        if let Some(timeout) = self.0.take() {
            let _ = timeout.forget();
        }
    }
}

pub struct PopupSession {
    pub settings: Settings,
    pub tabs: Vec<TabInfo>,
    pub sections: Vec<TabSection>,
    pub groups: HashMap<GroupId, TabGroupInfo>,
    pub hover: HoverController,
    pub collapsed: HashSet<String>,
    /// Stored settings have arrived; until then `settings` holds defaults
    pub settings_loaded: bool,
    pub first_render: bool,
    pub after_render: AfterRender,
    pub hide_timer: TimerSlot,
    pub scroll_timer: TimerSlot,
    pub reveal_timer: TimerSlot,
}

impl Default for PopupSession {
    fn default() -> Self {
        PopupSession {
            settings: Settings::default(),
            tabs: Vec::new(),
            sections: Vec::new(),
            groups: HashMap::new(),
            hover: HoverController::new(),
            collapsed: HashSet::new(),
            settings_loaded: false,
            first_render: true,
            after_render: AfterRender::Nothing,
            hide_timer: TimerSlot::default(),
            scroll_timer: TimerSlot::default(),
            reveal_timer: TimerSlot::default(),
        }
    }
}

impl PopupSession {
    pub fn new(settings: Settings) -> Self {
        PopupSession {
            settings,
            settings_loaded: true,
            ..PopupSession::default()
        }
    }

    pub fn apply_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.settings_loaded = true;
    }

    /// Replace the snapshot wholesale and rebuild derived state.
    ///
    /// `anchor` is the scroll anchor captured from the outgoing DOM; it is
    /// ignored on the first render, which centers the active tab instead
    /// when auto-center is on. A snapshot taken before settings load does
    /// not count as the first render.
    pub fn apply_snapshot(
        &mut self,
        tabs: Vec<TabInfo>,
        groups: HashMap<GroupId, TabGroupInfo>,
        anchor: Option<AnchorCapture>,
    ) {
        self.sections = build_sections(&tabs);
        let keys: HashSet<String> = self.sections.iter().map(TabSection::key).collect();
        self.collapsed.retain(|key| keys.contains(key));
        self.hover.rebind(&tabs);
        self.tabs = tabs;
        self.groups = groups;

        self.after_render = if !self.settings_loaded {
            AfterRender::Nothing
        } else if self.first_render {
            self.first_render = false;
            if self.settings.auto_center {
                AfterRender::CenterActive
            } else {
                AfterRender::Nothing
            }
        } else {
            anchor.map_or(AfterRender::Nothing, AfterRender::RestoreAnchor)
        };
    }

    pub fn take_after_render(&mut self) -> AfterRender {
        std::mem::replace(&mut self.after_render, AfterRender::Nothing)
    }

    pub fn active_tab(&self) -> Option<&TabInfo> {
        crate::sections::active_tab(&self.tabs)
    }

    pub fn toggle_section(&mut self, key: &str) {
        if !self.collapsed.remove(key) {
            self.collapsed.insert(key.to_string());
        }
    }

    /// Expand the section holding `tab_id`; true when it was collapsed
    pub fn expand_section_of(&mut self, tab_id: TabId) -> bool {
        match self.sections.iter().find(|section| section.contains(tab_id)) {
            Some(section) => self.collapsed.remove(&section.key()),
            None => false,
        }
    }
}
