/// Hover intent and scroll priority for the popup.
///
/// The action bar (pin / mute / close) follows the hovered tab. Because the
/// bar takes part in layout, showing it while the list is scrolling causes a
/// reflow mid-scroll; scroll signals therefore suppress hover until the list
/// has been quiet for [`SCROLL_QUIET_MS`].
use crate::tab_data::{TabId, TabInfo};

/// Delay before hiding after the pointer leaves a tab
pub const HIDE_AFTER_TAB_LEAVE_MS: u32 = 300;
/// Delay before hiding after the pointer leaves the action bar
pub const HIDE_AFTER_BAR_LEAVE_MS: u32 = 200;
/// Quiet period after the last scroll / wheel signal
pub const SCROLL_QUIET_MS: u32 = 600;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum HoverPhase {
    #[default]
    Idle,
    /// Pointer is on a tab; info panel and action bar show it
    Hovering(TabInfo),
    /// Pointer moved onto the action bar, which keeps acting on this tab
    ActionBarArmed(TabInfo),
}

impl HoverPhase {
    pub fn tab(&self) -> Option<&TabInfo> {
        match self {
            HoverPhase::Idle => None,
            HoverPhase::Hovering(tab) | HoverPhase::ActionBarArmed(tab) => Some(tab),
        }
    }
}

/// Debounced "list is scrolling" flag, driven by event timestamps in ms
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollPriority {
    until: Option<f64>,
}

impl ScrollPriority {
    /// Each signal pushes the expiry out again
    pub fn signal(&mut self, now: f64) {
        self.until = Some(now + f64::from(SCROLL_QUIET_MS));
    }

    pub fn is_active(&self, now: f64) -> bool {
        self.until.is_some_and(|until| now < until)
    }

    /// Quiet-period timer fired; true when the flag was still set
    pub fn end(&mut self) -> bool {
        self.until.take().is_some()
    }
}

#[derive(Debug, Clone, Default)]
pub struct HoverController {
    phase: HoverPhase,
    /// Last tab the bar acted for, kept after hiding so a late click still
    /// has a target
    remembered: Option<TabInfo>,
    pointer_tab: Option<TabId>,
    pointer_on_bar: bool,
    scroll: ScrollPriority,
}

impl HoverController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &HoverPhase {
        &self.phase
    }

    /// Tab whose info and actions are on screen
    pub fn shown_tab(&self) -> Option<&TabInfo> {
        self.phase.tab()
    }

    /// Tab the action buttons apply to
    pub fn target(&self) -> Option<&TabInfo> {
        self.phase.tab().or(self.remembered.as_ref())
    }

    pub fn signal_scroll(&mut self, now: f64) {
        self.scroll.signal(now);
    }

    pub fn is_scrolling(&self, now: f64) -> bool {
        self.scroll.is_active(now)
    }

    pub fn end_scroll(&mut self) -> bool {
        self.scroll.end()
    }

    /// Pointer entered a tab. Returns whether the action bar is now shown.
    pub fn enter_tab(&mut self, tab: &TabInfo, now: f64) -> bool {
        self.pointer_tab = Some(tab.id);

        if self.scroll.is_active(now) {
            return false;
        }

        self.phase = HoverPhase::Hovering(tab.clone());
        self.remembered = Some(tab.clone());
        true
    }

    pub fn leave_tab(&mut self, tab_id: TabId) {
        if self.pointer_tab == Some(tab_id) {
            self.pointer_tab = None;
        }
    }

    /// Pointer reached the action bar: re-arm it for the current or last target
    pub fn enter_bar(&mut self) -> Option<&TabInfo> {
        self.pointer_on_bar = true;

        let target = self.target().cloned()?;
        self.remembered = Some(target.clone());
        self.phase = HoverPhase::ActionBarArmed(target);
        self.phase.tab()
    }

    pub fn leave_bar(&mut self) {
        self.pointer_on_bar = false;
    }

    /// Delayed check after leaving a tab; true when the bar was hidden
    pub fn hide_after_tab_leave(&mut self) -> bool {
        if self.pointer_on_bar || self.pointer_tab.is_some() {
            return false;
        }
        self.hide();
        true
    }

    /// Delayed check after leaving the bar; true when the bar was hidden
    pub fn hide_after_bar_leave(&mut self) -> bool {
        if self.pointer_tab.is_some() {
            return false;
        }
        self.hide();
        true
    }

    pub fn hide(&mut self) {
        if let Some(tab) = self.phase.tab() {
            self.remembered = Some(tab.clone());
        }
        self.phase = HoverPhase::Idle;
    }

    /// Target for the close button. The tab is going away, so nothing is
    /// remembered afterwards.
    pub fn take_close_target(&mut self) -> Option<TabId> {
        let tab_id = self.target().map(|tab| tab.id);
        self.remembered = None;
        self.phase = HoverPhase::Idle;
        tab_id
    }

    /// Re-bind hover targets to a fresh snapshot; tabs that vanished are dropped
    pub fn rebind(&mut self, tabs: &[TabInfo]) {
        let fresh = |id: TabId| tabs.iter().find(|tab| tab.id == id).cloned();

        self.phase = match std::mem::take(&mut self.phase) {
            HoverPhase::Idle => HoverPhase::Idle,
            HoverPhase::Hovering(tab) => fresh(tab.id).map_or(HoverPhase::Idle, HoverPhase::Hovering),
            HoverPhase::ActionBarArmed(tab) => {
                fresh(tab.id).map_or(HoverPhase::Idle, HoverPhase::ActionBarArmed)
            }
        };
        self.remembered = self.remembered.take().and_then(|tab| fresh(tab.id));
        if self.pointer_tab.is_some_and(|id| fresh(id).is_none()) {
            self.pointer_tab = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tab_data::MutedInfo;

    fn create_test_tab(id: TabId) -> TabInfo {
        TabInfo::new(id, id, format!("https://example.com/{}", id), format!("Tab {}", id))
    }

    #[test]
    fn test_enter_shows_bar() {
        let mut hover = HoverController::new();

        assert!(hover.enter_tab(&create_test_tab(1), 0.0));
        assert_eq!(hover.phase(), &HoverPhase::Hovering(create_test_tab(1)));
        assert_eq!(hover.target().map(|t| t.id), Some(1));
    }

    #[test]
    fn test_hover_suppressed_while_scrolling() {
        let mut hover = HoverController::new();
        hover.signal_scroll(1000.0);

        assert!(!hover.enter_tab(&create_test_tab(1), 1200.0));
        assert_eq!(hover.shown_tab(), None);

        // Quiet period elapsed with no further signal
        assert!(!hover.is_scrolling(1600.0));
        assert!(hover.enter_tab(&create_test_tab(1), 1600.0));
        assert_eq!(hover.shown_tab().map(|t| t.id), Some(1));
    }

    #[test]
    fn test_continuous_scroll_keeps_hover_suppressed() {
        let mut hover = HoverController::new();

        // Wheel ticks every 450ms, each shorter than the quiet period
        for tick in 0..5 {
            let now = tick as f64 * 450.0;
            hover.signal_scroll(now);
            assert!(!hover.enter_tab(&create_test_tab(1), now + 440.0));
        }
        assert!(hover.is_scrolling(1800.0 + 599.0));
        assert!(!hover.is_scrolling(1800.0 + 600.0));
    }

    #[test]
    fn test_quiet_timer_ends_priority() {
        let mut priority = ScrollPriority::default();
        assert!(!priority.end());

        priority.signal(100.0);
        assert!(priority.is_active(500.0));
        assert!(priority.end());
        assert!(!priority.is_active(500.0));
        assert!(!priority.end());
    }

    #[test]
    fn test_leave_then_hide() {
        let mut hover = HoverController::new();
        hover.enter_tab(&create_test_tab(1), 0.0);
        hover.leave_tab(1);

        assert!(hover.hide_after_tab_leave());
        assert_eq!(hover.phase(), &HoverPhase::Idle);
        // Still targetable for a click landing after the hide
        assert_eq!(hover.target().map(|t| t.id), Some(1));
    }

    #[test]
    fn test_hide_skipped_when_pointer_reaches_bar() {
        let mut hover = HoverController::new();
        hover.enter_tab(&create_test_tab(1), 0.0);
        hover.leave_tab(1);
        hover.enter_bar();

        assert!(!hover.hide_after_tab_leave());
        assert_eq!(hover.phase(), &HoverPhase::ActionBarArmed(create_test_tab(1)));
    }

    #[test]
    fn test_hide_skipped_when_pointer_moves_to_next_tab() {
        let mut hover = HoverController::new();
        hover.enter_tab(&create_test_tab(1), 0.0);
        hover.leave_tab(1);
        hover.enter_tab(&create_test_tab(2), 10.0);

        assert!(!hover.hide_after_tab_leave());
        assert_eq!(hover.shown_tab().map(|t| t.id), Some(2));
    }

    #[test]
    fn test_bar_rearms_remembered_target() {
        let mut hover = HoverController::new();
        hover.enter_tab(&create_test_tab(4), 0.0);
        hover.leave_tab(4);
        hover.hide_after_tab_leave();

        // Slow move reaches the bar after it hid
        let rearmed = hover.enter_bar().map(|t| t.id);

        assert_eq!(rearmed, Some(4));
        assert_eq!(hover.phase(), &HoverPhase::ActionBarArmed(create_test_tab(4)));
    }

    #[test]
    fn test_bar_without_any_target() {
        let mut hover = HoverController::new();

        assert_eq!(hover.enter_bar(), None);
        assert_eq!(hover.phase(), &HoverPhase::Idle);
    }

    #[test]
    fn test_leave_bar_hides() {
        let mut hover = HoverController::new();
        hover.enter_tab(&create_test_tab(1), 0.0);
        hover.leave_tab(1);
        hover.enter_bar();
        hover.leave_bar();

        assert!(hover.hide_after_bar_leave());
        assert_eq!(hover.shown_tab(), None);
    }

    #[test]
    fn test_close_forgets_target() {
        let mut hover = HoverController::new();
        hover.enter_tab(&create_test_tab(3), 0.0);

        assert_eq!(hover.take_close_target(), Some(3));
        assert_eq!(hover.target(), None);
        assert_eq!(hover.take_close_target(), None);
    }

    #[test]
    fn test_rebind_picks_up_fresh_state() {
        let mut hover = HoverController::new();
        hover.enter_tab(&create_test_tab(1), 0.0);

        let mut muted = create_test_tab(1);
        muted.muted_info = Some(MutedInfo { muted: true });
        hover.rebind(&[muted, create_test_tab(2)]);

        assert!(hover.shown_tab().unwrap().is_muted());
    }

    #[test]
    fn test_rebind_drops_closed_tabs() {
        let mut hover = HoverController::new();
        hover.enter_tab(&create_test_tab(1), 0.0);

        hover.rebind(&[create_test_tab(2)]);

        assert_eq!(hover.phase(), &HoverPhase::Idle);
        assert_eq!(hover.target(), None);
        // Pointer bookkeeping for the closed tab is gone too
        assert!(hover.hide_after_tab_leave());
    }
}
