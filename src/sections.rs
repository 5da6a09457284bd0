/// Tab grouping: pinned / group / ungrouped sections in visual order
use crate::tab_data::{GroupId, TabGroupInfo, TabInfo};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Pinned,
    Group(GroupId),
    Ungrouped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TabSection {
    pub kind: SectionKind,
    pub tabs: Vec<TabInfo>,
}

impl TabSection {
    /// Key that survives refreshes as long as the section keeps its first tab
    pub fn key(&self) -> String {
        let first = self.tabs.first().map_or(-1, |tab| tab.id);
        match self.kind {
            SectionKind::Pinned => "pinned".to_string(),
            SectionKind::Group(group_id) => format!("group-{}-{}", group_id, first),
            SectionKind::Ungrouped => format!("ungrouped-{}", first),
        }
    }

    /// Pinned is the only section without a collapse control
    pub fn is_collapsible(&self) -> bool {
        self.kind != SectionKind::Pinned
    }

    pub fn group_id(&self) -> Option<GroupId> {
        match self.kind {
            SectionKind::Group(group_id) => Some(group_id),
            _ => None,
        }
    }

    pub fn label(&self, groups: &HashMap<GroupId, TabGroupInfo>) -> String {
        match self.kind {
            SectionKind::Pinned => "Pinned".to_string(),
            SectionKind::Ungrouped => "Other Tabs".to_string(),
            SectionKind::Group(group_id) => groups
                .get(&group_id)
                .and_then(|group| group.title.clone())
                .filter(|title| !title.is_empty())
                .unwrap_or_else(|| format!("Group {}", group_id)),
        }
    }

    pub fn contains(&self, tab_id: i32) -> bool {
        self.tabs.iter().any(|tab| tab.id == tab_id)
    }
}

/// Partition a window snapshot into sections.
///
/// Pinned tabs always lead as a single section. The remaining tabs are walked
/// in snapshot order and split into maximal contiguous runs of equal group
/// membership, so a group interrupted by another tab shows up as two
/// sections. A pinned tab lifted out of the strip also ends the run it sat in.
pub fn build_sections(tabs: &[TabInfo]) -> Vec<TabSection> {
    let pinned: Vec<TabInfo> = tabs.iter().filter(|tab| tab.pinned).cloned().collect();

    let mut runs: Vec<TabSection> = Vec::new();
    let mut run_open = false;

    for tab in tabs {
        if tab.pinned {
            run_open = false;
            continue;
        }

        let kind = match tab.group() {
            Some(group_id) => SectionKind::Group(group_id),
            None => SectionKind::Ungrouped,
        };

        match runs.last_mut() {
            Some(current) if run_open && current.kind == kind => current.tabs.push(tab.clone()),
            _ => runs.push(TabSection {
                kind,
                tabs: vec![tab.clone()],
            }),
        }
        run_open = true;
    }

    let mut sections = Vec::with_capacity(runs.len() + 1);
    if !pinned.is_empty() {
        sections.push(TabSection {
            kind: SectionKind::Pinned,
            tabs: pinned,
        });
    }
    sections.extend(runs);
    sections
}

/// Distinct group ids of unpinned tabs in first-seen order
pub fn group_ids(tabs: &[TabInfo]) -> Vec<GroupId> {
    let mut ids = Vec::new();
    for group_id in tabs.iter().filter(|tab| !tab.pinned).filter_map(TabInfo::group) {
        if !ids.contains(&group_id) {
            ids.push(group_id);
        }
    }
    ids
}

pub fn active_tab(tabs: &[TabInfo]) -> Option<&TabInfo> {
    tabs.iter().find(|tab| tab.active)
}

/// Counter text in the header, e.g. "On tab 3 of 12"
pub fn tab_counter_text(tabs: &[TabInfo], show_indices: bool) -> String {
    match tabs.iter().position(|tab| tab.active) {
        Some(position) if show_indices => format!("On tab {} of {}", position + 1, tabs.len()),
        _ => format!("{} tabs", tabs.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn create_test_tab(id: i32, group_id: i32, pinned: bool) -> TabInfo {
        let mut tab = TabInfo::new(
            id,
            id - 1,
            format!("https://example.com/{}", id),
            format!("Tab {}", id),
        );
        tab.group_id = group_id;
        tab.pinned = pinned;
        tab
    }

    fn ids(section: &TabSection) -> Vec<i32> {
        section.tabs.iter().map(|tab| tab.id).collect()
    }

    #[test]
    fn test_end_to_end_layout() {
        // 10 tabs, 3-5 in group A, 7 pinned
        const GROUP_A: i32 = 100;
        let tabs: Vec<TabInfo> = (1..=10)
            .map(|id| {
                let group = if (3..=5).contains(&id) { GROUP_A } else { -1 };
                create_test_tab(id, group, id == 7)
            })
            .collect();

        let sections = build_sections(&tabs);

        let layout: Vec<(SectionKind, Vec<i32>)> =
            sections.iter().map(|s| (s.kind, ids(s))).collect();
        assert_eq!(
            layout,
            vec![
                (SectionKind::Pinned, vec![7]),
                (SectionKind::Ungrouped, vec![1, 2]),
                (SectionKind::Group(GROUP_A), vec![3, 4, 5]),
                (SectionKind::Ungrouped, vec![6]),
                (SectionKind::Ungrouped, vec![8, 9, 10]),
            ]
        );
    }

    #[test]
    fn test_split_group_makes_two_sections() {
        let tabs = vec![
            create_test_tab(1, 5, false),
            create_test_tab(2, -1, false),
            create_test_tab(3, 5, false),
        ];

        let sections = build_sections(&tabs);

        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].kind, SectionKind::Group(5));
        assert_eq!(sections[2].kind, SectionKind::Group(5));
        assert_ne!(sections[0].key(), sections[2].key());
    }

    #[test]
    fn test_adjacent_groups_stay_apart() {
        let tabs = vec![
            create_test_tab(1, 5, false),
            create_test_tab(2, 6, false),
            create_test_tab(3, 5, false),
        ];

        let sections = build_sections(&tabs);

        let kinds: Vec<SectionKind> = sections.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![SectionKind::Group(5), SectionKind::Group(6), SectionKind::Group(5)]
        );
        assert_eq!(group_ids(&tabs), vec![5, 6]);
    }

    #[test]
    fn test_pinned_collected_regardless_of_position() {
        let tabs = vec![
            create_test_tab(1, -1, true),
            create_test_tab(2, -1, false),
            create_test_tab(3, -1, true),
            create_test_tab(4, -1, false),
        ];

        let sections = build_sections(&tabs);

        assert_eq!(sections.len(), 3);
        assert_eq!(ids(&sections[0]), vec![1, 3]);
        assert!(!sections[0].is_collapsible());
    }

    #[test]
    fn test_pinned_tab_breaks_run() {
        let tabs = vec![
            create_test_tab(1, -1, false),
            create_test_tab(2, -1, true),
            create_test_tab(3, -1, false),
            create_test_tab(4, 6, false),
            create_test_tab(5, 6, true),
            create_test_tab(6, 6, false),
        ];

        let layout: Vec<(SectionKind, Vec<i32>)> = build_sections(&tabs)
            .iter()
            .map(|s| (s.kind, ids(s)))
            .collect();

        assert_eq!(
            layout,
            vec![
                (SectionKind::Pinned, vec![2, 5]),
                (SectionKind::Ungrouped, vec![1]),
                (SectionKind::Ungrouped, vec![3]),
                (SectionKind::Group(6), vec![4]),
                (SectionKind::Group(6), vec![6]),
            ]
        );
    }

    #[test]
    fn test_empty_snapshot() {
        assert!(build_sections(&[]).is_empty());
    }

    #[test]
    fn test_single_tab_group_is_collapsible() {
        let sections = build_sections(&[create_test_tab(1, 9, false)]);

        assert_eq!(sections.len(), 1);
        assert!(sections[0].is_collapsible());
    }

    #[test]
    fn test_labels() {
        let tabs = vec![
            create_test_tab(1, -1, true),
            create_test_tab(2, 4, false),
            create_test_tab(3, 8, false),
            create_test_tab(4, -1, false),
        ];
        let mut groups = HashMap::new();
        groups.insert(
            4,
            TabGroupInfo {
                id: 4,
                title: Some("Research".to_string()),
                color: Some("green".to_string()),
            },
        );
        groups.insert(
            8,
            TabGroupInfo {
                id: 8,
                title: Some(String::new()),
                color: None,
            },
        );

        let labels: Vec<String> = build_sections(&tabs)
            .iter()
            .map(|s| s.label(&groups))
            .collect();

        assert_eq!(labels, vec!["Pinned", "Research", "Group 8", "Other Tabs"]);
    }

    #[test]
    fn test_tab_counter_text() {
        let mut tabs = vec![
            create_test_tab(1, -1, false),
            create_test_tab(2, -1, false),
            create_test_tab(3, -1, false),
        ];

        assert_eq!(tab_counter_text(&tabs, true), "3 tabs");

        tabs[1].active = true;
        assert_eq!(tab_counter_text(&tabs, true), "On tab 2 of 3");
        assert_eq!(tab_counter_text(&tabs, false), "3 tabs");
        assert_eq!(active_tab(&tabs).map(|t| t.id), Some(2));
    }

    fn arb_tabs() -> impl Strategy<Value = Vec<TabInfo>> {
        prop::collection::vec((any::<bool>(), prop_oneof![Just(-1), 1..4i32]), 0..40).prop_map(
            |specs| {
                specs
                    .into_iter()
                    .enumerate()
                    .map(|(i, (pinned, group))| create_test_tab(i as i32 + 1, group, pinned))
                    .collect()
            },
        )
    }

    proptest! {
        #[test]
        fn prop_sections_preserve_snapshot_order(tabs in arb_tabs()) {
            let sections = build_sections(&tabs);

            let position = |id: i32| tabs.iter().position(|t| t.id == id).unwrap();
            for section in &sections {
                prop_assert!(!section.tabs.is_empty());
                for pair in section.tabs.windows(2) {
                    prop_assert!(position(pair[0].id) < position(pair[1].id));
                }
            }

            // Every tab lands in exactly one section
            let total: usize = sections.iter().map(|s| s.tabs.len()).sum();
            prop_assert_eq!(total, tabs.len());

            // Unpinned sections read back as the unpinned snapshot
            let unpinned: Vec<i32> = tabs.iter().filter(|t| !t.pinned).map(|t| t.id).collect();
            let rendered: Vec<i32> = sections
                .iter()
                .filter(|s| s.kind != SectionKind::Pinned)
                .flat_map(|s| s.tabs.iter().map(|t| t.id))
                .collect();
            prop_assert_eq!(rendered, unpinned);

            // Only the leading section may be pinned
            for section in sections.iter().skip(1) {
                prop_assert_ne!(section.kind, SectionKind::Pinned);
            }
        }
    }
}
