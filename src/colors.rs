/// Tab group color resolution
///
/// `chrome.tabGroups` reports colors by name ("blue", "grey", ...), not by
/// value. Sections are tinted from this table.
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupColor {
    Grey,
    Blue,
    Red,
    Yellow,
    Green,
    Pink,
    Purple,
    Cyan,
    Orange,
}

const GROUP_COLOR_TABLE: [(GroupColor, &str, &str); 9] = [
    (GroupColor::Grey, "grey", "#5f6368"),
    (GroupColor::Blue, "blue", "#4285f4"),
    (GroupColor::Red, "red", "#ea4335"),
    (GroupColor::Yellow, "yellow", "#fbbc04"),
    (GroupColor::Green, "green", "#34a853"),
    (GroupColor::Pink, "pink", "#f538a0"),
    (GroupColor::Purple, "purple", "#a142f4"),
    (GroupColor::Cyan, "cyan", "#24c1e0"),
    (GroupColor::Orange, "orange", "#ff9800"),
];

/// Opacity of the section background tint
const TINT_ALPHA: f64 = 0.28;

static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^#?([a-f\d]{2})([a-f\d]{2})([a-f\d]{2})$").expect("static hex pattern")
});

impl GroupColor {
    pub fn from_name(name: &str) -> Option<GroupColor> {
        GROUP_COLOR_TABLE
            .iter()
            .find(|(_, key, _)| *key == name)
            .map(|(color, _, _)| *color)
    }

    pub fn hex(self) -> &'static str {
        GROUP_COLOR_TABLE
            .iter()
            .find(|(color, _, _)| *color == self)
            .map(|(_, _, hex)| *hex)
            .unwrap_or("#5f6368")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// A color ready to be applied to a section
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedColor {
    pub rgb: Rgb,
    pub hex: String,
}

impl ResolvedColor {
    /// Inline style for a tinted group section
    pub fn section_style(&self) -> String {
        format!(
            "background-color: rgba({}, {}, {}, {}); border-left: 3px solid {};",
            self.rgb.r, self.rgb.g, self.rgb.b, TINT_ALPHA, self.hex
        )
    }
}

pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    let caps = HEX_COLOR.captures(hex)?;
    let channel = |i: usize| u8::from_str_radix(&caps[i], 16).ok();

    Some(Rgb {
        r: channel(1)?,
        g: channel(2)?,
        b: channel(3)?,
    })
}

/// Resolve a group color given either a Chrome color name or a `#rrggbb` value
pub fn resolve_group_color(color: &str) -> Option<ResolvedColor> {
    if color.is_empty() {
        return None;
    }

    let hex = match GroupColor::from_name(color) {
        Some(named) => named.hex().to_string(),
        None if color.starts_with('#') => color.to_string(),
        None => return None,
    };

    hex_to_rgb(&hex).map(|rgb| ResolvedColor { rgb, hex })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_named_colors() {
        let blue = resolve_group_color("blue").unwrap();
        assert_eq!(blue.hex, "#4285f4");
        assert_eq!(blue.rgb, Rgb { r: 0x42, g: 0x85, b: 0xf4 });

        let orange = resolve_group_color("orange").unwrap();
        assert_eq!(orange.rgb, Rgb { r: 255, g: 152, b: 0 });
    }

    #[test]
    fn test_every_named_color_resolves() {
        for (color, name, hex) in GROUP_COLOR_TABLE {
            assert_eq!(GroupColor::from_name(name), Some(color));
            assert_eq!(resolve_group_color(name).unwrap().hex, hex);
        }
    }

    #[test]
    fn test_resolve_hex_passthrough() {
        let custom = resolve_group_color("#AbCdEf").unwrap();
        assert_eq!(custom.hex, "#AbCdEf");
        assert_eq!(custom.rgb, Rgb { r: 0xab, g: 0xcd, b: 0xef });
    }

    #[test]
    fn test_resolve_unknown_colors() {
        assert_eq!(resolve_group_color(""), None);
        assert_eq!(resolve_group_color("magenta"), None);
        assert_eq!(resolve_group_color("#12345"), None);
        assert_eq!(resolve_group_color("#zzzzzz"), None);
    }

    #[test]
    fn test_section_style() {
        let style = resolve_group_color("red").unwrap().section_style();
        assert_eq!(
            style,
            "background-color: rgba(234, 67, 53, 0.28); border-left: 3px solid #ea4335;"
        );
    }

    #[test]
    fn test_serde_names() {
        let color: GroupColor = serde_json::from_str("\"purple\"").unwrap();
        assert_eq!(color, GroupColor::Purple);
        assert_eq!(serde_json::to_string(&GroupColor::Grey).unwrap(), "\"grey\"");
    }
}
