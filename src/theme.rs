//! Theme presets and color resolution.
//!
//! Every channel resolves through the same chain: explicit override, then
//! the named theme, then the built-in `default` theme. The result is always
//! fully populated.

use serde::Deserialize;
use std::collections::HashMap;

/// Name of the theme every lookup falls back to.
pub const DEFAULT_THEME: &str = "default";

/// Border stroke used when neither override nor theme supplies one.
const DEFAULT_BORDER_COLOR: &str = "e4e2e2";

/// A preset bundle of colors, stored the way theme tables store them
/// (hex without `#`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ThemeColors {
    pub title_color: String,
    pub icon_color: String,
    pub text_color: String,
    pub bg_color: String,
    #[serde(default)]
    pub border_color: Option<String>,
}

impl ThemeColors {
    fn new(title: &str, icon: &str, text: &str, bg: &str) -> Self {
        Self {
            title_color: title.to_string(),
            icon_color: icon.to_string(),
            text_color: text.to_string(),
            bg_color: bg.to_string(),
            border_color: None,
        }
    }
}

/// Named theme presets. Always contains `default`.
#[derive(Debug, Clone)]
pub struct ThemeTable {
    themes: HashMap<String, ThemeColors>,
}

impl Default for ThemeTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ThemeTable {
    /// The presets shipped with the binary.
    pub fn builtin() -> Self {
        let presets = [
            ("default", ThemeColors::new("2f80ed", "4c71f6", "434d58", "fffefe")),
            ("dark", ThemeColors::new("fff", "79ff97", "9f9f9f", "151515")),
            ("radical", ThemeColors::new("fe428e", "f8d847", "a9fef7", "141321")),
            ("merko", ThemeColors::new("abd200", "b7d364", "68b587", "0a0f0b")),
            ("gruvbox", ThemeColors::new("fabd2f", "fe8019", "8ec07c", "282828")),
            ("tokyonight", ThemeColors::new("70a5fd", "bf91f3", "38bdae", "1a1b27")),
            ("onedark", ThemeColors::new("e4bf7a", "8eb573", "df6d74", "282c34")),
            ("cobalt", ThemeColors::new("e683d9", "0480ef", "75eeb2", "193549")),
            ("synthwave", ThemeColors::new("e2e9ec", "ef8539", "e5289e", "2b213a")),
            ("highcontrast", ThemeColors::new("e7f216", "00ffff", "fff", "000")),
            ("dracula", ThemeColors::new("ff6e96", "79dafa", "f8f8f2", "282a36")),
        ];

        Self {
            themes: presets
                .into_iter()
                .map(|(name, colors)| (name.to_string(), colors))
                .collect(),
        }
    }

    /// Adds or replaces presets. A replacement `default` is accepted; the
    /// table never loses its `default` entry.
    pub fn merge(&mut self, extra: HashMap<String, ThemeColors>) {
        self.themes.extend(extra);
    }

    pub fn get(&self, name: &str) -> Option<&ThemeColors> {
        self.themes.get(name)
    }

    /// Preset names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.themes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn default_theme(&self) -> &ThemeColors {
        // builtin() always inserts the default preset and merge() cannot remove it
        &self.themes[DEFAULT_THEME]
    }
}

/// Explicit per-channel overrides from the render configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorOverrides {
    pub title: Option<String>,
    pub icon: Option<String>,
    pub text: Option<String>,
    pub bg: Option<String>,
    pub border: Option<String>,
}

/// Concrete colors for one render, plus the style block binding them.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTheme {
    pub title_color: String,
    pub icon_color: String,
    pub text_color: String,
    pub bg_color: String,
    pub border_color: String,
    /// CSS rules for the `.header`, `.stat`, `.bold`, `.icon` and `.card-bg` classes.
    pub styles: String,
}

/// Returns true for 3, 4, 6 or 8 hex digits (no leading `#`).
pub fn is_valid_hex_color(value: &str) -> bool {
    matches!(value.len(), 3 | 4 | 6 | 8) && value.chars().all(|c| c.is_ascii_hexdigit())
}

/// Normalizes a user or table color. Bare hex gets a `#` prefix; any other
/// non-empty value is passed through. Empty means "not set".
pub fn normalize_color(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let bare = value.strip_prefix('#').unwrap_or(value);
    if is_valid_hex_color(bare) {
        Some(format!("#{}", bare))
    } else if value.starts_with('#') {
        // "#" followed by garbage is neither hex nor a color keyword
        None
    } else {
        Some(value.to_string())
    }
}

fn pick(
    explicit: Option<&str>,
    themed: Option<&str>,
    fallback: &str,
) -> String {
    explicit
        .and_then(normalize_color)
        .or_else(|| themed.and_then(normalize_color))
        .or_else(|| normalize_color(fallback))
        .unwrap_or_else(|| format!("#{}", fallback))
}

/// Resolves all color channels for a render.
///
/// Unknown theme names resolve exactly like the default theme.
pub fn resolve_theme(
    overrides: &ColorOverrides,
    theme_name: Option<&str>,
    table: &ThemeTable,
) -> ResolvedTheme {
    let default = table.default_theme();
    let selected = match theme_name {
        Some(name) if !name.is_empty() => table.get(name).unwrap_or_else(|| {
            tracing::warn!("Unknown theme {:?}, using {}", name, DEFAULT_THEME);
            default
        }),
        _ => default,
    };

    let title_color = pick(
        overrides.title.as_deref(),
        Some(&selected.title_color),
        &default.title_color,
    );
    let icon_color = pick(
        overrides.icon.as_deref(),
        Some(&selected.icon_color),
        &default.icon_color,
    );
    let text_color = pick(
        overrides.text.as_deref(),
        Some(&selected.text_color),
        &default.text_color,
    );
    let bg_color = pick(
        overrides.bg.as_deref(),
        Some(&selected.bg_color),
        &default.bg_color,
    );
    let border_color = pick(
        overrides.border.as_deref(),
        selected.border_color.as_deref(),
        default.border_color.as_deref().unwrap_or(DEFAULT_BORDER_COLOR),
    );

    let styles = theme_styles(&title_color, &text_color, &icon_color, &bg_color);

    ResolvedTheme {
        title_color,
        icon_color,
        text_color,
        bg_color,
        border_color,
        styles,
    }
}

fn theme_styles(title: &str, text: &str, icon: &str, bg: &str) -> String {
    format!(
        "\
.header {{ font: 600 18px 'Segoe UI', Ubuntu, Sans-Serif; fill: {title}; animation: fadeInAnimation 0.8s ease-in-out forwards; }}
.stat {{ font: 600 14px 'Segoe UI', Ubuntu, \"Helvetica Neue\", Sans-Serif; fill: {text}; }}
.stagger {{ opacity: 0; animation: fadeInAnimation 0.3s ease-in-out forwards; }}
.bold {{ font-weight: 700; }}
.icon {{ fill: {icon}; }}
.card-bg {{ fill: {bg}; }}
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(overrides: &ColorOverrides, theme: Option<&str>) -> ResolvedTheme {
        resolve_theme(overrides, theme, &ThemeTable::builtin())
    }

    #[test]
    fn test_default_theme_colors() {
        let theme = resolve(&ColorOverrides::default(), None);
        assert_eq!(theme.title_color, "#2f80ed");
        assert_eq!(theme.icon_color, "#4c71f6");
        assert_eq!(theme.text_color, "#434d58");
        assert_eq!(theme.bg_color, "#fffefe");
        assert_eq!(theme.border_color, "#e4e2e2");
    }

    #[test]
    fn test_named_theme_wins_over_default() {
        let theme = resolve(&ColorOverrides::default(), Some("dark"));
        assert_eq!(theme.title_color, "#fff");
        assert_eq!(theme.bg_color, "#151515");
    }

    #[test]
    fn test_explicit_override_wins_over_named_theme() {
        let overrides = ColorOverrides {
            title: Some("ff0000".to_string()),
            ..Default::default()
        };
        let theme = resolve(&overrides, Some("dark"));
        assert_eq!(theme.title_color, "#ff0000");
        // untouched channels still come from the named theme
        assert_eq!(theme.text_color, "#9f9f9f");
    }

    #[test]
    fn test_empty_override_is_ignored() {
        let overrides = ColorOverrides {
            title: Some(String::new()),
            ..Default::default()
        };
        let theme = resolve(&overrides, Some("radical"));
        assert_eq!(theme.title_color, "#fe428e");
    }

    #[test]
    fn test_unknown_theme_matches_no_theme() {
        let overrides = ColorOverrides::default();
        assert_eq!(resolve(&overrides, Some("no-such-theme")), resolve(&overrides, None));
        assert_eq!(resolve(&overrides, Some("")), resolve(&overrides, None));
    }

    #[test]
    fn test_styles_bind_resolved_colors() {
        let theme = resolve(&ColorOverrides::default(), Some("gruvbox"));
        assert!(theme.styles.contains(".header"));
        assert!(theme.styles.contains("fill: #fabd2f"));
        assert!(theme.styles.contains(".stat"));
        assert!(theme.styles.contains("fill: #8ec07c"));
        assert!(theme.styles.contains(".icon { fill: #fe8019; }"));
        assert!(theme.styles.contains(".card-bg { fill: #282828; }"));
    }

    #[test]
    fn test_normalize_color() {
        assert_eq!(normalize_color("fff"), Some("#fff".to_string()));
        assert_eq!(normalize_color("#A1B2C3"), Some("#A1B2C3".to_string()));
        assert_eq!(normalize_color("red"), Some("red".to_string()));
        assert_eq!(normalize_color("  "), None);
        assert_eq!(normalize_color("#zzz"), None);
    }

    #[test]
    fn test_is_valid_hex_color() {
        assert!(is_valid_hex_color("fff"));
        assert!(is_valid_hex_color("ffff"));
        assert!(is_valid_hex_color("00ff00"));
        assert!(is_valid_hex_color("00ff00aa"));
        assert!(!is_valid_hex_color("00ff0"));
        assert!(!is_valid_hex_color("gggggg"));
    }

    #[test]
    fn test_builtin_names() {
        let table = ThemeTable::builtin();
        let names = table.names();
        assert_eq!(names.len(), 11);
        assert!(names.contains(&DEFAULT_THEME));
        assert!(names.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_merged_theme_is_selectable() {
        let mut table = ThemeTable::builtin();
        let mut extra = HashMap::new();
        extra.insert(
            "custom".to_string(),
            ThemeColors {
                title_color: "111111".to_string(),
                icon_color: "222222".to_string(),
                text_color: "333333".to_string(),
                bg_color: "444444".to_string(),
                border_color: Some("555555".to_string()),
            },
        );
        table.merge(extra);

        let theme = resolve_theme(&ColorOverrides::default(), Some("custom"), &table);
        assert_eq!(theme.title_color, "#111111");
        assert_eq!(theme.border_color, "#555555");
    }
}
