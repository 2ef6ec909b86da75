use crate::layout::ColorTable;
use crate::theme::ColorOverrides;
use clap::Parser;
use std::path::PathBuf;

/// Row gap of the default layout.
pub const DEFAULT_LINE_HEIGHT: f64 = 25.0;

/// Layout width when none (or garbage) is given.
pub const DEFAULT_CARD_WIDTH: f64 = 300.0;

/// Narrowest layout width that still leaves a positive compact track.
pub const MIN_CARD_WIDTH: f64 = 100.0;

/// Render time-tracking statistics as an SVG summary card
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Records file: a JSON array, or an object keyed by stat kind (.gz accepted)
    #[arg(short, long, value_name = "PATH", required_unless_present = "list_themes")]
    pub input: Option<PathBuf>,

    /// Which list to render when the input is keyed by stat kind
    #[arg(long, default_value = "languages")]
    pub stat: String,

    /// Category color table (JSON)
    #[arg(long, value_name = "PATH")]
    pub colors: Option<PathBuf>,

    /// Extra theme presets merged over the built-in ones (JSON)
    #[arg(long, value_name = "PATH")]
    pub themes: Option<PathBuf>,

    /// Output file (stdout if omitted; .svgz is gzip-compressed)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Print HTTP response headers before the document
    #[arg(long)]
    pub headers: bool,

    /// Hide the card title
    #[arg(long)]
    pub hide_title: bool,

    /// Hide the card border
    #[arg(long)]
    pub hide_border: bool,

    /// Hide progress bars in the default layout
    #[arg(long)]
    pub hide_progress: bool,

    /// Render without fade-in animations
    #[arg(long)]
    pub disable_animations: bool,

    /// Row gap of the default layout
    #[arg(long, value_name = "NUMBER")]
    pub line_height: Option<String>,

    #[arg(long, value_name = "COLOR")]
    pub title_color: Option<String>,

    #[arg(long, value_name = "COLOR")]
    pub icon_color: Option<String>,

    #[arg(long, value_name = "COLOR")]
    pub text_color: Option<String>,

    #[arg(long, value_name = "COLOR")]
    pub bg_color: Option<String>,

    #[arg(long, value_name = "COLOR")]
    pub border_color: Option<String>,

    /// Theme preset name (unknown names use the default theme)
    #[arg(long)]
    pub theme: Option<String>,

    /// Title text replacing the localized default
    #[arg(long)]
    pub custom_title: Option<String>,

    /// Layout variant: "default" or "compact"
    #[arg(long)]
    pub layout: Option<String>,

    /// Layout width (drives the compact track)
    #[arg(long, value_name = "NUMBER")]
    pub card_width: Option<String>,

    /// Locale of the default title and messages
    #[arg(long, default_value = "en")]
    pub locale: String,

    /// Requested cache lifetime in seconds
    #[arg(long, value_name = "SECONDS")]
    pub cache_seconds: Option<String>,

    /// List available theme presets and exit
    #[arg(long)]
    pub list_themes: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Body arrangement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Layout {
    /// One row per active record with its own progress bar.
    #[default]
    Default,
    /// One packed bar plus a two-column label grid.
    Compact,
}

impl Layout {
    /// Parses a layout name. Anything other than "compact" is the default layout.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(name) if name.eq_ignore_ascii_case("compact") => Layout::Compact,
            _ => Layout::Default,
        }
    }
}

/// Presentation intent for one render. Values are already coerced.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub custom_title: Option<String>,
    pub hide_title: bool,
    pub hide_border: bool,
    pub hide_progress: bool,
    pub disable_animations: bool,
    pub theme: Option<String>,
    pub line_height: f64,
    pub colors: ColorOverrides,
    pub layout: Layout,
    pub card_width: f64,
    pub locale: String,
    /// Record name to display color.
    pub category_colors: ColorTable,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            custom_title: None,
            hide_title: false,
            hide_border: false,
            hide_progress: false,
            disable_animations: false,
            theme: None,
            line_height: DEFAULT_LINE_HEIGHT,
            colors: ColorOverrides::default(),
            layout: Layout::Default,
            card_width: DEFAULT_CARD_WIDTH,
            locale: crate::i18n::FALLBACK_LOCALE.to_string(),
            category_colors: ColorTable::new(),
        }
    }
}

impl RenderConfig {
    /// Builds the render configuration from CLI arguments, coercing every
    /// raw numeric value.
    pub fn from_args(args: &Args, category_colors: ColorTable) -> Self {
        Self {
            custom_title: args.custom_title.clone(),
            hide_title: args.hide_title,
            hide_border: args.hide_border,
            hide_progress: args.hide_progress,
            disable_animations: args.disable_animations,
            theme: args.theme.clone(),
            line_height: parse_with_fallback(
                args.line_height.as_deref(),
                DEFAULT_LINE_HEIGHT,
                None,
            ),
            colors: ColorOverrides {
                title: args.title_color.clone(),
                icon: args.icon_color.clone(),
                text: args.text_color.clone(),
                bg: args.bg_color.clone(),
                border: args.border_color.clone(),
            },
            layout: Layout::parse(args.layout.as_deref()),
            card_width: parse_with_fallback(
                args.card_width.as_deref(),
                DEFAULT_CARD_WIDTH,
                Some((MIN_CARD_WIDTH, f64::MAX)),
            ),
            locale: args.locale.trim().to_lowercase(),
            category_colors,
        }
    }
}

/// Parses the leading number of `raw` (e.g. "30px" -> 30).
fn leading_number(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;

    for (i, c) in raw.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }

    if !seen_digit {
        return None;
    }
    raw[..end].trim_end_matches('.').parse::<f64>().ok()
}

/// Coerces a raw numeric input.
///
/// Absent, empty or non-numeric input yields `fallback`; a number is clamped
/// into `bounds` when given.
pub fn parse_with_fallback(raw: Option<&str>, fallback: f64, bounds: Option<(f64, f64)>) -> f64 {
    let value = raw
        .and_then(leading_number)
        .filter(|v| v.is_finite())
        .unwrap_or(fallback);

    match bounds {
        Some((min, max)) => value.clamp(min, max),
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_fallback_absent() {
        assert_eq!(parse_with_fallback(None, 25.0, None), 25.0);
        assert_eq!(parse_with_fallback(Some(""), 25.0, None), 25.0);
        assert_eq!(parse_with_fallback(Some("   "), 25.0, None), 25.0);
    }

    #[test]
    fn test_parse_with_fallback_non_numeric() {
        assert_eq!(parse_with_fallback(Some("abc"), 300.0, None), 300.0);
        assert_eq!(parse_with_fallback(Some("-"), 300.0, None), 300.0);
        assert_eq!(parse_with_fallback(Some("."), 300.0, None), 300.0);
    }

    #[test]
    fn test_parse_with_fallback_numeric() {
        assert_eq!(parse_with_fallback(Some("30"), 25.0, None), 30.0);
        assert_eq!(parse_with_fallback(Some(" 12.5 "), 25.0, None), 12.5);
        assert_eq!(parse_with_fallback(Some("30px"), 25.0, None), 30.0);
        assert_eq!(parse_with_fallback(Some("7."), 25.0, None), 7.0);
        assert_eq!(parse_with_fallback(Some("-4"), 25.0, None), -4.0);
    }

    #[test]
    fn test_parse_with_fallback_bounds() {
        let bounds = Some((7200.0, 86400.0));
        assert_eq!(parse_with_fallback(Some("100"), 7200.0, bounds), 7200.0);
        assert_eq!(parse_with_fallback(Some("999999"), 7200.0, bounds), 86400.0);
        assert_eq!(parse_with_fallback(Some("10000"), 7200.0, bounds), 10000.0);
        // fallback is clamped too
        assert_eq!(parse_with_fallback(Some("x"), 1.0, bounds), 7200.0);
    }

    #[test]
    fn test_layout_parse() {
        assert_eq!(Layout::parse(Some("compact")), Layout::Compact);
        assert_eq!(Layout::parse(Some(" Compact ")), Layout::Compact);
        assert_eq!(Layout::parse(Some("default")), Layout::Default);
        assert_eq!(Layout::parse(Some("grid")), Layout::Default);
        assert_eq!(Layout::parse(None), Layout::Default);
    }

    #[test]
    fn test_render_config_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.line_height, 25.0);
        assert_eq!(config.card_width, 300.0);
        assert_eq!(config.layout, Layout::Default);
        assert!(!config.hide_title);
        assert_eq!(config.locale, "en");
    }

    #[test]
    fn test_render_config_from_args() {
        let args = Args::parse_from([
            "statcard",
            "--input",
            "stats.json",
            "--line-height",
            "abc",
            "--card-width",
            "40",
            "--layout",
            "compact",
            "--title-color",
            "ff0000",
            "--hide-border",
            "--locale",
            "DE",
        ]);
        let config = RenderConfig::from_args(&args, ColorTable::new());

        assert_eq!(config.line_height, DEFAULT_LINE_HEIGHT);
        assert_eq!(config.card_width, MIN_CARD_WIDTH);
        assert_eq!(config.layout, Layout::Compact);
        assert_eq!(config.colors.title.as_deref(), Some("ff0000"));
        assert!(config.hide_border);
        assert!(!config.hide_title);
        assert_eq!(config.locale, "de");
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["statcard", "-i", "stats.json"]);
        assert_eq!(args.input, Some(PathBuf::from("stats.json")));
        assert_eq!(args.stat, "languages");
        assert_eq!(args.locale, "en");
        assert!(args.output.is_none());
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn test_args_input_required_unless_listing() {
        assert!(Args::try_parse_from(["statcard"]).is_err());
        let args = Args::try_parse_from(["statcard", "--list-themes"]).unwrap();
        assert!(args.list_themes);
        assert!(args.input.is_none());
    }
}
