use crate::config::RenderConfig;
use crate::i18n::{self, Locales};
use crate::layout::{LayoutContext, render_layout};
use crate::stats::{StatRecord, aggregate};
use crate::svg::{Element, format_number};
use crate::theme::{ResolvedTheme, ThemeTable, resolve_theme};

/// Narrowest card frame.
pub const CARD_MIN_WIDTH: f64 = 495.0;

const PADDING_X: f64 = 25.0;
const PADDING_Y: f64 = 35.0;
/// Vertical space the title takes; removed from the height when hidden.
const TITLE_HEIGHT: f64 = 30.0;
const BORDER_RADIUS: f64 = 4.5;

const ANIMATIONS: &str = "\
@keyframes fadeInAnimation { from { opacity: 0; } to { opacity: 1; } }
";

const NO_ANIMATIONS: &str =
    "* { animation-duration: 0s !important; animation-delay: 0s !important; }\n";

/// Outer frame of a card: size, title, border and style block.
#[derive(Debug, Clone)]
pub struct Card<'a> {
    width: f64,
    height: f64,
    title: String,
    theme: &'a ResolvedTheme,
    hide_title: bool,
    hide_border: bool,
    disable_animations: bool,
    css: String,
}

impl<'a> Card<'a> {
    /// `title` is the custom title when given, otherwise `default_title`.
    pub fn new(
        width: f64,
        height: f64,
        custom_title: Option<&str>,
        default_title: &str,
        theme: &'a ResolvedTheme,
    ) -> Self {
        Self {
            width,
            height,
            title: custom_title.unwrap_or(default_title).to_string(),
            theme,
            hide_title: false,
            hide_border: false,
            disable_animations: false,
            css: String::new(),
        }
    }

    /// Hiding the title also shrinks the card by the title's height.
    pub fn hide_title(mut self, hide: bool) -> Self {
        if hide && !self.hide_title {
            self.height -= TITLE_HEIGHT;
        } else if !hide && self.hide_title {
            self.height += TITLE_HEIGHT;
        }
        self.hide_title = hide;
        self
    }

    pub fn hide_border(mut self, hide: bool) -> Self {
        self.hide_border = hide;
        self
    }

    pub fn disable_animations(mut self, disable: bool) -> Self {
        self.disable_animations = disable;
        self
    }

    /// Layout-specific rules appended after the theme styles.
    pub fn css(mut self, css: impl Into<String>) -> Self {
        self.css = css.into();
        self
    }

    fn style_block(&self) -> String {
        let mut styles = String::new();
        styles.push_str(&self.theme.styles);
        styles.push_str(&self.css);
        styles.push_str(ANIMATIONS);
        if self.disable_animations {
            styles.push_str(NO_ANIMATIONS);
        }
        styles
    }

    fn title_block(&self) -> Element {
        Element::new("g")
            .attr("data-testid", "card-title")
            .attr(
                "transform",
                format!(
                    "translate({}, {})",
                    format_number(PADDING_X),
                    format_number(PADDING_Y)
                ),
            )
            .child(
                Element::new("g").attr("transform", "translate(0, 0)").child(
                    Element::new("text")
                        .num("x", 0.0)
                        .num("y", 0.0)
                        .attr("class", "header")
                        .attr("data-testid", "header")
                        .text(self.title.as_str()),
                ),
            )
    }

    fn background(&self) -> Element {
        Element::new("rect")
            .attr("data-testid", "card-bg")
            .attr("class", "card-bg")
            .num("x", 0.5)
            .num("y", 0.5)
            .num("rx", BORDER_RADIUS)
            .attr("height", "99%")
            .attr("stroke", &self.theme.border_color)
            .num("width", self.width - 1.0)
            .attr("fill", &self.theme.bg_color)
            .attr("stroke-opacity", if self.hide_border { "0" } else { "1" })
    }

    /// Wraps `body` and serializes the whole document.
    pub fn render(&self, body: Vec<Element>) -> String {
        let body_offset = if self.hide_title {
            PADDING_X
        } else {
            PADDING_Y + 20.0
        };

        let mut svg = Element::new("svg")
            .num("width", self.width)
            .num("height", self.height)
            .attr(
                "viewBox",
                format!(
                    "0 0 {} {}",
                    format_number(self.width),
                    format_number(self.height)
                ),
            )
            .attr("fill", "none")
            .attr("xmlns", "http://www.w3.org/2000/svg")
            .child(Element::new("style").text(self.style_block()))
            .child(self.background());

        if !self.hide_title {
            svg = svg.child(self.title_block());
        }

        svg.child(
            Element::new("g")
                .attr("data-testid", "main-card-body")
                .attr("transform", format!("translate(0, {})", format_number(body_offset)))
                .child(
                    Element::new("svg")
                        .num("x", PADDING_X)
                        .num("y", 0.0)
                        .children(body),
                ),
        )
        .to_string()
    }
}

#[cfg(test)]
impl Card<'_> {
    pub fn height(&self) -> f64 {
        self.height
    }
}

/// Renders a statistics card. Pure: the same inputs always give the same document.
pub fn render_card(
    records: &[StatRecord],
    config: &RenderConfig,
    themes: &ThemeTable,
    locales: &Locales,
) -> String {
    let totals = aggregate(records);
    let theme = resolve_theme(&config.colors, config.theme.as_deref(), themes);
    let title = locales.get(i18n::CARD_TITLE, &config.locale);
    let no_activity = locales.get(i18n::NO_ACTIVITY, &config.locale);

    let ctx = LayoutContext {
        records,
        aggregate: &totals,
        colors: &config.category_colors,
        theme: &theme,
        line_height: config.line_height,
        hide_progress: config.hide_progress,
        width: config.card_width,
        no_activity_text: &no_activity,
    };
    let layout = render_layout(config.layout, &ctx);

    tracing::debug!(
        records = records.len(),
        total_seconds = totals.total_seconds,
        layout = ?config.layout,
        height = layout.height,
        "rendering card"
    );

    Card::new(
        CARD_MIN_WIDTH.max(config.card_width),
        layout.height,
        config.custom_title.as_deref(),
        &title,
        &theme,
    )
    .hide_title(config.hide_title)
    .hide_border(config.hide_border)
    .disable_animations(config.disable_animations)
    .css(layout.css)
    .render(layout.body)
}

const ERROR_HEADING: &str = "Something went wrong!";

/// Renders the card shown instead of statistics when they could not be loaded.
pub fn render_error(message: &str, secondary: Option<&str>) -> String {
    let styles = "\
.text { font: 600 16px 'Segoe UI', Ubuntu, Sans-Serif; fill: #2F80ED }
.small { font: 600 12px 'Segoe UI', Ubuntu, Sans-Serif; fill: #252525 }
.gray { fill: #858585 }
";

    let mut detail = Element::new("tspan")
        .num("x", PADDING_X)
        .num("dy", 18.0)
        .attr("class", "gray");
    if let Some(text) = secondary.filter(|s| !s.is_empty()) {
        detail = detail.text(text);
    }

    Element::new("svg")
        .num("width", CARD_MIN_WIDTH)
        .num("height", 120.0)
        .attr("viewBox", format!("0 0 {} 120", format_number(CARD_MIN_WIDTH)))
        .attr("fill", "none")
        .attr("xmlns", "http://www.w3.org/2000/svg")
        .child(Element::new("style").text(styles))
        .child(
            Element::new("rect")
                .num("x", 0.5)
                .num("y", 0.5)
                .num("width", CARD_MIN_WIDTH - 1.0)
                .attr("height", "99%")
                .num("rx", BORDER_RADIUS)
                .attr("fill", "#FFFEFE")
                .attr("stroke", "#E4E2E2"),
        )
        .child(
            Element::new("text")
                .num("x", PADDING_X)
                .num("y", 45.0)
                .attr("class", "text")
                .text(ERROR_HEADING),
        )
        .child(
            Element::new("text")
                .attr("data-testid", "message")
                .num("x", PADDING_X)
                .num("y", 55.0)
                .attr("class", "text small")
                .child(
                    Element::new("tspan")
                        .num("x", PADDING_X)
                        .num("dy", 18.0)
                        .text(message),
                )
                .child(detail),
        )
        .to_string()
}
