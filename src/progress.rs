use crate::svg::Element;

/// Color for bars and dots whose record has no entry in the color table.
pub const FALLBACK_BAR_COLOR: &str = "#858585";

/// Track color behind progress bars.
pub const TRACK_COLOR: &str = "#ededed";

const BAR_HEIGHT: f64 = 8.0;
const BAR_RADIUS: f64 = 5.0;

/// Parameters for one horizontal bar.
#[derive(Debug, Clone)]
pub struct ProgressBar<'a> {
    pub x: f64,
    pub y: f64,
    /// Track width.
    pub width: f64,
    pub color: Option<&'a str>,
    pub track_color: &'a str,
    /// Fill on the 0-100 scale.
    pub percent: f64,
    /// Record name, used as the bar's test id.
    pub label: &'a str,
}

impl<'a> ProgressBar<'a> {
    pub fn new(x: f64, y: f64, width: f64, percent: f64, label: &'a str) -> Self {
        Self {
            x,
            y,
            width,
            color: None,
            track_color: TRACK_COLOR,
            percent,
            label,
        }
    }

    pub fn color(mut self, color: Option<&'a str>) -> Self {
        self.color = color;
        self
    }

    /// Width of the filled part.
    pub fn fill_width(&self) -> f64 {
        let percent = if self.percent.is_finite() {
            self.percent.clamp(0.0, 100.0)
        } else {
            0.0
        };
        percent / 100.0 * self.width
    }

    /// Renders the track and fill. Carries no animation timing of its own.
    pub fn render(&self) -> Element {
        let fill = self.color.unwrap_or(FALLBACK_BAR_COLOR);

        Element::new("svg")
            .num("width", self.width)
            .num("x", self.x)
            .num("y", self.y)
            .child(
                Element::new("rect")
                    .num("rx", BAR_RADIUS)
                    .num("ry", BAR_RADIUS)
                    .num("x", 0.0)
                    .num("y", 0.0)
                    .num("width", self.width)
                    .num("height", BAR_HEIGHT)
                    .attr("fill", self.track_color),
            )
            .child(
                Element::new("rect")
                    .num("height", BAR_HEIGHT)
                    .attr("fill", fill)
                    .num("rx", BAR_RADIUS)
                    .num("ry", BAR_RADIUS)
                    .num("x", 0.0)
                    .num("y", 0.0)
                    .attr("data-testid", "lang-progress")
                    .attr("data-name", self.label)
                    .num("width", self.fill_width()),
            )
    }
}
