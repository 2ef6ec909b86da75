use crate::config::Layout;
use crate::progress::{FALLBACK_BAR_COLOR, ProgressBar};
use crate::stats::{Aggregate, StatRecord};
use crate::svg::{Element, flex_column, format_number};
use crate::theme::ResolvedTheme;
use serde::Deserialize;
use std::collections::HashMap;

/// Horizontal inset of each default-layout row.
const ROW_INSET: f64 = 25.0;
/// Baseline of row text.
const ROW_TEXT_Y: f64 = 12.5;
const PROGRESS_X: f64 = 110.0;
const PROGRESS_Y: f64 = 4.0;
const PROGRESS_WIDTH: f64 = 220.0;
const VALUE_X: f64 = 350.0;
const VALUE_X_NO_PROGRESS: f64 = 170.0;

/// Rows before the first record that fade in ahead of it (title, spacing).
const STAGGER_LEAD: usize = 3;
const STAGGER_STEP_MS: usize = 150;

const DEFAULT_MIN_HEIGHT: f64 = 150.0;
const DEFAULT_HEIGHT_BASE: f64 = 45.0;

/// Horizontal space the compact track leaves free inside the layout width.
const COMPACT_TRACK_MARGIN: f64 = 50.0;
/// Segments narrower than this are widened by the same amount.
pub const VISIBILITY_FLOOR: f64 = 10.0;
const COMPACT_BAR_HEIGHT: f64 = 8.0;
const COMPACT_HEIGHT_BASE: f64 = 90.0;
const COMPACT_ROW_HEIGHT: f64 = 25.0;
const COMPACT_LABEL_Y: f64 = 25.0;
const COMPACT_RIGHT_COLUMN_X: f64 = 150.0;
const COMPACT_LABEL_STEP: f64 = 12.5;

/// Display color of one category, as stored in color tables.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CategoryColor {
    #[serde(default)]
    pub color: Option<String>,
}

/// Category name to display color.
pub type ColorTable = HashMap<String, CategoryColor>;

/// Color for a record, or the neutral gray when the table has none.
pub fn color_for<'a>(colors: &'a ColorTable, name: &str) -> &'a str {
    colors
        .get(name)
        .and_then(|c| c.color.as_deref())
        .filter(|c| !c.trim().is_empty())
        .unwrap_or(FALLBACK_BAR_COLOR)
}

/// Everything a layout needs for one render.
#[derive(Debug, Clone)]
pub struct LayoutContext<'a> {
    pub records: &'a [StatRecord],
    pub aggregate: &'a Aggregate,
    pub colors: &'a ColorTable,
    pub theme: &'a ResolvedTheme,
    pub line_height: f64,
    pub hide_progress: bool,
    pub width: f64,
    /// Localized text shown when no record is active.
    pub no_activity_text: &'a str,
}

/// A laid-out body and the card height it needs.
#[derive(Debug, Clone)]
pub struct LayoutOutput {
    pub body: Vec<Element>,
    pub height: f64,
    /// Layout-specific CSS appended to the theme styles.
    pub css: String,
}

/// Lays out the body with the selected variant.
pub fn render_layout(layout: Layout, ctx: &LayoutContext<'_>) -> LayoutOutput {
    match layout {
        Layout::Default => render_default(ctx),
        Layout::Compact => render_compact(ctx),
    }
}

/// Animation delay for the `index`-th rendered row, in milliseconds.
pub fn stagger_delay(index: usize) -> usize {
    (index + STAGGER_LEAD) * STAGGER_STEP_MS
}

/// Card height for the default layout with `rows` active records.
pub fn default_height(rows: usize, line_height: f64) -> f64 {
    (DEFAULT_HEIGHT_BASE + (rows as f64 + 1.0) * line_height).max(DEFAULT_MIN_HEIGHT)
}

/// Card height for the compact layout with `records` entries.
pub fn compact_height(records: usize) -> f64 {
    // round(n / 2) for non-negative n, rounding halves up
    COMPACT_HEIGHT_BASE + records.div_ceil(2) as f64 * COMPACT_ROW_HEIGHT
}

/// Vertical list: one row per active record, each fading in after the last.
///
/// Inactive records keep their share of the total; they are hidden, not
/// re-normalized.
pub fn render_default(ctx: &LayoutContext<'_>) -> LayoutOutput {
    let rows: Vec<Element> = ctx
        .records
        .iter()
        .enumerate()
        .filter(|(_, record)| record.is_active())
        .enumerate()
        .map(|(row, (idx, record))| {
            text_row(
                record,
                row,
                ctx.aggregate.percent_of(idx),
                color_for(ctx.colors, &record.name),
                ctx.hide_progress,
            )
        })
        .collect();

    let row_count = rows.len();
    let items = if rows.is_empty() {
        vec![no_activity_line(ctx.no_activity_text, &ctx.theme.text_color)]
    } else {
        rows
    };

    let height = default_height(row_count, ctx.line_height);
    tracing::debug!(rows = row_count, height, "default layout");

    LayoutOutput {
        body: flex_column(items, ctx.line_height),
        height,
        css: String::new(),
    }
}

fn text_row(
    record: &StatRecord,
    row: usize,
    percent: f64,
    color: &str,
    hide_progress: bool,
) -> Element {
    let value_x = if hide_progress {
        VALUE_X_NO_PROGRESS
    } else {
        VALUE_X
    };

    let mut group = Element::new("g")
        .attr("class", "stagger")
        .attr("style", format!("animation-delay: {}ms", stagger_delay(row)))
        .attr("transform", format!("translate({}, 0)", format_number(ROW_INSET)))
        .child(
            Element::new("text")
                .attr("class", "stat bold")
                .num("y", ROW_TEXT_Y)
                .text(format!("{}:", record.name)),
        )
        .child(
            Element::new("text")
                .attr("class", "stat")
                .num("x", value_x)
                .num("y", ROW_TEXT_Y)
                .attr("data-testid", &record.name)
                .text(record.text.as_str()),
        );

    if !hide_progress {
        group = group.child(
            ProgressBar::new(PROGRESS_X, PROGRESS_Y, PROGRESS_WIDTH, percent, &record.name)
                .color(Some(color))
                .render(),
        );
    }

    group
}

fn no_activity_line(text: &str, color: &str) -> Element {
    Element::new("text")
        .num("x", ROW_INSET)
        .num("y", 11.0)
        .attr("class", "stat bold")
        .attr("fill", color)
        .text(text)
}

/// One drawn segment of the compact bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Offset from the start of the track.
    pub x: f64,
    /// Proportional width, rounded to two decimals.
    pub nominal: f64,
    /// Width actually drawn after the visibility floor.
    pub width: f64,
}

/// Width of the compact track for a given layout width.
pub fn compact_track_width(width: f64) -> f64 {
    width - COMPACT_TRACK_MARGIN
}

/// Packs every record end-to-end along the track.
///
/// A segment narrower than [`VISIBILITY_FLOOR`] is drawn `nominal + 10` wide,
/// and later segments start after the widened one, so the sum of drawn widths
/// can exceed the track; the mask clips the overflow.
pub fn compact_segments(aggregate: &Aggregate, width: f64) -> Vec<Segment> {
    let track = compact_track_width(width);
    let mut offset = 0.0;

    aggregate
        .percents
        .iter()
        .map(|share| {
            let nominal = (share * track * 100.0).round() / 100.0;
            let drawn = if nominal < VISIBILITY_FLOOR {
                nominal + VISIBILITY_FLOOR
            } else {
                nominal
            };
            let segment = Segment {
                x: offset,
                nominal,
                width: drawn,
            };
            offset += drawn;
            segment
        })
        .collect()
}

/// Single proportional bar plus a two-column label grid. Every record is
/// shown, active or not.
pub fn render_compact(ctx: &LayoutContext<'_>) -> LayoutOutput {
    let track = compact_track_width(ctx.width);

    let mask = Element::new("mask").attr("id", "rect-mask").child(
        Element::new("rect")
            .num("x", 0.0)
            .num("y", 0.0)
            .num("width", track)
            .num("height", COMPACT_BAR_HEIGHT)
            .attr("fill", "white")
            .num("rx", 5.0),
    );

    let segments = compact_segments(ctx.aggregate, ctx.width);
    let bars = ctx.records.iter().zip(&segments).map(|(record, segment)| {
        tracing::trace!(
            name = %record.name,
            x = segment.x,
            nominal = segment.nominal,
            width = segment.width,
            "compact segment"
        );
        Element::new("rect")
            .attr("mask", "url(#rect-mask)")
            .attr("data-testid", "lang-progress")
            .num("x", segment.x)
            .num("y", 0.0)
            .num("width", segment.width)
            .num("height", COMPACT_BAR_HEIGHT)
            .attr("fill", color_for(ctx.colors, &record.name))
    });

    let labels = ctx.records.iter().enumerate().map(|(idx, record)| {
        let (x, y) = label_position(idx);
        compact_label(record, color_for(ctx.colors, &record.name), x, y)
    });

    let mut body = vec![mask];
    body.extend(bars);
    body.extend(labels);

    let height = compact_height(ctx.records.len());
    tracing::debug!(records = ctx.records.len(), track, height, "compact layout");

    LayoutOutput {
        body,
        height,
        css: format!(
            ".lang-name {{ font: 400 11px 'Segoe UI', Ubuntu, Sans-Serif; fill: {}; }}\n",
            ctx.theme.text_color
        ),
    }
}

/// Grid position of the `idx`-th label: even indices in the left column,
/// odd ones in the right.
pub fn label_position(idx: usize) -> (f64, f64) {
    let step = COMPACT_LABEL_STEP * idx as f64;
    if idx % 2 == 0 {
        (0.0, COMPACT_LABEL_Y + step)
    } else {
        (COMPACT_RIGHT_COLUMN_X, COMPACT_LABEL_STEP + step)
    }
}

fn compact_label(record: &StatRecord, color: &str, x: f64, y: f64) -> Element {
    Element::new("g")
        .attr(
            "transform",
            format!("translate({}, {})", format_number(x), format_number(y)),
        )
        .child(
            Element::new("circle")
                .num("cx", 5.0)
                .num("cy", 6.0)
                .num("r", 5.0)
                .attr("fill", color),
        )
        .child(
            Element::new("text")
                .attr("data-testid", "lang-name")
                .num("x", 15.0)
                .num("y", 10.0)
                .attr("class", "lang-name")
                .text(format!("{} {}", record.name, record.text)),
        )
}
