use crate::config::parse_with_fallback;
use chrono::{DateTime, Duration, Utc};

pub const TWO_HOURS: u64 = 7200;
pub const FOUR_HOURS: u64 = 14400;
pub const ONE_DAY: u64 = 86400;

pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";

/// Maps a requested cache lifetime to the allowed one.
///
/// No request at all (absent or blank) gets [`FOUR_HOURS`]. Anything else,
/// even garbage, is clamped into `[TWO_HOURS, ONE_DAY]`.
pub fn cache_seconds(requested: Option<&str>) -> u64 {
    match requested {
        None => FOUR_HOURS,
        Some(raw) if raw.trim().is_empty() => FOUR_HOURS,
        Some(raw) => parse_with_fallback(
            Some(raw),
            TWO_HOURS as f64,
            Some((TWO_HOURS as f64, ONE_DAY as f64)),
        ) as u64,
    }
}

/// Headers accompanying a rendered card.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseMeta {
    pub content_type: &'static str,
    pub max_age: u64,
    pub expires: DateTime<Utc>,
}

impl ResponseMeta {
    pub fn new(max_age: u64, now: DateTime<Utc>) -> Self {
        // a year bounds the Expires offset well inside chrono's range
        let offset = max_age.min(365 * ONE_DAY) as i64;
        Self {
            content_type: SVG_CONTENT_TYPE,
            max_age,
            expires: now + Duration::seconds(offset),
        }
    }

    pub fn cache_control(&self) -> String {
        format!("public, max-age={}", self.max_age)
    }

    /// Header lines in HTTP order, without the trailing blank line.
    pub fn header_lines(&self) -> Vec<String> {
        vec![
            format!("Content-Type: {}", self.content_type),
            format!("Cache-Control: {}", self.cache_control()),
            format!(
                "Expires: {}",
                self.expires.format("%a, %d %b %Y %H:%M:%S GMT")
            ),
        ]
    }
}
