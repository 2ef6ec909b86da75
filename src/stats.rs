use serde::Deserialize;

/// One category's measurement (a language, editor, project, ...).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawStatRecord")]
pub struct StatRecord {
    /// Display label, unique within a render call.
    pub name: String,
    /// Non-negative duration in seconds.
    pub total_seconds: f64,
    /// Pre-formatted duration, e.g. "3 hrs 12 mins".
    pub text: String,
    pub hours: u64,
    pub minutes: u64,
}

/// Wire shape of a record. Only `name` and `total_seconds` are required;
/// WakaTime's `percent` and `digital` fields are ignored.
#[derive(Debug, Deserialize)]
struct RawStatRecord {
    name: String,
    #[serde(default)]
    total_seconds: f64,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    hours: Option<u64>,
    #[serde(default)]
    minutes: Option<u64>,
}

impl From<RawStatRecord> for StatRecord {
    fn from(raw: RawStatRecord) -> Self {
        let total_seconds = if raw.total_seconds.is_finite() {
            raw.total_seconds.max(0.0)
        } else {
            0.0
        };
        let whole = total_seconds as u64;
        let hours = raw.hours.unwrap_or(whole / 3600);
        let minutes = raw.minutes.unwrap_or((whole % 3600) / 60);
        let text = raw
            .text
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| format_duration_text(total_seconds));

        Self {
            name: raw.name,
            total_seconds,
            text,
            hours,
            minutes,
        }
    }
}

impl StatRecord {
    /// A record with zero hours and zero minutes is hidden by the default layout.
    pub fn is_active(&self) -> bool {
        self.hours > 0 || self.minutes > 0
    }
}

#[cfg(test)]
impl StatRecord {
    /// Builds a record from seconds alone, deriving text and components.
    pub fn from_seconds(name: impl Into<String>, total_seconds: f64) -> Self {
        RawStatRecord {
            name: name.into(),
            total_seconds,
            text: None,
            hours: None,
            minutes: None,
        }
        .into()
    }
}

/// Totals derived from a record list for a single render.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub total_seconds: f64,
    /// Share of the total per record (0.0 to 1.0), in input order.
    pub percents: Vec<f64>,
}

impl Aggregate {
    /// Share of record `idx` on the 0-100 scale.
    pub fn percent_of(&self, idx: usize) -> f64 {
        self.percents.get(idx).copied().unwrap_or(0.0) * 100.0
    }
}

/// Sums durations and computes each record's share of the total.
/// A zero total yields zero shares.
pub fn aggregate(records: &[StatRecord]) -> Aggregate {
    let total_seconds: f64 = records.iter().map(|r| r.total_seconds).sum();
    let percents = records
        .iter()
        .map(|r| {
            if total_seconds > 0.0 {
                r.total_seconds / total_seconds
            } else {
                0.0
            }
        })
        .collect();

    Aggregate {
        total_seconds,
        percents,
    }
}

/// Formats seconds the way WakaTime does (e.g., "3 hrs 12 mins", "1 hr 1 min", "45 secs").
pub fn format_duration_text(total_seconds: f64) -> String {
    let secs = total_seconds.max(0.0) as u64;
    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;

    let plural = |n: u64, unit: &str| {
        if n == 1 {
            format!("{} {}", n, unit)
        } else {
            format!("{} {}s", n, unit)
        }
    };

    match (hours, mins) {
        (0, 0) => plural(secs, "sec"),
        (0, m) => plural(m, "min"),
        (h, 0) => plural(h, "hr"),
        (h, m) => format!("{} {}", plural(h, "hr"), plural(m, "min")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, secs: f64) -> StatRecord {
        StatRecord::from_seconds(name, secs)
    }

    #[test]
    fn test_aggregate_sums_and_shares() {
        let records = vec![record("Rust", 3600.0), record("Go", 1800.0), record("C", 1800.0)];
        let agg = aggregate(&records);

        assert_eq!(agg.total_seconds, 7200.0);
        assert_eq!(agg.percents, vec![0.5, 0.25, 0.25]);
        assert_eq!(agg.percent_of(0), 50.0);
    }

    #[test]
    fn test_aggregate_shares_sum_to_one() {
        let records: Vec<StatRecord> = [17.0, 3.0, 1234.5, 0.0, 99.9, 7.0]
            .iter()
            .enumerate()
            .map(|(i, s)| record(&format!("r{}", i), *s))
            .collect();
        let agg = aggregate(&records);

        let sum: f64 = agg.percents.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9, "shares summed to {}", sum);
    }

    #[test]
    fn test_aggregate_zero_total_does_not_divide() {
        let records = vec![record("A", 0.0), record("B", 0.0)];
        let agg = aggregate(&records);

        assert_eq!(agg.total_seconds, 0.0);
        assert_eq!(agg.percents, vec![0.0, 0.0]);
    }

    #[test]
    fn test_aggregate_empty() {
        let agg = aggregate(&[]);
        assert_eq!(agg.total_seconds, 0.0);
        assert!(agg.percents.is_empty());
        assert_eq!(agg.percent_of(3), 0.0);
    }

    #[test]
    fn test_aggregate_preserves_input_order() {
        let records = vec![record("B", 10.0), record("A", 30.0)];
        let agg = aggregate(&records);
        assert_eq!(agg.percents, vec![0.25, 0.75]);
    }

    #[test]
    fn test_format_duration_text() {
        assert_eq!(format_duration_text(0.0), "0 secs");
        assert_eq!(format_duration_text(45.0), "45 secs");
        assert_eq!(format_duration_text(60.0), "1 min");
        assert_eq!(format_duration_text(3600.0), "1 hr");
        assert_eq!(format_duration_text(3660.0), "1 hr 1 min");
        assert_eq!(format_duration_text(11520.0), "3 hrs 12 mins");
    }

    #[test]
    fn test_record_from_wakatime_json() {
        let json = r#"{
            "digital": "3:12",
            "hours": 3,
            "minutes": 12,
            "name": "Rust",
            "percent": 62.5,
            "text": "3 hrs 12 mins",
            "total_seconds": 11520.4
        }"#;
        let rec: StatRecord = serde_json::from_str(json).unwrap();

        assert_eq!(rec.name, "Rust");
        assert_eq!(rec.hours, 3);
        assert_eq!(rec.minutes, 12);
        assert_eq!(rec.text, "3 hrs 12 mins");
        assert!(rec.is_active());
    }

    #[test]
    fn test_record_derives_missing_fields() {
        let rec: StatRecord =
            serde_json::from_str(r#"{"name": "Go", "total_seconds": 5400}"#).unwrap();
        assert_eq!(rec.hours, 1);
        assert_eq!(rec.minutes, 30);
        assert_eq!(rec.text, "1 hr 30 mins");

        let idle: StatRecord =
            serde_json::from_str(r#"{"name": "Idle", "total_seconds": 20}"#).unwrap();
        assert!(!idle.is_active());
    }

    #[test]
    fn test_record_negative_seconds_clamped() {
        let rec: StatRecord =
            serde_json::from_str(r#"{"name": "X", "total_seconds": -5}"#).unwrap();
        assert_eq!(rec.total_seconds, 0.0);
    }
}
