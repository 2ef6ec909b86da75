use crate::cache::ResponseMeta;
use crate::layout::ColorTable;
use crate::stats::StatRecord;
use crate::theme::ThemeColors;
use anyhow::{Context, Result, bail};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde_json::Value;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// Opens a file for reading, decompressing `.gz` files on the fly.
fn open(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let reader = BufReader::new(file);
    if has_extension(path, "gz") {
        Ok(Box::new(GzDecoder::new(reader)))
    } else {
        Ok(Box::new(reader))
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let reader = open(path)?;
    serde_json::from_reader(reader).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Extracts the record list for `stat` from a parsed input document.
///
/// Accepts a bare list, an object keyed by stat kind, or either of those
/// wrapped in a `{"data": ...}` envelope.
pub fn parse_records(value: Value, stat: &str) -> Result<Vec<StatRecord>> {
    match value {
        Value::Array(_) => serde_json::from_value(value).context("Malformed record list"),
        Value::Object(mut map) => {
            if let Some(data) = map.remove("data") {
                return parse_records(data, stat);
            }
            let Some(list) = map.remove(stat) else {
                let mut available: Vec<&String> = map
                    .iter()
                    .filter(|(_, v)| v.is_array())
                    .map(|(k, _)| k)
                    .collect();
                available.sort();
                bail!("No {:?} statistics in input (available: {:?})", stat, available);
            };
            serde_json::from_value(list).with_context(|| format!("Malformed {:?} records", stat))
        }
        other => bail!("Expected a list of records or an object, found {}", describe(&other)),
    }
}

/// Loads the records to render from a JSON (or gzipped JSON) file.
pub fn load_records(path: &Path, stat: &str) -> Result<Vec<StatRecord>> {
    let records = parse_records(read_json(path)?, stat)?;
    tracing::info!("Loaded {} {} records from {}", records.len(), stat, path.display());
    Ok(records)
}

/// Picks the color table for `stat` out of a parsed color document.
///
/// The document is either keyed by stat kind (`{"languages": {"Rust": {"color": ...}}}`)
/// or a flat name-to-color table.
pub fn parse_colors(value: Value, stat: &str) -> Result<ColorTable> {
    let mut map = match value {
        Value::Object(map) => map,
        other => bail!("Expected a color table object, found {}", describe(&other)),
    };

    let keyed = map
        .get(stat)
        .and_then(Value::as_object)
        .is_some_and(|section| !section.contains_key("color"));

    let table = if keyed {
        map.remove(stat).unwrap_or(Value::Null)
    } else {
        Value::Object(map)
    };

    // entries without a usable color object fall back to gray at render time
    let entries: HashMap<String, Value> =
        serde_json::from_value(table).context("Malformed color table")?;
    Ok(entries
        .into_iter()
        .filter_map(|(name, entry)| serde_json::from_value(entry).ok().map(|c| (name, c)))
        .collect())
}

pub fn load_colors(path: &Path, stat: &str) -> Result<ColorTable> {
    let colors = parse_colors(read_json(path)?, stat)?;
    tracing::debug!("Loaded {} category colors from {}", colors.len(), path.display());
    Ok(colors)
}

/// Loads extra theme presets.
pub fn load_themes(path: &Path) -> Result<HashMap<String, ThemeColors>> {
    let value = read_json(path)?;
    let themes: HashMap<String, ThemeColors> =
        serde_json::from_value(value).with_context(|| {
            format!("Malformed theme table in {}", path.display())
        })?;
    tracing::debug!("Loaded {} themes from {}", themes.len(), path.display());
    Ok(themes)
}

/// Writes the document to `output` (stdout if `None`); `.svgz` paths are
/// gzip-compressed. Response headers, when given, go to stdout first.
pub fn write_output(
    output: Option<&Path>,
    meta: Option<&ResponseMeta>,
    document: &str,
) -> Result<()> {
    let stdout = io::stdout();

    if let Some(meta) = meta {
        let mut out = stdout.lock();
        for line in meta.header_lines() {
            writeln!(out, "{}", line)?;
        }
        writeln!(out)?;
    }

    match output {
        None => {
            let mut out = stdout.lock();
            out.write_all(document.as_bytes())?;
            writeln!(out)?;
            out.flush()?;
        }
        Some(path) => {
            write_document(path, document)?;
            tracing::info!("Wrote card to {}", path.display());
        }
    }
    Ok(())
}

fn write_document(path: &Path, document: &str) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Cannot create {}", path.display()))?;
    let writer = BufWriter::new(file);

    if has_extension(path, "svgz") {
        let mut encoder = GzEncoder::new(writer, Compression::default());
        encoder.write_all(document.as_bytes())?;
        encoder.finish()?.flush()?;
    } else {
        let mut writer = writer;
        writer.write_all(document.as_bytes())?;
        writer.flush()?;
    }
    Ok(())
}
