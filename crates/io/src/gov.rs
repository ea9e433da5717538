//! Government location data: the JSON search response and its tabular form.
//!
//! The search service answers with `{"results": {"locations": [ {...}, ... ]}}`.
//! Each location object becomes one table row; the header row is the union of
//! all keys seen, in first-seen order.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use courtsync_recon::model::ExternalRecord;
use courtsync_recon::table::{external_records, Table};
use log::debug;
use serde_json::Value;

use crate::csv::{read_file_as_utf8, read_table};
use crate::error::IoError;

/// Columns holding zip codes that may arrive as bare numbers.
const ZIP_COLUMNS: [&str; 2] = ["zip", "BuildingZip"];
const ZIP_LEN: usize = 5;

/// Extract the location list from a search response body.
pub fn parse_response(body: &str) -> Result<Vec<Value>, IoError> {
    let response: Value = serde_json::from_str(body)?;
    let locations = response
        .get("results")
        .and_then(|r| r.get("locations"))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    if locations.is_empty() {
        return Err(IoError::GovData("no locations data found in response".into()));
    }
    Ok(locations)
}

/// Parse saved location data: either a bare array or a full search response.
pub fn parse_locations(json: &str) -> Result<Vec<Value>, IoError> {
    let value: Value = serde_json::from_str(json)?;
    match value {
        Value::Array(locations) if !locations.is_empty() => Ok(locations),
        Value::Array(_) => Err(IoError::GovData("location list is empty".into())),
        _ => parse_response(json),
    }
}

/// Flatten location objects into a table of strings.
pub fn locations_table(locations: &[Value]) -> Result<Table, IoError> {
    let mut headers: Vec<String> = Vec::new();
    for (idx, location) in locations.iter().enumerate() {
        let object = location
            .as_object()
            .ok_or_else(|| IoError::GovData(format!("location {idx} is not an object")))?;
        for key in object.keys() {
            if !headers.iter().any(|h| h == key) {
                headers.push(key.clone());
            }
        }
    }

    let mut table = Table::new(headers);
    for location in locations {
        let row = table
            .headers
            .iter()
            .map(|header| {
                let text = location.get(header).map(cell_text).unwrap_or_default();
                if ZIP_COLUMNS.contains(&header.as_str()) {
                    pad_zip(text)
                } else {
                    text
                }
            })
            .collect();
        table.rows.push(row);
    }

    debug!(
        "gov locations: {} rows, {} columns",
        table.rows.len(),
        table.headers.len()
    );
    Ok(table)
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Restore leading zeros lost when a zip code was stored as a number.
pub(crate) fn pad_zip(text: String) -> String {
    if !text.is_empty() && text.len() < ZIP_LEN && text.chars().all(|c| c.is_ascii_digit()) {
        format!("{text:0>width$}", width = ZIP_LEN)
    } else {
        text
    }
}

/// Load government records from a `.json` location dump or a `.csv` export.
pub fn load_gov_file(path: &Path) -> Result<Vec<ExternalRecord>, IoError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let table = match extension.as_str() {
        "json" => locations_table(&parse_locations(&read_file_as_utf8(path)?)?)?,
        "csv" => read_table(path)?,
        _ => return Err(IoError::UnsupportedFormat(path.display().to_string())),
    };
    Ok(external_records(&table)?)
}

/// Save the raw location list, pretty-printed.
pub fn write_locations_json(locations: &[Value], path: &Path) -> Result<(), IoError> {
    let file = File::create(path).map_err(|e| IoError::file(path, e))?;
    serde_json::to_writer_pretty(BufWriter::new(file), locations)?;
    Ok(())
}
