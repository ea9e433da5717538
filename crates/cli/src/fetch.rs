//! `courtsync fetch`: download the government court location list.
//!
//! The locator is queried once for the whole country. Network errors and 5xx
//! responses are retried with exponential backoff; any other failure, and a
//! response without locations, is fatal.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use courtsync_io::export::{ensure_directory, write_table_files, ExportFormats};
use courtsync_io::gov::{locations_table, parse_response, write_locations_json};
use log::{info, warn};
use serde_json::Value;

use crate::exit_codes::{EXIT_FETCH, EXIT_RUNTIME};
use crate::CliError;

const MAX_RETRIES: u32 = 3;
const TIMEOUT_SECS: u64 = 60;
const USER_AGENT: &str = concat!("courtsync/", env!("CARGO_PKG_VERSION"));

pub const LOCATIONS_JSON: &str = "locations_data.json";
pub const LOCATIONS_TABLE: &str = "Gov_location_data";

/// Country-wide search parameters, sent JSON-encoded as the `query` parameter.
fn country_query() -> String {
    serde_json::json!({
        "by": "location",
        "page": 0,
        "description": "USA",
        "county": "all",
        "state": "US",
        "zip": "00000",
        "country": "US",
        "locationType": "country",
        "lat": 39.8283,
        "lng": -98.5795,
        "filters": "default",
    })
    .to_string()
}

fn fetch_err(msg: impl Into<String>) -> CliError {
    CliError::new(EXIT_FETCH, msg)
}

/// GET the location list, retrying transient failures.
pub fn fetch_locations(url: &str) -> Result<Vec<Value>, CliError> {
    let http = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| fetch_err(format!("cannot build HTTP client: {e}")))?;
    let query = country_query();
    let mut backoff_secs = 1u64;

    for attempt in 0..=MAX_RETRIES {
        let retry_reason = match http.get(url).query(&[("query", &query)]).send() {
            Ok(resp) => {
                let status = resp.status().as_u16();
                if status >= 500 {
                    format!("HTTP {status}")
                } else if status != 200 {
                    return Err(fetch_err(format!(
                        "failed to retrieve data, status code {status}"
                    )));
                } else {
                    let body = resp
                        .text()
                        .map_err(|e| fetch_err(format!("failed to read response body: {e}")))?;
                    let locations = parse_response(body.trim_start_matches('\u{feff}'))
                        .map_err(|e| fetch_err(e.to_string()))?;
                    info!("fetched {} locations", locations.len());
                    return Ok(locations);
                }
            }
            Err(e) => e.to_string(),
        };

        if attempt == MAX_RETRIES {
            return Err(fetch_err(format!(
                "upstream error after {} attempts: {retry_reason}",
                MAX_RETRIES + 1
            )));
        }
        warn!(
            "retry {}/{} in {}s ({retry_reason})",
            attempt + 1,
            MAX_RETRIES,
            backoff_secs
        );
        thread::sleep(Duration::from_secs(backoff_secs));
        backoff_secs *= 2;
    }

    Err(fetch_err("no attempts made"))
}

/// Save the raw list and, optionally, its Excel rendition into `dir`.
pub fn save_locations(
    locations: &[Value],
    dir: &Path,
    xlsx: bool,
) -> Result<Vec<PathBuf>, CliError> {
    let runtime = |e: courtsync_io::IoError| CliError::new(EXIT_RUNTIME, e.to_string());
    ensure_directory(dir).map_err(runtime)?;

    let json_path = dir.join(LOCATIONS_JSON);
    write_locations_json(locations, &json_path).map_err(runtime)?;
    let mut written = vec![json_path];

    if xlsx {
        let table = locations_table(locations).map_err(runtime)?;
        let formats = ExportFormats { xlsx: true, csv: false };
        written.extend(write_table_files(dir, LOCATIONS_TABLE, &table, formats).map_err(runtime)?);
    }
    Ok(written)
}

pub fn cmd_fetch(url: &str, out: &Path, xlsx: bool) -> Result<(), CliError> {
    let locations = fetch_locations(url)?;
    for path in save_locations(&locations, out, xlsx)? {
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}
