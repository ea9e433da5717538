// Audit artifacts for one reconciliation run

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use courtsync_recon::model::{ReconMeta, ReconResult, ReconSummary, UpdatePlan};
use courtsync_recon::table::Table;
use log::info;
use serde::Serialize;

use crate::error::IoError;

pub const GOV_CLEAN: &str = "Gov_Data_Clean";
pub const FED_CLEAN: &str = "Fed_Data_Clean";
pub const MERGED: &str = "Gov_Federal_Merge_Data";
pub const RESULT: &str = "result";
pub const SKIPPED: &str = "skipped_updates";
pub const PLAN_FILE: &str = "update_plan.json";

#[derive(Debug, Clone, Copy)]
pub struct ExportFormats {
    pub xlsx: bool,
    pub csv: bool,
}

/// `<base>/<YYYY-MM-DD>` when `dated`, otherwise `base` itself.
pub fn output_directory(base: &Path, dated: bool, today: NaiveDate) -> PathBuf {
    if dated {
        base.join(today.format("%Y-%m-%d").to_string())
    } else {
        base.to_path_buf()
    }
}

pub fn ensure_directory(dir: &Path) -> Result<(), IoError> {
    std::fs::create_dir_all(dir).map_err(|e| IoError::file(dir, e))
}

/// Write `table` as `<dir>/<name>.xlsx` and/or `<dir>/<name>.csv`.
pub fn write_table_files(
    dir: &Path,
    name: &str,
    table: &Table,
    formats: ExportFormats,
) -> Result<Vec<PathBuf>, IoError> {
    let mut written = Vec::new();
    if formats.xlsx {
        let path = dir.join(format!("{name}.xlsx"));
        crate::xlsx::write_table(table, name, &path)?;
        written.push(path);
    }
    if formats.csv {
        let path = dir.join(format!("{name}.csv"));
        crate::csv::write_table(table, &path)?;
        written.push(path);
    }
    Ok(written)
}

#[derive(Serialize)]
struct PlanDocument<'a> {
    meta: &'a ReconMeta,
    summary: &'a ReconSummary,
    #[serde(flatten)]
    plan: &'a UpdatePlan,
}

/// Write every audit table plus the update plan into `dir`.
pub fn write_audit(
    dir: &Path,
    result: &ReconResult,
    formats: ExportFormats,
) -> Result<Vec<PathBuf>, IoError> {
    ensure_directory(dir)?;

    let mut written = Vec::new();
    written.extend(write_table_files(dir, GOV_CLEAN, &Table::from_records(&result.gov), formats)?);
    written.extend(write_table_files(dir, FED_CLEAN, &Table::from_records(&result.federal), formats)?);
    written.extend(write_table_files(dir, MERGED, &Table::from_records(&result.merged), formats)?);
    written.extend(write_table_files(dir, RESULT, &Table::from_records(&result.compared), formats)?);
    if !result.plan.skipped.is_empty() {
        written.extend(write_table_files(
            dir,
            SKIPPED,
            &Table::from_records(&result.plan.skipped),
            formats,
        )?);
    }

    let plan_path = dir.join(PLAN_FILE);
    let file = File::create(&plan_path).map_err(|e| IoError::file(&plan_path, e))?;
    serde_json::to_writer_pretty(
        BufWriter::new(file),
        &PlanDocument {
            meta: &result.meta,
            summary: &result.summary,
            plan: &result.plan,
        },
    )?;
    written.push(plan_path);

    info!("wrote {} audit files to {}", written.len(), dir.display());
    Ok(written)
}

/// Read the instructions back from an `update_plan.json`.
pub fn read_plan(path: &Path) -> Result<UpdatePlan, IoError> {
    let file = File::open(path).map_err(|e| IoError::file(path, e))?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
