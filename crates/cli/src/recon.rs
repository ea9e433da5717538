//! `courtsync run` / `validate` / `apply`: config-driven reconciliation.

use std::path::{Path, PathBuf};

use courtsync_io::export::{output_directory, read_plan, write_audit, ExportFormats};
use courtsync_io::{gov, store, IoError};
use courtsync_recon::model::{ExternalRecord, InternalRecord, ReconInput, UpdateInstruction};
use courtsync_recon::table::internal_records;
use courtsync_recon::{run, ReconConfig, ReconResult};
use log::info;

use crate::exit_codes::{
    EXIT_APPLY, EXIT_ERROR, EXIT_INVALID_CONFIG, EXIT_NEEDS_ATTENTION, EXIT_RUNTIME,
};
use crate::fetch::{fetch_locations, save_locations};
use crate::CliError;

pub struct RunOptions {
    pub config: PathBuf,
    pub out: Option<PathBuf>,
    pub apply: bool,
    pub strict: bool,
    pub json: bool,
}

fn runtime_err(e: IoError) -> CliError {
    CliError::new(EXIT_RUNTIME, e.to_string())
}

/// A parsed config plus the directory its relative paths resolve against.
struct LoadedConfig {
    config: ReconConfig,
    base_dir: PathBuf,
}

impl LoadedConfig {
    fn read(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CliError::new(EXIT_RUNTIME, format!("cannot read config {}: {e}", path.display()))
        })?;
        let config = ReconConfig::from_toml(&text)
            .map_err(|e| CliError::new(EXIT_INVALID_CONFIG, e.to_string()))?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(Self { config, base_dir })
    }

    fn resolve(&self, relative: &str) -> PathBuf {
        self.base_dir.join(relative)
    }

    fn database_path(&self) -> Result<PathBuf, CliError> {
        self.config
            .sources
            .federal_db
            .as_deref()
            .map(|db| self.resolve(db))
            .ok_or_else(|| {
                CliError::usage("updates can only be applied to a federal database")
                    .with_hint("set sources.federal_db in the config")
            })
    }

    fn output_dir(&self, override_dir: Option<PathBuf>) -> PathBuf {
        match override_dir {
            Some(dir) => dir,
            None => output_directory(
                &self.resolve(&self.config.output.directory),
                self.config.output.dated,
                chrono::Local::now().date_naive(),
            ),
        }
    }
}

fn load_federal(loaded: &LoadedConfig) -> Result<Vec<InternalRecord>, CliError> {
    let sources = &loaded.config.sources;
    if let Some(db) = &sources.federal_db {
        let conn = store::open(&loaded.resolve(db)).map_err(runtime_err)?;
        return store::load_federal(&conn, &sources.federal_table).map_err(runtime_err);
    }
    if let Some(csv) = &sources.federal_csv {
        let table = courtsync_io::csv::read_table(&loaded.resolve(csv)).map_err(runtime_err)?;
        return internal_records(&table).map_err(|e| CliError::new(EXIT_RUNTIME, e.to_string()));
    }
    Err(CliError::usage("no federal source configured")
        .with_hint("set sources.federal_db or sources.federal_csv in the config"))
}

fn load_gov(loaded: &LoadedConfig, out_dir: &Path) -> Result<Vec<ExternalRecord>, CliError> {
    let sources = &loaded.config.sources;
    if let Some(file) = &sources.gov_file {
        return gov::load_gov_file(&loaded.resolve(file)).map_err(runtime_err);
    }
    if let Some(url) = &sources.gov_url {
        let locations = fetch_locations(url)?;
        save_locations(&locations, out_dir, loaded.config.output.xlsx)?;
        let table = gov::locations_table(&locations).map_err(runtime_err)?;
        return courtsync_recon::table::external_records(&table)
            .map_err(|e| CliError::new(EXIT_RUNTIME, e.to_string()));
    }
    Err(CliError::usage("no government source configured")
        .with_hint("set sources.gov_file or sources.gov_url in the config"))
}

fn print_summary(result: &ReconResult) {
    let s = &result.summary;
    eprintln!(
        "{} federal records: {} no mismatch, {} mismatches, {} manual review ({} not found)",
        s.federal_records, s.no_mismatch, s.mismatches, s.manual_review, s.not_found,
    );
    eprintln!(
        "gov records: {} in, {} kept; matched {} bankruptcy, {} district",
        s.gov_records_in, s.gov_records_kept, s.matched_bankruptcy, s.matched_district,
    );
    eprintln!("update plan: {} instructions, {} skipped", s.instructions, s.skipped);
}

fn apply_plan(db_path: &Path, table: &str, instructions: &[UpdateInstruction]) -> Result<usize, CliError> {
    let mut conn = store::open(db_path).map_err(runtime_err)?;
    store::apply_updates(&mut conn, table, instructions).map_err(|e| {
        CliError::new(EXIT_APPLY, format!("error updating discrepancies: {e}"))
            .with_hint("the transaction was rolled back; no records were changed")
    })
}

pub fn cmd_run(opts: RunOptions) -> Result<(), CliError> {
    let loaded = LoadedConfig::read(&opts.config)?;
    let db_path = if opts.apply {
        Some(loaded.database_path()?)
    } else {
        None
    };
    let out_dir = loaded.output_dir(opts.out);

    let federal = load_federal(&loaded)?;
    let gov = load_gov(&loaded, &out_dir)?;

    let result = run(&loaded.config, &ReconInput { federal, gov })
        .map_err(|e| CliError::new(EXIT_INVALID_CONFIG, e.to_string()))?;

    let formats = ExportFormats {
        xlsx: loaded.config.output.xlsx,
        csv: loaded.config.output.csv,
    };
    let written = write_audit(&out_dir, &result, formats).map_err(runtime_err)?;
    eprintln!("wrote {} files to {}", written.len(), out_dir.display());

    if opts.json {
        let json = serde_json::json!({ "meta": &result.meta, "summary": &result.summary });
        let text = serde_json::to_string_pretty(&json)
            .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))?;
        println!("{text}");
    }
    print_summary(&result);

    if let Some(db_path) = db_path {
        let changed = apply_plan(
            &db_path,
            &loaded.config.sources.federal_table,
            &result.plan.instructions,
        )?;
        eprintln!("applied {} updates ({changed} rows changed)", result.plan.instructions.len());
    }

    if opts.strict && result.summary.needs_attention() > 0 {
        return Err(CliError::new(
            EXIT_NEEDS_ATTENTION,
            format!("{} records need attention", result.summary.needs_attention()),
        ));
    }
    Ok(())
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let loaded = LoadedConfig::read(&config_path)?;
    let sources = &loaded.config.sources;

    let federal = sources
        .federal_db
        .as_deref()
        .or(sources.federal_csv.as_deref())
        .ok_or_else(|| {
            CliError::usage("no federal source configured")
                .with_hint("set sources.federal_db or sources.federal_csv in the config")
        })?;
    let mut files = vec![federal];
    match (&sources.gov_file, &sources.gov_url) {
        (Some(file), _) => files.push(file.as_str()),
        (None, Some(_)) => {}
        (None, None) => {
            return Err(CliError::usage("no government source configured")
                .with_hint("set sources.gov_file or sources.gov_url in the config"))
        }
    }

    for file in files {
        let path = loaded.resolve(file);
        if !path.exists() {
            return Err(CliError::new(
                EXIT_RUNTIME,
                format!("source not found: {}", path.display()),
            ));
        }
    }

    eprintln!(
        "valid: {} (dedupe on {} columns, {} excluded court types)",
        loaded.config.name,
        loaded.config.gov.deduplicate_columns.len(),
        loaded.config.gov.exclude_court_types.len(),
    );
    Ok(())
}

pub fn cmd_apply(config_path: PathBuf, plan_path: PathBuf) -> Result<(), CliError> {
    let loaded = LoadedConfig::read(&config_path)?;
    let db_path = loaded.database_path()?;
    let plan = read_plan(&plan_path).map_err(runtime_err)?;
    info!(
        "plan {}: {} instructions, {} skipped",
        plan_path.display(),
        plan.instructions.len(),
        plan.skipped.len()
    );

    let changed = apply_plan(&db_path, &loaded.config.sources.federal_table, &plan.instructions)?;
    eprintln!("applied {} updates ({changed} rows changed)", plan.instructions.len());
    Ok(())
}
