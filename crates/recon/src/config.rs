use std::collections::BTreeSet;

use serde::Deserialize;

use crate::error::ReconError;
use crate::model::ExternalColumn;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ReconConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub gov: GovConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_name() -> String {
    "court-locations".into()
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            gov: GovConfig::default(),
            sources: SourcesConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Government data cleaning
// ---------------------------------------------------------------------------

/// How the government table is cleaned before matching.
#[derive(Debug, Clone, Deserialize)]
pub struct GovConfig {
    /// Column tuple that identifies a duplicate location. First occurrence wins.
    #[serde(default = "default_deduplicate_columns")]
    pub deduplicate_columns: Vec<ExternalColumn>,
    /// `CourtType` values to drop, compared case-sensitively.
    #[serde(default = "default_exclude_court_types")]
    pub exclude_court_types: BTreeSet<String>,
}

impl Default for GovConfig {
    fn default() -> Self {
        Self {
            deduplicate_columns: default_deduplicate_columns(),
            exclude_court_types: default_exclude_court_types(),
        }
    }
}

fn default_deduplicate_columns() -> Vec<ExternalColumn> {
    vec![
        ExternalColumn::Address,
        ExternalColumn::BuildingAddress,
        ExternalColumn::BuildingCity,
        ExternalColumn::BuildingName,
        ExternalColumn::BuildingState,
        ExternalColumn::BuildingZip,
    ]
}

fn default_exclude_court_types() -> BTreeSet<String> {
    ["Appeals Court", "Federal Defenders", "Probation/Pretrial Services"]
        .into_iter()
        .map(String::from)
        .collect()
}

// ---------------------------------------------------------------------------
// Sources + Output
// ---------------------------------------------------------------------------

/// Where the calling workflow loads its tables from. The engine itself never
/// reads these; paths are resolved by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    #[serde(default)]
    pub federal_db: Option<String>,
    #[serde(default = "default_federal_table")]
    pub federal_table: String,
    #[serde(default)]
    pub federal_csv: Option<String>,
    #[serde(default)]
    pub gov_file: Option<String>,
    #[serde(default)]
    pub gov_url: Option<String>,
}

fn default_federal_table() -> String {
    "f_court".into()
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            federal_db: None,
            federal_table: default_federal_table(),
            federal_csv: None,
            gov_file: None,
            gov_url: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_directory")]
    pub directory: String,
    /// Write into a `YYYY-MM-DD` subdirectory of `directory`.
    #[serde(default = "default_true")]
    pub dated: bool,
    #[serde(default = "default_true")]
    pub xlsx: bool,
    #[serde(default)]
    pub csv: bool,
}

fn default_output_directory() -> String {
    "out".into()
}

fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            dated: true,
            xlsx: true,
            csv: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.gov.deduplicate_columns.is_empty() {
            return Err(ReconError::ConfigValidation(
                "gov.deduplicate_columns must name at least one column".into(),
            ));
        }

        let mut seen = BTreeSet::new();
        for column in &self.gov.deduplicate_columns {
            if !seen.insert(column.name()) {
                return Err(ReconError::ConfigValidation(format!(
                    "gov.deduplicate_columns lists '{column}' twice"
                )));
            }
        }

        if self.sources.federal_db.is_some() && self.sources.federal_csv.is_some() {
            return Err(ReconError::ConfigValidation(
                "sources: set either federal_db or federal_csv, not both".into(),
            ));
        }

        if self.sources.gov_file.is_some() && self.sources.gov_url.is_some() {
            return Err(ReconError::ConfigValidation(
                "sources: set either gov_file or gov_url, not both".into(),
            ));
        }

        if self.sources.federal_table.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "sources.federal_table must not be empty".into(),
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
