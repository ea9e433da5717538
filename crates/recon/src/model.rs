use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One row of the authoritative federal court table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalRecord {
    pub court_id: String,
    pub address1: String,
    pub city: String,
    pub state: String,
    pub zipcode: String,
    pub filing_city: String,
    pub phone: String,
}

/// One location from the government source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalRecord {
    pub address: String,
    pub building_address: String,
    pub building_name: String,
    pub building_city: String,
    pub building_state: String,
    pub building_zip: String,
    pub court_type: String,
    pub phone: String,
}

/// Column names of the government table, as the upstream source spells them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExternalColumn {
    Address,
    BuildingAddress,
    BuildingCity,
    BuildingState,
    BuildingZip,
    BuildingName,
    CourtType,
    Phone,
}

impl ExternalColumn {
    pub const ALL: [ExternalColumn; 8] = [
        Self::Address,
        Self::BuildingAddress,
        Self::BuildingCity,
        Self::BuildingState,
        Self::BuildingZip,
        Self::BuildingName,
        Self::CourtType,
        Self::Phone,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Address => "Address",
            Self::BuildingAddress => "BuildingAddress",
            Self::BuildingCity => "BuildingCity",
            Self::BuildingState => "BuildingState",
            Self::BuildingZip => "BuildingZip",
            Self::BuildingName => "BuildingName",
            Self::CourtType => "CourtType",
            Self::Phone => "Phone",
        }
    }
}

impl fmt::Display for ExternalColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl ExternalRecord {
    pub fn get(&self, column: ExternalColumn) -> &str {
        match column {
            ExternalColumn::Address => &self.address,
            ExternalColumn::BuildingAddress => &self.building_address,
            ExternalColumn::BuildingCity => &self.building_city,
            ExternalColumn::BuildingState => &self.building_state,
            ExternalColumn::BuildingZip => &self.building_zip,
            ExternalColumn::BuildingName => &self.building_name,
            ExternalColumn::CourtType => &self.court_type,
            ExternalColumn::Phone => &self.phone,
        }
    }
}

/// Pre-loaded tables for one reconciliation pass.
#[derive(Debug, Clone, Default)]
pub struct ReconInput {
    pub federal: Vec<InternalRecord>,
    pub gov: Vec<ExternalRecord>,
}

// ---------------------------------------------------------------------------
// Prepared records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CourtType {
    Bankruptcy,
    District,
    Other,
}

impl CourtType {
    /// Categorize a raw `CourtType` cell (case-insensitive, otherwise exact).
    pub fn classify(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        match lower.as_str() {
            "bankruptcy court" => Self::Bankruptcy,
            "district court" => Self::District,
            _ => Self::Other,
        }
    }
}

/// Whether a federal office files in its own city or somewhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Designation {
    Main,
    Branch,
}

impl fmt::Display for Designation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Main => write!(f, "Main"),
            Self::Branch => write!(f, "Branch"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreparedInternal {
    #[serde(flatten)]
    pub record: InternalRecord,
    pub key: String,
    pub designation: Designation,
    pub full_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreparedExternal {
    #[serde(flatten)]
    pub record: ExternalRecord,
    pub category: CourtType,
    pub key: String,
    pub full_address: String,
    pub full_address_with_name: String,
}

/// Row of the federal/gov outer join on `key`. Audit output only.
#[derive(Debug, Clone, Serialize)]
pub struct MergedRow {
    pub key: String,
    pub federal: Option<PreparedInternal>,
    pub gov: Option<PreparedExternal>,
}

// ---------------------------------------------------------------------------
// Verdicts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    NotFound,
    Bankruptcy,
    District,
}

impl fmt::Display for MatchSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "Not Found"),
            Self::Bankruptcy => write!(f, "Gov (Bankruptcy Court)"),
            Self::District => write!(f, "Gov (District Court)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchStatus {
    NoMismatch,
    Mismatch { federal: String, gov: String },
    ManualReview,
}

impl fmt::Display for MismatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMismatch => write!(f, "No mismatch"),
            Self::Mismatch { federal, gov } => write!(f, "Fed: {federal} | Gov: {gov}"),
            Self::ManualReview => write!(f, "Manual Research"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressUpdate {
    NoUpdateNeeded,
    ManualReview,
    Replace(String),
}

impl fmt::Display for AddressUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoUpdateNeeded => write!(f, "No update needed"),
            Self::ManualReview => write!(f, "Human review needed"),
            Self::Replace(address) => f.write_str(address),
        }
    }
}

/// Outcome of matching one federal record.
///
/// Built only through the constructors below so that `NotFound` always
/// carries `ManualReview` and a mismatch always carries a replacement address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub matched_in: MatchSource,
    pub mismatch: MismatchStatus,
    pub address_to_update: AddressUpdate,
    pub phone_to_update: String,
}

impl Verdict {
    pub fn not_found() -> Self {
        Self::manual_review(MatchSource::NotFound)
    }

    pub fn manual_review(matched_in: MatchSource) -> Self {
        Self {
            matched_in,
            mismatch: MismatchStatus::ManualReview,
            address_to_update: AddressUpdate::ManualReview,
            phone_to_update: String::new(),
        }
    }

    pub fn no_mismatch(matched_in: MatchSource) -> Self {
        Self {
            matched_in,
            mismatch: MismatchStatus::NoMismatch,
            address_to_update: AddressUpdate::NoUpdateNeeded,
            phone_to_update: String::new(),
        }
    }

    /// A detected discrepancy. Falls back to manual review when there is no
    /// replacement address to propose.
    pub fn mismatch(
        matched_in: MatchSource,
        federal: &str,
        gov: &str,
        replacement: &str,
        phone: &str,
    ) -> Self {
        if replacement.is_empty() {
            return Self::manual_review(matched_in);
        }
        Self {
            matched_in,
            mismatch: MismatchStatus::Mismatch {
                federal: federal.to_string(),
                gov: gov.to_string(),
            },
            address_to_update: AddressUpdate::Replace(replacement.to_string()),
            phone_to_update: phone.to_string(),
        }
    }

    pub fn is_discrepancy(&self) -> bool {
        matches!(self.mismatch, MismatchStatus::Mismatch { .. })
    }
}

/// A prepared federal record with its verdict attached.
#[derive(Debug, Clone, Serialize)]
pub struct ComparedRecord {
    #[serde(flatten)]
    pub record: PreparedInternal,
    pub verdict: Verdict,
}

// ---------------------------------------------------------------------------
// Update plan
// ---------------------------------------------------------------------------

/// Field-level update for one federal record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateInstruction {
    pub court_id: String,
    pub address1: String,
    pub address2: Option<String>,
    pub filing_city: String,
    pub city: String,
    pub state: String,
    pub zipcode: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// Fewer than four comma-separated components.
    InsufficientComponents { found: usize },
    /// A required component was blank after trimming.
    EmptyComponent { component: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientComponents { found } => {
                write!(f, "insufficient address components ({found}, need at least 4)")
            }
            Self::EmptyComponent { component } => write!(f, "empty {component}"),
        }
    }
}

/// A discrepancy that could not be turned into an instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedUpdate {
    pub court_id: String,
    pub address_to_update: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePlan {
    pub instructions: Vec<UpdateInstruction>,
    pub skipped: Vec<SkippedUpdate>,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    pub federal_records: usize,
    pub gov_records_in: usize,
    pub gov_records_kept: usize,
    pub no_mismatch: usize,
    pub mismatches: usize,
    pub manual_review: usize,
    pub not_found: usize,
    pub matched_bankruptcy: usize,
    pub matched_district: usize,
    pub instructions: usize,
    pub skipped: usize,
}

impl ReconSummary {
    /// Records that need either an update or a human.
    pub fn needs_attention(&self) -> usize {
        self.mismatches + self.manual_review
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub federal: Vec<PreparedInternal>,
    pub gov: Vec<PreparedExternal>,
    pub merged: Vec<MergedRow>,
    pub compared: Vec<ComparedRecord>,
    pub plan: UpdatePlan,
}
