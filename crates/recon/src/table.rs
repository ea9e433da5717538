//! Plain tabular data in and out of the engine.
//!
//! Input tables are matched to records by exact, case-sensitive column name.
//! Output tables use the column names of the audit spreadsheets.

use crate::error::ReconError;
use crate::model::{
    ComparedRecord, ExternalColumn, ExternalRecord, InternalRecord, MergedRow, PreparedExternal,
    PreparedInternal, SkippedUpdate, UpdateInstruction,
};

/// Required columns of the federal court table.
pub const FEDERAL_COLUMNS: [&str; 7] = [
    "courtid",
    "address1",
    "city",
    "state",
    "zipcode",
    "filingcity",
    "phone",
];

pub const FEDERAL_TABLE: &str = "federal";
pub const GOV_TABLE: &str = "gov";

/// Header row plus string cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Parse a headed CSV document. `table` names the table in errors.
    pub fn from_csv(table: &str, csv_data: &str) -> Result<Self, ReconError> {
        let csv_err = |e: csv::Error| ReconError::Csv {
            table: table.into(),
            message: e.to_string(),
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(csv_data.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_err)?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self { headers, rows })
    }

    /// Build an output table from typed rows.
    pub fn from_records<T: TableRow>(records: &[T]) -> Self {
        Self {
            headers: T::headers().into_iter().map(String::from).collect(),
            rows: records.iter().map(T::cells).collect(),
        }
    }

    fn column(&self, table: &str, name: &str) -> Result<usize, ReconError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ReconError::MissingColumn {
                table: table.into(),
                column: name.into(),
            })
    }
}

fn cell(row: &[String], idx: usize) -> String {
    row.get(idx).map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Federal records from a table carrying [`FEDERAL_COLUMNS`].
pub fn internal_records(table: &Table) -> Result<Vec<InternalRecord>, ReconError> {
    let [court_id, address1, city, state, zipcode, filing_city, phone] =
        FEDERAL_COLUMNS.map(|name| table.column(FEDERAL_TABLE, name));
    let (court_id, address1, city, state, zipcode, filing_city, phone) =
        (court_id?, address1?, city?, state?, zipcode?, filing_city?, phone?);

    Ok(table
        .rows
        .iter()
        .map(|row| InternalRecord {
            court_id: cell(row, court_id),
            address1: cell(row, address1),
            city: cell(row, city),
            state: cell(row, state),
            zipcode: cell(row, zipcode),
            filing_city: cell(row, filing_city),
            phone: cell(row, phone),
        })
        .collect())
}

/// Government records from a table carrying every [`ExternalColumn`].
pub fn external_records(table: &Table) -> Result<Vec<ExternalRecord>, ReconError> {
    let idx = |column: ExternalColumn| table.column(GOV_TABLE, column.name());
    let address = idx(ExternalColumn::Address)?;
    let building_address = idx(ExternalColumn::BuildingAddress)?;
    let building_city = idx(ExternalColumn::BuildingCity)?;
    let building_state = idx(ExternalColumn::BuildingState)?;
    let building_zip = idx(ExternalColumn::BuildingZip)?;
    let building_name = idx(ExternalColumn::BuildingName)?;
    let court_type = idx(ExternalColumn::CourtType)?;
    let phone = idx(ExternalColumn::Phone)?;

    Ok(table
        .rows
        .iter()
        .map(|row| ExternalRecord {
            address: cell(row, address),
            building_address: cell(row, building_address),
            building_name: cell(row, building_name),
            building_city: cell(row, building_city),
            building_state: cell(row, building_state),
            building_zip: cell(row, building_zip),
            court_type: cell(row, court_type),
            phone: cell(row, phone),
        })
        .collect())
}

pub fn load_internal_csv(csv_data: &str) -> Result<Vec<InternalRecord>, ReconError> {
    internal_records(&Table::from_csv(FEDERAL_TABLE, csv_data)?)
}

pub fn load_external_csv(csv_data: &str) -> Result<Vec<ExternalRecord>, ReconError> {
    external_records(&Table::from_csv(GOV_TABLE, csv_data)?)
}

// ---------------------------------------------------------------------------
// Output rows
// ---------------------------------------------------------------------------

/// A record that can be written as one spreadsheet row.
pub trait TableRow {
    fn headers() -> Vec<&'static str>;
    fn cells(&self) -> Vec<String>;
}

fn federal_cells(record: &InternalRecord) -> Vec<String> {
    vec![
        record.court_id.clone(),
        record.address1.clone(),
        record.city.clone(),
        record.state.clone(),
        record.zipcode.clone(),
        record.filing_city.clone(),
        record.phone.clone(),
    ]
}

fn gov_cells(record: &ExternalRecord) -> Vec<String> {
    ExternalColumn::ALL
        .iter()
        .map(|column| record.get(*column).to_string())
        .collect()
}

impl TableRow for InternalRecord {
    fn headers() -> Vec<&'static str> {
        FEDERAL_COLUMNS.to_vec()
    }

    fn cells(&self) -> Vec<String> {
        federal_cells(self)
    }
}

impl TableRow for ExternalRecord {
    fn headers() -> Vec<&'static str> {
        ExternalColumn::ALL.iter().map(|c| c.name()).collect()
    }

    fn cells(&self) -> Vec<String> {
        gov_cells(self)
    }
}

impl TableRow for PreparedInternal {
    fn headers() -> Vec<&'static str> {
        let mut headers = FEDERAL_COLUMNS.to_vec();
        headers.extend(["Desc", "Key", "Full_Address"]);
        headers
    }

    fn cells(&self) -> Vec<String> {
        let mut cells = federal_cells(&self.record);
        cells.push(self.designation.to_string());
        cells.push(self.key.clone());
        cells.push(self.full_address.clone());
        cells
    }
}

impl TableRow for PreparedExternal {
    fn headers() -> Vec<&'static str> {
        let mut headers = ExternalRecord::headers();
        headers.extend(["Key", "Full_Address", "Full_Address_With_BuildingName"]);
        headers
    }

    fn cells(&self) -> Vec<String> {
        let mut cells = gov_cells(&self.record);
        cells.push(self.key.clone());
        cells.push(self.full_address.clone());
        cells.push(self.full_address_with_name.clone());
        cells
    }
}

impl TableRow for MergedRow {
    fn headers() -> Vec<&'static str> {
        let mut headers = vec!["Key"];
        headers.extend(FEDERAL_COLUMNS);
        headers.extend(["Desc", "Full_Address_Federal"]);
        headers.extend(ExternalColumn::ALL.iter().map(|c| c.name()));
        headers.extend(["Full_Address_Gov", "Full_Address_With_BuildingName"]);
        headers
    }

    fn cells(&self) -> Vec<String> {
        let mut cells = vec![self.key.clone()];
        match &self.federal {
            Some(f) => {
                cells.extend(federal_cells(&f.record));
                cells.push(f.designation.to_string());
                cells.push(f.full_address.clone());
            }
            None => cells.extend(std::iter::repeat(String::new()).take(FEDERAL_COLUMNS.len() + 2)),
        }
        match &self.gov {
            Some(g) => {
                cells.extend(gov_cells(&g.record));
                cells.push(g.full_address.clone());
                cells.push(g.full_address_with_name.clone());
            }
            None => cells.extend(
                std::iter::repeat(String::new()).take(ExternalColumn::ALL.len() + 2),
            ),
        }
        cells
    }
}

impl TableRow for ComparedRecord {
    fn headers() -> Vec<&'static str> {
        let mut headers = PreparedInternal::headers();
        headers.extend([
            "Matched_in",
            "Mismatch_Address",
            "Address_to_update",
            "Phone_to_update",
        ]);
        headers
    }

    fn cells(&self) -> Vec<String> {
        let mut cells = self.record.cells();
        cells.push(self.verdict.matched_in.to_string());
        cells.push(self.verdict.mismatch.to_string());
        cells.push(self.verdict.address_to_update.to_string());
        cells.push(self.verdict.phone_to_update.clone());
        cells
    }
}

impl TableRow for UpdateInstruction {
    fn headers() -> Vec<&'static str> {
        vec![
            "courtid",
            "address1",
            "address2",
            "filingcity",
            "city",
            "state",
            "zipcode",
            "phone",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.court_id.clone(),
            self.address1.clone(),
            self.address2.clone().unwrap_or_default(),
            self.filing_city.clone(),
            self.city.clone(),
            self.state.clone(),
            self.zipcode.clone(),
            self.phone.clone(),
        ]
    }
}

impl TableRow for SkippedUpdate {
    fn headers() -> Vec<&'static str> {
        vec!["courtid", "Address_to_update", "Reason"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.court_id.clone(),
            self.address_to_update.clone(),
            self.reason.to_string(),
        ]
    }
}
