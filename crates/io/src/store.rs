//! SQLite store for the federal court table.
//!
//! Reads the whole table as text and writes update plans back inside a single
//! transaction: either every instruction is applied or none is.

use std::path::Path;

use courtsync_recon::model::{InternalRecord, UpdateInstruction};
use courtsync_recon::table::{internal_records, Table};
use log::{info, warn};
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection};

use crate::error::IoError;
use crate::gov::pad_zip;

pub fn open(path: &Path) -> Result<Connection, IoError> {
    if !path.exists() {
        return Err(IoError::file(
            path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "database not found"),
        ));
    }
    Ok(Connection::open(path)?)
}

/// Table names are interpolated into SQL, so only plain identifiers are accepted.
fn checked_table_name(table: &str) -> Result<&str, IoError> {
    let mut chars = table.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(table)
    } else {
        Err(IoError::TableName(table.to_string()))
    }
}

fn value_text(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) | ValueRef::Blob(t) => String::from_utf8_lossy(t).into_owned(),
    }
}

/// Read every row of `table` as strings.
pub fn read_table(conn: &Connection, table: &str) -> Result<Table, IoError> {
    let table = checked_table_name(table)?;
    let mut stmt = conn.prepare(&format!("SELECT * FROM {table}"))?;
    let headers: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let width = headers.len();

    let rows = stmt
        .query_map([], |row| {
            (0..width)
                .map(|idx| row.get_ref(idx).map(value_text))
                .collect::<Result<Vec<_>, _>>()
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Table { headers, rows })
}

/// Load the federal court records from `table`.
pub fn load_federal(conn: &Connection, table: &str) -> Result<Vec<InternalRecord>, IoError> {
    let mut records = internal_records(&read_table(conn, table)?)?;
    // INTEGER zip columns drop leading zeros; pad them like the government side
    for record in &mut records {
        record.zipcode = pad_zip(std::mem::take(&mut record.zipcode));
    }
    info!("fetched {} rows from the {table} table", records.len());
    Ok(records)
}

/// Apply every instruction in one transaction. Any failure rolls the whole
/// plan back. Returns the number of rows changed.
pub fn apply_updates(
    conn: &mut Connection,
    table: &str,
    instructions: &[UpdateInstruction],
) -> Result<usize, IoError> {
    let table = checked_table_name(table)?;
    let tx = conn.transaction()?;
    let mut changed = 0usize;

    {
        let mut stmt = tx.prepare(&format!(
            "UPDATE {table} SET
                address1 = ?1,
                address2 = ?2,
                filingcity = ?3,
                city = ?4,
                state = ?5,
                zipcode = ?6,
                phone = ?7
             WHERE courtid = ?8"
        ))?;

        for instruction in instructions {
            let rows = stmt.execute(params![
                instruction.address1,
                instruction.address2,
                instruction.filing_city,
                instruction.city,
                instruction.state,
                instruction.zipcode,
                instruction.phone,
                instruction.court_id,
            ])?;
            if rows == 0 {
                warn!("no {table} row with courtid {}", instruction.court_id);
            }
            changed += rows;
        }
    }

    // Dropping `tx` without commit on an early return rolls back
    tx.commit()?;
    info!("applied {} updates ({changed} rows changed)", instructions.len());
    Ok(changed)
}

/// Create an empty federal court table with the columns the updater writes.
pub fn create_federal_table(conn: &Connection, table: &str) -> Result<(), IoError> {
    let table = checked_table_name(table)?;
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            courtid    TEXT PRIMARY KEY,
            address1   TEXT,
            address2   TEXT,
            city       TEXT,
            state      TEXT,
            zipcode    TEXT,
            filingcity TEXT,
            phone      TEXT
        );"
    ))?;
    Ok(())
}

/// Insert federal records, e.g. when seeding a store from a CSV export.
pub fn insert_federal(
    conn: &mut Connection,
    table: &str,
    records: &[InternalRecord],
) -> Result<(), IoError> {
    let table = checked_table_name(table)?;
    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO {table} (courtid, address1, city, state, zipcode, filingcity, phone)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
        ))?;
        for record in records {
            stmt.execute(params![
                record.court_id,
                record.address1,
                record.city,
                record.state,
                record.zipcode,
                record.filing_city,
                record.phone,
            ])?;
        }
    }
    tx.commit()?;
    Ok(())
}
