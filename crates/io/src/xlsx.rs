// Excel export for plain tables

use std::path::Path;

use courtsync_recon::table::Table;
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::error::IoError;

/// Excel's hard limit; sheet names longer than this are rejected by the writer.
const MAX_SHEET_NAME: usize = 31;

/// Write one table to a single-sheet workbook.
pub fn write_table(table: &Table, sheet_name: &str, path: &Path) -> Result<(), IoError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let name: String = sheet_name.chars().take(MAX_SHEET_NAME).collect();
    worksheet.set_name(&name)?;

    write_sheet(worksheet, table)?;

    workbook.save(path)?;
    Ok(())
}

fn write_sheet(worksheet: &mut Worksheet, table: &Table) -> Result<(), IoError> {
    let header_format = Format::new().set_bold();

    for (col, header) in table.headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, header, &header_format)?;
    }

    // Every cell is text: zip codes and court ids keep their leading zeros
    for (row_idx, row) in table.rows.iter().enumerate() {
        let row32 = (row_idx + 1) as u32;
        for (col, value) in row.iter().enumerate() {
            if !value.is_empty() {
                worksheet.write_string(row32, col as u16, value)?;
            }
        }
    }

    if !table.headers.is_empty() {
        worksheet.set_freeze_panes(1, 0)?;
        worksheet.autofilter(0, 0, table.rows.len() as u32, (table.headers.len() - 1) as u16)?;
    }
    worksheet.autofit();
    Ok(())
}
