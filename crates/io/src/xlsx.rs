// Excel import (xlsx, xls, xlsb, ods) and XLSX export

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use chrono::{NaiveDateTime, Timelike};
use dupcheck_core::header::sanitize_headers;
use dupcheck_core::{CellValue, Table};
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook};

use crate::{ExportError, LoadError};

/// Excel's hard row limit, header included.
const MAX_ROWS: usize = 1_048_576;

/// Excel's hard column limit.
const MAX_COLS: usize = 16_384;

/// Import one worksheet. The first row of its used range is the header.
///
/// `sheet` selects a worksheet by name; `None` reads the first one.
pub fn import(path: &Path, sheet: Option<&str>) -> Result<Table, LoadError> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let sheet_name = match sheet {
        Some(requested) => sheet_names
            .iter()
            .find(|n| n.as_str() == requested)
            .cloned()
            .ok_or_else(|| LoadError::SheetNotFound {
                requested: requested.to_string(),
                available: sheet_names.clone(),
            })?,
        None => sheet_names.first().cloned().ok_or(LoadError::NoSheets)?,
    };

    let range = workbook.worksheet_range(&sheet_name)?;
    let mut rows = range.rows();

    let Some(header) = rows.next() else {
        return Err(LoadError::NoHeader(format!("{} [{}]", path.display(), sheet_name)));
    };
    let raw: Vec<String> = header.iter().map(|d| cell_from_data(d).as_text()).collect();
    let mut table = Table::new(sanitize_headers(&raw));

    for row in rows {
        let cells: Vec<CellValue> = row.iter().map(cell_from_data).collect();
        if cells.iter().all(CellValue::is_empty) {
            continue;
        }
        table.push_row(cells);
    }

    log::debug!(
        "{}: read sheet {:?} ({} in workbook)",
        path.display(),
        sheet_name,
        sheet_names.len()
    );

    Ok(table)
}

fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::from_field(s),
        Data::Float(n) => CellValue::Float(*n),
        Data::Int(n) => CellValue::Int(*n),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Error(e) => CellValue::Text(format!("#{:?}", e)),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) => CellValue::Text(format_datetime(&ndt)),
            None => CellValue::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::from_field(s),
    }
}

/// Dates without a time part render as `YYYY-MM-DD`.
fn format_datetime(dt: &NaiveDateTime) -> String {
    if dt.time().num_seconds_from_midnight() == 0 && dt.time().nanosecond() == 0 {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Excel stores numbers as IEEE doubles; integers beyond 15 digits lose precision.
fn exceeds_excel_precision(n: i64) -> bool {
    n.unsigned_abs() >= 1_000_000_000_000_000
}

/// Export a table as a single-sheet workbook named `sheet_name`.
/// The header row is bold and frozen.
pub fn export(table: &Table, path: &Path, sheet_name: &str) -> Result<(), ExportError> {
    let mut workbook = XlsxWorkbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    let too_large = || ExportError::ExceedsSheetLimits {
        rows: table.len() + 1,
        cols: table.width(),
    };
    if table.len() + 1 > MAX_ROWS || table.width() > MAX_COLS {
        return Err(too_large());
    }

    let header_format = Format::new().set_bold();
    for (col, name) in table.columns.iter().enumerate() {
        let col16 = u16::try_from(col).map_err(|_| too_large())?;
        worksheet.write_string_with_format(0, col16, name, &header_format)?;
    }

    for (r, row) in table.rows.iter().enumerate() {
        let row32 = u32::try_from(r + 1).map_err(|_| too_large())?;
        for (c, cell) in row.iter().enumerate() {
            let col16 = u16::try_from(c).map_err(|_| too_large())?;
            match cell {
                CellValue::Empty => {}
                CellValue::Text(s) => {
                    worksheet.write_string(row32, col16, s)?;
                }
                CellValue::Int(n) if exceeds_excel_precision(*n) => {
                    worksheet.write_string(row32, col16, n.to_string())?;
                }
                CellValue::Int(n) => {
                    worksheet.write_number(row32, col16, *n as f64)?;
                }
                CellValue::Float(n) => {
                    worksheet.write_number(row32, col16, *n)?;
                }
                CellValue::Bool(b) => {
                    worksheet.write_boolean(row32, col16, *b)?;
                }
            }
        }
    }

    if !table.columns.is_empty() {
        worksheet.set_freeze_panes(1, 0)?;
    }

    workbook.save(path)?;
    Ok(())
}
