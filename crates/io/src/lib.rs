// File I/O operations: tables in, tables out

pub mod csv;
pub mod json;
pub mod xlsx;

use std::path::Path;

use dupcheck_core::Table;
use thiserror::Error;

/// File formats understood by `load_table` / `save_table`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Tsv,
    /// Any workbook calamine can read (xlsx, xlsm, xlsb, xls, ods).
    Spreadsheet,
    Json,
}

impl FileFormat {
    /// Infer from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(FileFormat::Csv),
            "tsv" | "tab" => Ok(FileFormat::Tsv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(FileFormat::Spreadsheet),
            "json" => Ok(FileFormat::Json),
            _ => Err(LoadError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Failure to turn a file into a `Table`.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file type: {0} (expected .csv, .tsv, .xlsx, .xls, .xlsb or .ods)")]
    UnsupportedFormat(String),
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("failed to open workbook: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("sheet {requested:?} not found (available: {})", .available.join(", "))]
    SheetNotFound { requested: String, available: Vec<String> },
    #[error("workbook contains no sheets")]
    NoSheets,
    #[error("{0}: no header row")]
    NoHeader(String),
    #[error("{label}, line {line}: {found} field(s) but the header has {expected}")]
    ExtraFields {
        label: String,
        line: u64,
        expected: usize,
        found: usize,
    },
}

/// Failure to write a result table.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV write error: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("XLSX write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("JSON write error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cannot export to {0}: spreadsheet export writes .xlsx only")]
    UnsupportedFormat(String),
    #[error("{rows} row(s) x {cols} column(s) exceeds the worksheet limit of 1048576 x 16384")]
    ExceedsSheetLimits { rows: usize, cols: usize },
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Worksheet to read; the first sheet when `None`.
    pub sheet: Option<String>,
}

/// Read a file into a table. The first row is the header.
pub fn load_table(path: &Path, options: &LoadOptions) -> Result<Table, LoadError> {
    let format = FileFormat::from_path(path)?;
    let table = match format {
        FileFormat::Csv => csv::import(path)?,
        FileFormat::Tsv => csv::import_with_delimiter(path, b'\t')?,
        FileFormat::Spreadsheet => xlsx::import(path, options.sheet.as_deref())?,
        FileFormat::Json => return Err(LoadError::UnsupportedFormat(path.display().to_string())),
    };
    log::debug!(
        "loaded {}: {} column(s), {} row(s)",
        path.display(),
        table.width(),
        table.len()
    );
    Ok(table)
}

/// Write a table, picking the format from the extension.
/// `sheet_name` only applies to spreadsheet output.
pub fn save_table(table: &Table, path: &Path, sheet_name: &str) -> Result<(), ExportError> {
    let format = FileFormat::from_path(path)
        .map_err(|_| ExportError::UnsupportedFormat(path.display().to_string()))?;
    match format {
        FileFormat::Csv => csv::export(table, path),
        FileFormat::Tsv => csv::export_tsv(table, path),
        FileFormat::Json => json::export(table, path),
        FileFormat::Spreadsheet => {
            let is_xlsx = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("xlsx"));
            if !is_xlsx {
                return Err(ExportError::UnsupportedFormat(path.display().to_string()));
            }
            xlsx::export(table, path, sheet_name)
        }
    }
}
