//! Dataset readers.
//!
//! Workbooks (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`) are read with calamine,
//! first sheet only. `.csv` files are read with the `csv` crate. In both cases the
//! first row is the header, fully blank rows are dropped and blank cells are
//! treated as absent.

use std::path::{Path, PathBuf};

use calamine::{Data, Reader, open_workbook_auto};
use thiserror::Error;
use tracing::debug;

use super::row::{CellValue, RawRow};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("unsupported file type: {0:?} (expected xlsx, xlsm, xlsb, xls, ods or csv)")]
    UnsupportedFormat(String),

    #[error("workbook has no sheets: {}", .0.display())]
    NoSheets(PathBuf),

    #[error("failed to read workbook: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("failed to read csv: {0}")]
    Csv(#[from] csv::Error),
}

/// Rows read from a dataset file.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Sheet the rows came from; `None` for CSV.
    pub sheet: Option<String>,
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl Dataset {
    /// Returns the expected columns missing from the header row.
    pub fn missing_columns<'c>(&self, expected: &[&'c str]) -> Vec<&'c str> {
        expected
            .iter()
            .copied()
            .filter(|column| !self.headers.iter().any(|h| h == column))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Workbook,
    Csv,
}

fn detect_format(path: &Path) -> Result<Format, SourceError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Format::Workbook),
        "csv" => Ok(Format::Csv),
        _ => Err(SourceError::UnsupportedFormat(extension)),
    }
}

/// Reads a dataset file. Blocking; call from `spawn_blocking` in async code.
///
/// # Errors
///
/// Returns [`SourceError`] if the file is missing, has an unsupported extension,
/// or cannot be parsed.
pub fn read_dataset(path: &Path) -> Result<Dataset, SourceError> {
    if !path.is_file() {
        return Err(SourceError::NotFound(path.to_path_buf()));
    }

    let dataset = match detect_format(path)? {
        Format::Workbook => read_workbook(path)?,
        Format::Csv => read_csv(path)?,
    };

    debug!(
        path = %path.display(),
        sheet = dataset.sheet.as_deref().unwrap_or("-"),
        columns = dataset.headers.len(),
        rows = dataset.rows.len(),
        "Dataset loaded"
    );

    Ok(dataset)
}

fn read_workbook(path: &Path) -> Result<Dataset, SourceError> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| SourceError::NoSheets(path.to_path_buf()))?;

    let range = workbook.worksheet_range(&sheet)?;
    let mut grid = range.rows();

    let headers: Vec<String> = match grid.next() {
        Some(cells) => cells.iter().map(|c| c.to_string().trim().to_string()).collect(),
        None => Vec::new(),
    };

    let rows = grid
        .map(|cells| build_row(&headers, cells.iter().map(cell_from_data)))
        .filter(|row| !row.is_empty())
        .collect();

    Ok(Dataset {
        sheet: Some(sheet),
        headers,
        rows,
    })
}

fn read_csv(path: &Path) -> Result<Dataset, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)?;

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row = build_row(&headers, record.iter().map(CellValue::from));
        if !row.is_empty() {
            rows.push(row);
        }
    }

    Ok(Dataset {
        sheet: None,
        headers,
        rows,
    })
}

/// Pairs cells with their header. Cells under a blank header are dropped.
fn build_row(headers: &[String], cells: impl Iterator<Item = CellValue>) -> RawRow {
    let mut row = RawRow::new();
    for (header, value) in headers.iter().zip(cells) {
        if !header.is_empty() {
            row.insert(header.as_str(), value);
        }
    }
    row
}

fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        other => CellValue::Text(other.to_string()),
    }
}
