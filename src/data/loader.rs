use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};

use super::model::{CellValue, Column, ColumnKind, Dataset};
use crate::error::{Result, SweepError};

/// Tokens read as a missing value, in CSV fields and spreadsheet strings.
pub const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ---------------------------------------------------------------------------
// Format detection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Xlsx,
}

impl FileFormat {
    /// Detect the format from the file name's extension (case-insensitive).
    /// Only `.csv` and `.xlsx` are accepted.
    pub fn from_file_name(name: &str) -> Result<Self> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "csv" => Ok(FileFormat::Csv),
            "xlsx" => Ok(FileFormat::Xlsx),
            "" => Err(SweepError::UnsupportedFileType(String::new())),
            other => Err(SweepError::UnsupportedFileType(format!(".{other}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read a file from disk and parse it. Dispatch by extension.
pub fn load_file(path: &Path) -> Result<Dataset> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    // Reject before touching the disk.
    FileFormat::from_file_name(&name)?;
    let bytes = std::fs::read(path)?;
    load_bytes(&name, &bytes)
}

/// Parse an in-memory upload. `name` only drives format detection.
pub fn load_bytes(name: &str, bytes: &[u8]) -> Result<Dataset> {
    match FileFormat::from_file_name(name)? {
        FileFormat::Csv => load_csv(bytes),
        FileFormat::Xlsx => load_xlsx(bytes),
    }
}

fn is_missing_token(s: &str) -> bool {
    NA_VALUES.contains(&s)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Comma separated, header row first. Rows shorter than the header are
/// padded with missing cells; longer rows are rejected.
fn load_csv(bytes: &[u8]) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).into_owned())
        .collect();

    if headers.is_empty() {
        return Err(SweepError::EmptyFile);
    }

    let mut raw: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];

    for (row_no, result) in reader.byte_records().enumerate() {
        let record = result?;
        if record.len() > headers.len() {
            return Err(SweepError::RaggedRow {
                row: record.position().map(|p| p.line() as usize).unwrap_or(row_no + 2),
                found: record.len(),
                expected: headers.len(),
            });
        }
        for (col_idx, cells) in raw.iter_mut().enumerate() {
            let value = record
                .get(col_idx)
                .map(|f| String::from_utf8_lossy(f).into_owned())
                .filter(|s| !is_missing_token(s));
            cells.push(value);
        }
    }

    let columns = headers
        .into_iter()
        .zip(raw)
        .map(|(name, cells)| infer_column(name, cells))
        .collect();

    Ok(Dataset::from_columns(columns))
}

/// Pick the narrowest kind every present value parses as:
/// integer, then float, then boolean, falling back to text.
fn infer_column(name: String, raw: Vec<Option<String>>) -> Column {
    let present = || raw.iter().flatten().map(|s| s.trim());

    let kind = if present().next().is_none() {
        ColumnKind::Float
    } else if present().all(|s| s.parse::<i64>().is_ok()) {
        ColumnKind::Integer
    } else if present().all(|s| s.parse::<f64>().is_ok()) {
        ColumnKind::Float
    } else if present().all(|s| parse_bool(s).is_some()) {
        ColumnKind::Bool
    } else {
        ColumnKind::Text
    };

    let values = raw
        .into_iter()
        .map(|cell| {
            let Some(s) = cell else {
                return CellValue::Null;
            };
            let t = s.trim();
            match kind {
                ColumnKind::Integer => t.parse().map(CellValue::Integer).unwrap_or(CellValue::Null),
                ColumnKind::Float => match t.parse::<f64>() {
                    Ok(v) if !v.is_nan() => CellValue::Float(v),
                    _ => CellValue::Null,
                },
                ColumnKind::Bool => parse_bool(t).map(CellValue::Bool).unwrap_or(CellValue::Null),
                ColumnKind::Text => CellValue::String(s),
            }
        })
        .collect();

    Column { name, kind, values }
}

fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// XLSX loader
// ---------------------------------------------------------------------------

/// First worksheet only; its first row is the header.
fn load_xlsx(bytes: &[u8]) -> Result<Dataset> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SweepError::NoWorksheet)??;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Err(SweepError::EmptyFile);
    };

    let names: Vec<String> = header
        .iter()
        .map(|cell| match cell {
            Data::Empty => String::new(),
            other => other.to_string(),
        })
        .collect();

    let mut cells: Vec<Vec<CellValue>> = vec![Vec::new(); names.len()];
    for row in rows {
        for (col_idx, cell) in row.iter().enumerate().take(names.len()) {
            cells[col_idx].push(xlsx_cell(cell));
        }
    }

    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, values)| Column::from_cells(name, values))
        .collect();

    Ok(Dataset::from_columns(columns))
}

/// Integral floats are read back as integers, which is how spreadsheet
/// applications store whole numbers.
fn xlsx_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => CellValue::Integer(*f as i64),
        Data::Float(f) if f.is_nan() => CellValue::Null,
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) if is_missing_token(s) => CellValue::Null,
        Data::String(s) => CellValue::String(s.clone()),
        Data::Empty | Data::Error(_) => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}
