use std::path::Path;

use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook};
use serde::Deserialize;

use super::model::{CellValue, Dataset};
use crate::error::{Result, SweepError};

const XLSX_MAX_COLUMNS: usize = 16_384;
const XLSX_MAX_ROWS: usize = 1_048_576;

// ---------------------------------------------------------------------------
// Export format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Csv, ExportFormat::Xlsx];

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    /// Name shown next to the radio button.
    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Xlsx => "Excel",
        }
    }
}

/// A serialized dataset ready to be saved.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedFile {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Serialize `dataset` and name the result after the uploaded file:
/// `<original-stem>.<csv|xlsx>`.
pub fn export(
    dataset: &Dataset,
    format: ExportFormat,
    original_name: &str,
) -> Result<ExportedFile> {
    let bytes = match format {
        ExportFormat::Csv => to_csv(dataset)?,
        ExportFormat::Xlsx => to_xlsx(dataset)?,
    };
    let file_name = output_file_name(original_name, format);
    log::info!(
        "Exported {} rows x {} columns to {file_name} ({} bytes)",
        dataset.row_count(),
        dataset.column_count(),
        bytes.len()
    );
    Ok(ExportedFile {
        file_name,
        mime_type: format.mime_type(),
        bytes,
    })
}

pub fn output_file_name(original_name: &str, format: ExportFormat) -> String {
    let stem = Path::new(original_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| original_name.to_string());
    format!("{stem}.{}", format.extension())
}

/// Write a prepared export to disk.
pub fn save_export(file: &ExportedFile, path: &Path) -> Result<()> {
    std::fs::write(path, &file.bytes)?;
    log::info!("Saved {} to {}", file.file_name, path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV writer
// ---------------------------------------------------------------------------

/// Header row followed by one record per row, no index column.
pub fn to_csv(dataset: &Dataset) -> Result<Vec<u8>> {
    if dataset.column_count() == 0 {
        return Ok(Vec::new());
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(dataset.columns().iter().map(|c| c.name.as_str()))?;
    for i in 0..dataset.row_count() {
        writer.write_record(dataset.row(i).into_iter().map(CellValue::to_field))?;
    }
    writer
        .into_inner()
        .map_err(|e| SweepError::CsvWrite(e.to_string()))
}

// ---------------------------------------------------------------------------
// XLSX writer
// ---------------------------------------------------------------------------

/// Single worksheet named `Sheet1` with a bold header row. Missing cells are
/// left blank.
pub fn to_xlsx(dataset: &Dataset) -> Result<Vec<u8>> {
    if dataset.column_count() > XLSX_MAX_COLUMNS {
        return Err(SweepError::TooManyColumns(dataset.column_count()));
    }
    // One row is taken by the header.
    if dataset.row_count() >= XLSX_MAX_ROWS {
        return Err(SweepError::TooManyRows(dataset.row_count()));
    }

    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Sheet1")?;

        for (c, column) in dataset.columns().iter().enumerate() {
            let col = ColNum::try_from(c).map_err(|_| SweepError::TooManyColumns(c))?;
            sheet.write_string_with_format(0, col, &column.name, &header)?;

            for (r, value) in column.values.iter().enumerate() {
                let row = RowNum::try_from(r + 1).map_err(|_| SweepError::TooManyRows(r))?;
                match value {
                    CellValue::Null => {}
                    CellValue::Bool(b) => {
                        sheet.write_boolean(row, col, *b)?;
                    }
                    CellValue::Integer(i) => {
                        sheet.write_number(row, col, *i as f64)?;
                    }
                    CellValue::Float(f) => {
                        sheet.write_number(row, col, *f)?;
                    }
                    CellValue::String(s) => {
                        sheet.write_string(row, col, s)?;
                    }
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::data::clean::{run_pipeline, CleaningOptions};
    use crate::data::loader::load_bytes;
    use crate::data::model::{Column, ColumnKind};

    fn csv(text: &str) -> Dataset {
        load_bytes("t.csv", text.as_bytes()).unwrap()
    }

    #[rstest]
    #[case("sales.csv", ExportFormat::Xlsx, "sales.xlsx")]
    #[case("sales.xlsx", ExportFormat::Csv, "sales.csv")]
    #[case("q1.report.CSV", ExportFormat::Csv, "q1.report.csv")]
    fn output_name_keeps_the_stem(
        #[case] original: &str,
        #[case] format: ExportFormat,
        #[case] expected: &str,
    ) {
        assert_eq!(output_file_name(original, format), expected);
    }

    #[test]
    fn export_carries_mime_type() {
        let ds = csv("a\n1\n");
        let csv_file = export(&ds, ExportFormat::Csv, "a.xlsx").unwrap();
        assert_eq!(csv_file.file_name, "a.csv");
        assert_eq!(csv_file.mime_type, "text/csv");

        let xlsx_file = export(&ds, ExportFormat::Xlsx, "a.csv").unwrap();
        assert_eq!(xlsx_file.file_name, "a.xlsx");
        assert_eq!(
            xlsx_file.mime_type,
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        // XLSX is a zip container.
        assert_eq!(&xlsx_file.bytes[..2], b"PK");
    }

    #[test]
    fn worked_example_fills_with_mean() {
        let source = csv("a,b,c\n1,2,NaN\n1,2,3\n4,5,6\n");
        let options = CleaningOptions {
            remove_duplicates: true,
            fill_missing: true,
        };
        let cleaned = run_pipeline(&source, options, &source.column_names());
        assert_eq!(cleaned.duplicates_removed, Some(0));

        let bytes = to_csv(&cleaned.dataset).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "a,b,c\n1,2,4.5\n1,2,3\n4,5,6\n"
        );
    }

    #[test]
    fn csv_round_trip_preserves_values_and_order() {
        let ds = csv(concat!(
            "city,temp,visits,open,note\n",
            "Oslo,-3.5,10,true,\"quoted, with comma\"\n",
            "Lima,,7,false,\"she said \"\"hi\"\"\"\n",
            "Pune,31.25,,true,\n",
        ));
        let bytes = to_csv(&ds).unwrap();
        let back = load_bytes("back.csv", &bytes).unwrap();
        assert_eq!(back, ds);
    }

    #[test]
    fn csv_round_trip_widens_integral_floats_only() {
        let ds = Dataset::from_columns(vec![Column::from_cells(
            "x",
            vec![CellValue::Float(3.0), CellValue::Float(6.0)],
        )]);
        let back = load_bytes("back.csv", &to_csv(&ds).unwrap()).unwrap();

        let col = back.column("x").unwrap();
        assert_eq!(col.kind, ColumnKind::Integer);
        let as_floats: Vec<Option<f64>> = col.values.iter().map(CellValue::as_f64).collect();
        assert_eq!(as_floats, vec![Some(3.0), Some(6.0)]);
    }

    #[test]
    fn xlsx_round_trip() {
        let ds = csv("name,score,ratio,ok\nann,3,0.5,true\nbob,,1.25,false\n");
        let bytes = to_xlsx(&ds).unwrap();
        let back = load_bytes("back.xlsx", &bytes).unwrap();

        assert_eq!(back.column_names(), ds.column_names());
        assert_eq!(back.column("name"), ds.column("name"));
        assert_eq!(back.column("score"), ds.column("score"));
        assert_eq!(back.column("ratio"), ds.column("ratio"));
        assert_eq!(back.column("ok"), ds.column("ok"));
    }

    #[test]
    fn save_export_writes_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let file = export(&csv("a\n1\n"), ExportFormat::Csv, "in.csv").unwrap();
        let path = dir.path().join(&file.file_name);

        save_export(&file, &path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), file.bytes);
    }

    #[test]
    fn empty_projection_exports_nothing() {
        assert!(to_csv(&Dataset::default()).unwrap().is_empty());
    }
}
